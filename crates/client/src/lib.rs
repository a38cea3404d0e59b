//! Client-side library for the video dashboard.
//!
//! [`api::ApiClient`] talks to the HTTP API. The remaining modules hold the
//! state behind each screen (the dashboard grid, a single video card, the
//! upload form and the social-share tool) as plain values, so any front end
//! can render them and the behaviour can be tested without a browser.

pub mod api;
pub mod card;
pub mod dashboard;
pub mod notice;
pub mod preview;
pub mod social_share;
pub mod upload_form;
