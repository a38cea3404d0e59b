//! Request middleware and authentication extractors.
//!
//! - [`gate::access_gate`] -- Applies the route access policy and attaches the
//!   caller's [`Session`](crate::auth::session::Session) to the request.
//! - [`auth::AuthUser`] -- Requires a signed-in caller.
//! - [`auth::MaybeUser`] -- The caller, if signed in.

pub mod auth;
pub mod gate;
