//! External service integrations.
//!
//! - [`media`] -- the [`MediaProvider`](media::MediaProvider) capability
//!   (upload bytes, destroy an asset) and its value types.
//! - [`cloudinary`] -- Cloudinary implementation of the media capability.
//! - [`delivery`] -- delivery-URL builders for thumbnails, previews, and crops.
//! - [`genai`] -- the [`TextGenerator`](genai::TextGenerator) capability.
//! - [`gemini`] -- Gemini implementation of text generation.

pub mod cloudinary;
pub mod delivery;
pub mod gemini;
pub mod genai;
pub mod media;
