//! Domain building blocks shared by the server and the client library.
//!
//! Nothing in this crate performs I/O. It holds the error taxonomy, the
//! normalized video record with its size and compression arithmetic,
//! display formatting, the route access policy, and the social-share formats.

pub mod access;
pub mod error;
pub mod format;
pub mod sizes;
pub mod social;
pub mod types;
pub mod video;
