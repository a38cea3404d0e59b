//! Database row types and their insert DTOs.

pub mod video;
