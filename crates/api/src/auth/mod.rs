//! Session verification for tokens issued by the hosted identity provider.

pub mod session;
