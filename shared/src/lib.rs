//! Types shared between the podcast backend and its clients.
//!
//! The records here are the JSON shapes exchanged over HTTP and persisted by
//! the client, so field names follow the browser's camelCase conventions.

pub mod api;
pub mod data_uri;
pub mod podcast;
pub mod voice;

pub use api::*;
pub use data_uri::{DataUri, DataUriError};
pub use podcast::*;
pub use voice::*;

/// Nominal spoken length of every generated podcast, in minutes.
pub const MAX_DURATION_MINUTES: u32 = 1;
