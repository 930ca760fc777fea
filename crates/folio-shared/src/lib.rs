//! # Folio Shared
//!
//! Wire types for the Folio HTTP API. Kept free of server dependencies so a
//! frontend client can compile against it.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
