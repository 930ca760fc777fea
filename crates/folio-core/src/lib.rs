//! # Folio Core
//!
//! The domain layer of the Folio site backend.
//! Pure content-generation policy, the entities it produces and the ports it
//! talks through. No infrastructure dependencies live here.

pub mod content;
pub mod domain;
pub mod error;
pub mod ports;

pub use content::{ContentGenerator, GenerationRequest, GenerationSettings, ScheduledOutcome};
pub use error::{GenerationError, PipelineError, RepoError, ValidationError};
