pub mod adherence;
pub mod engine;
pub mod error;
pub mod recurrence;
pub mod schedule;
pub mod status;

pub use error::{EngineError, EngineResult};
