//! UCI protocol handling for gambit.

pub mod command;
pub mod engine;
pub mod error;

pub use command::{GoParams, UciOption};
pub use engine::{EngineOptions, UciEngine};
pub use error::UciError;
