mod config;
mod engine;
mod error;
mod locks;
mod reaper;

pub use config::EngineConfig;
pub use engine::{Engine, EngineBuilder};
pub use error::EngineError;
