pub mod config;
pub mod dependency;
pub mod document;
pub mod error;
pub mod io;
pub mod paths;
pub mod staleness;
pub mod store;
pub mod types;

pub use error::{MissionError, Result};
