//! Per-key min/mean/max over large `key;value` text files.
//!
//! The input is cut into chunks of lines, each chunk is folded into a private
//! map by one worker, and the partial maps are merged on a single reducer
//! thread. See [`dispatch`] for the available worker strategies.

pub mod aggregate;
pub mod chunk;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod format;
pub mod input;
pub mod parse;
pub mod reduce;
pub mod stats;

pub use config::{EngineConfig, Strategy};
pub use engine::{Engine, RunReport, Summary};
pub use error::{Error, Result};
pub use input::ReadMode;
pub use reduce::FinalMapping;
pub use stats::Stats;
