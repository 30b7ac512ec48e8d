//! huti: small, independent utility helpers
//!
//! - [`chain`]: layered key-value lookup with ALL / FIRST / UNIQUE merge modes
//! - [`color`]: terminal colors and status symbols
//! - [`process`]: subprocess execution wrappers
//! - [`frame`]: call-site introspection
//! - [`paths`], [`text`], [`env`]: path, string and environment helpers

pub mod chain;
pub mod cli;
pub mod color;
pub mod config;
pub mod env;
mod error;
pub mod frame;
pub mod paths;
pub mod process;
pub mod text;

pub use chain::{Chain, ChainError, Layer, Lookup, MergeMode, Record};
pub use error::HutiError;
