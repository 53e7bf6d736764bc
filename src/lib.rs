pub mod api;
pub mod args;
pub mod commands;
mod config;
pub mod error;
pub mod model;
pub mod summary;
mod utils;
pub mod wizard;


pub use api::Mode;
pub use config::Config;
pub use error::{Error, FilingError, Result, ValidationError};
