pub mod config;
pub mod digest;
pub mod error;
pub mod report;
pub mod scan;
pub mod verify;
pub mod walker;

pub use error::{Error, ErrorKind, Result};
