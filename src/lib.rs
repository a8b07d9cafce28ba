//! Job application form library

pub mod cli;
pub mod config;
pub mod draft;
pub mod error;
pub mod form;
pub mod input;
pub mod output;
pub mod skills;
pub mod storage;
pub mod submit;

pub use error::{JobFormError, Result};
pub use config::Config;
