//! The application form: option catalogs and the interactive session

pub mod catalog;
pub mod session;

pub use session::{parse_command, FormSession, SessionCommand, Submitter};
