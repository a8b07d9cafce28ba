//! Output module
//! Console and JSON rendering of registry, draft, extraction and submission results

pub mod formatter;

pub use formatter::{formatter_for, ConsoleFormatter, JsonFormatter, OutputFormatter, SkillListing};
