//! CLI interface for the job application form

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "jobform")]
#[command(about = "Collect job application preferences and documents and submit them")]
#[command(long_about = "Fill in the job application form with draft auto-save, manage custom skills, extract text from PDF documents and submit everything to the backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format: console, json (overrides the configuration)
    #[arg(short, long, global = true)]
    pub output: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill in the form interactively, with auto-save
    Form,

    /// Manage selectable skills
    Skills {
        #[command(subcommand)]
        action: SkillAction,
    },

    /// Inspect or discard the saved draft
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },

    /// Extract text from documents without submitting
    Extract {
        /// Documents to read (PDF, TXT, MD)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Submit the saved draft together with documents
    Submit {
        /// Documents to attach (PDF, TXT, MD)
        files: Vec<PathBuf>,
    },

    /// List the values accepted by the select fields
    Options,

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum SkillAction {
    /// List skills
    List {
        /// Show only custom skills
        #[arg(long)]
        custom: bool,

        /// Filter by label, case-insensitive
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Add a custom skill
    Add {
        /// Display label; the identifier is derived from it
        label: String,
    },

    /// Remove a custom skill
    Remove {
        /// Skill identifier
        value: String,
    },

    /// Remove every custom skill
    Reset,
}

#[derive(Subcommand)]
pub enum DraftAction {
    /// Show whether a draft exists and how old it is
    Status,

    /// Print the saved draft
    Show,

    /// Delete the saved draft
    Clear,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        _ => Err(format!("Invalid output format: {}. Supported: console, json", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err(format!("File has no extension: {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_skills_add() {
        let cli = Cli::parse_from(["jobform", "skills", "add", "Vue.js"]);
        assert!(matches!(cli.command, Commands::Skills { action: SkillAction::Add { ref label } } if label == "Vue.js"));
    }

    #[test]
    fn test_output_format() {
        assert!(parse_output_format("JSON").is_ok());
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_file_extension() {
        assert!(validate_file_extension(Path::new("cv.PDF"), &["pdf"]).is_ok());
        assert!(validate_file_extension(Path::new("cv.docx"), &["pdf"]).is_err());
        assert!(validate_file_extension(Path::new("cv"), &["pdf"]).is_err());
    }
}
