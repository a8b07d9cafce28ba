//! Output formatters for console and JSON

use crate::config::{OutputConfig, OutputFormat};
use crate::draft::{DraftStatus, FormField, FormSnapshot};
use crate::error::Result;
use crate::form::catalog;
use crate::input::ExtractedDocuments;
use crate::skills::Skill;
use crate::submit::SubmissionOutcome;
use colored::{Color, Colorize};
use serde::Serialize;
use serde_json::json;

/// One row of a skill listing
#[derive(Debug, Clone, Serialize)]
pub struct SkillListing<'a> {
    pub value: &'a str,
    pub label: &'a str,
    pub builtin: bool,
}

impl<'a> SkillListing<'a> {
    pub fn new(skill: &'a Skill, builtin: bool) -> Self {
        Self {
            value: &skill.value,
            label: &skill.label,
            builtin,
        }
    }
}

/// Trait for rendering command results
pub trait OutputFormatter {
    fn format_skills(&self, skills: &[SkillListing<'_>]) -> Result<String>;
    fn format_draft_status(&self, status: &DraftStatus) -> Result<String>;
    fn format_snapshot(&self, snapshot: &FormSnapshot) -> Result<String>;
    fn format_documents(&self, documents: &ExtractedDocuments) -> Result<String>;
    fn format_outcome(&self, outcome: &SubmissionOutcome) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON formatter for scripting
pub struct JsonFormatter {
    pretty: bool,
}

pub fn formatter_for(config: &OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Console => Box::new(ConsoleFormatter::new(config.color_output)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn header(&self, title: &str) -> String {
        if self.use_colors {
            format!("{}\n", title.color(Color::Blue).bold())
        } else {
            format!("{}\n", title)
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_skills(&self, skills: &[SkillListing<'_>]) -> Result<String> {
        if skills.is_empty() {
            return Ok("No skills match.\n".to_string());
        }

        let width = skills.iter().map(|s| s.value.len()).max().unwrap_or(0);
        let mut out = self.header(&format!("Skills ({})", skills.len()));
        for skill in skills {
            let tag = if skill.builtin {
                self.colorize("built-in", Color::BrightBlack)
            } else {
                self.colorize("custom", Color::Green)
            };
            out.push_str(&format!(
                "  {:<width$}  {}  [{}]\n",
                skill.value,
                skill.label,
                tag,
                width = width
            ));
        }
        Ok(out)
    }

    fn format_draft_status(&self, status: &DraftStatus) -> Result<String> {
        if !status.exists {
            return Ok("No draft saved.\n".to_string());
        }

        let mut out = self.header("Draft available");
        if let Some(age) = &status.age {
            out.push_str(&format!("  Last saved {}\n", age));
        }
        if let Some(saved) = status.last_saved {
            let local = saved.with_timezone(&chrono::Local);
            out.push_str(&format!("  Saved at {}\n", local.format("%H:%M:%S")));
        }
        Ok(out)
    }

    fn format_snapshot(&self, snapshot: &FormSnapshot) -> Result<String> {
        let mut out = self.header("Application form");
        for field in FormField::ALL {
            let value = match field {
                FormField::JobTitle => snapshot.job_title.clone(),
                FormField::Location => catalog::location_label(&snapshot.location)
                    .map(str::to_string)
                    .unwrap_or_else(|| snapshot.location.clone()),
                FormField::Radius => {
                    let base = catalog::location_label(&snapshot.location).unwrap_or("choose a city");
                    format!("{} km (from {})", snapshot.radius, base)
                }
                FormField::Discipline => snapshot.discipline.clone(),
                FormField::JobSites => snapshot.job_sites.clone(),
                FormField::StudyInfo => snapshot.study_info.clone(),
                FormField::Interests => snapshot.interests.clone(),
            };
            let value = if value.trim().is_empty() {
                self.colorize("-", Color::BrightBlack)
            } else {
                value
            };
            out.push_str(&format!("  {:<11} {}\n", field.name(), value));
        }

        let skills = if snapshot.skills.is_empty() {
            self.colorize("-", Color::BrightBlack)
        } else {
            snapshot.skills.join(", ")
        };
        out.push_str(&format!("  {:<11} {}\n", "skills", skills));
        Ok(out)
    }

    fn format_documents(&self, documents: &ExtractedDocuments) -> Result<String> {
        let mut out = self.header(&format!(
            "Extracted {} of {} documents",
            documents.succeeded(),
            documents.len()
        ));
        for (name, text) in &documents.contents {
            if documents.failed.contains(name) {
                out.push_str(&format!("\n{}\n  {}\n", self.colorize(name, Color::Red), text));
            } else {
                out.push_str(&format!(
                    "\n{} ({} characters)\n{}\n",
                    self.colorize(name, Color::Green),
                    text.chars().count(),
                    text
                ));
            }
        }
        Ok(out)
    }

    fn format_outcome(&self, outcome: &SubmissionOutcome) -> Result<String> {
        let message = match outcome {
            SubmissionOutcome::Json(value) => {
                format!("{}\n{}\n", self.colorize("Sent successfully", Color::Green), serde_json::to_string_pretty(value)?)
            }
            SubmissionOutcome::Document(bytes) => format!(
                "{} ({} byte document returned)\n",
                self.colorize("Sent successfully", Color::Green),
                bytes.len()
            ),
            SubmissionOutcome::Text(text) => {
                format!("{}\n{}\n", self.colorize("Sent successfully", Color::Green), text)
            }
        };
        Ok(message)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        let mut out = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        out.push('\n');
        Ok(out)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_skills(&self, skills: &[SkillListing<'_>]) -> Result<String> {
        self.render(&skills)
    }

    fn format_draft_status(&self, status: &DraftStatus) -> Result<String> {
        self.render(status)
    }

    fn format_snapshot(&self, snapshot: &FormSnapshot) -> Result<String> {
        self.render(snapshot)
    }

    fn format_documents(&self, documents: &ExtractedDocuments) -> Result<String> {
        self.render(&documents.contents)
    }

    fn format_outcome(&self, outcome: &SubmissionOutcome) -> Result<String> {
        let value = match outcome {
            SubmissionOutcome::Json(value) => json!({ "status": "success", "response": value }),
            SubmissionOutcome::Document(bytes) => {
                json!({ "status": "success", "document_bytes": bytes.len() })
            }
            SubmissionOutcome::Text(text) => json!({ "status": "success", "response": text }),
        };
        self.render(&value)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_skills_plain() {
        let formatter = ConsoleFormatter::new(false);
        let rust = Skill::new("rust", "Rust");
        let git = Skill::new("git", "Git");
        let out = formatter
            .format_skills(&[SkillListing::new(&git, true), SkillListing::new(&rust, false)])
            .unwrap();

        assert!(out.starts_with("Skills (2)"));
        assert!(out.contains("git   Git  [built-in]"));
        assert!(out.contains("rust  Rust  [custom]"));
    }

    #[test]
    fn test_console_draft_status() {
        let formatter = ConsoleFormatter::new(false);
        let none = DraftStatus {
            exists: false,
            last_saved: None,
            age: None,
        };
        assert_eq!(formatter.format_draft_status(&none).unwrap(), "No draft saved.\n");

        let some = DraftStatus {
            exists: true,
            last_saved: Some(chrono::Utc::now()),
            age: Some("just now".to_string()),
        };
        assert!(formatter.format_draft_status(&some).unwrap().contains("Last saved just now"));
    }

    #[test]
    fn test_console_snapshot_uses_city_label() {
        let formatter = ConsoleFormatter::new(false);
        let snapshot = FormSnapshot {
            location: "muenchen-typo".to_string(),
            ..Default::default()
        };
        let out = formatter.format_snapshot(&snapshot).unwrap();
        assert!(out.contains("muenchen-typo"));

        let snapshot = FormSnapshot {
            location: "munich".to_string(),
            radius: 30,
            ..Default::default()
        };
        let out = formatter.format_snapshot(&snapshot).unwrap();
        assert!(out.contains("München"));
        assert!(out.contains("30 km (from München)"));
    }

    #[test]
    fn test_json_documents_is_plain_map() {
        let formatter = JsonFormatter::new(false);
        let mut documents = ExtractedDocuments::default();
        documents.contents.insert("a.txt".to_string(), "hello".to_string());

        assert_eq!(formatter.format_documents(&documents).unwrap(), "{\"a.txt\":\"hello\"}\n");
        assert_eq!(formatter.supports_format(), OutputFormat::Json);
    }
}
