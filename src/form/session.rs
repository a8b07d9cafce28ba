//! Interactive form session over a line-based input
//!
//! The session owns the live form state and is the only caller of the
//! Draft Store and Skill Registry. Every field change restarts the
//! auto-save countdown; the loop waits on whichever comes first, the next
//! input line or the end of the quiet period.

use crate::draft::{DraftStore, FormField, FormSnapshot, SaveOutcome};
use crate::error::{JobFormError, Result};
use crate::input::DocumentBatch;
use crate::output::{OutputFormatter, SkillListing};
use crate::skills::{RemoveOutcome, SkillRegistry};
use crate::storage::KeyValueStore;
use crate::submit::{self, SubmissionClient, SubmissionOutcome};
use anyhow::bail;
use log::{debug, error};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const HELP: &str = "\
Commands:
  set <field> [value]     set a field (jobTitle, location, radius, discipline,
                          jobSites, studyInfo, interests); no value clears it
  skill <value>           select or deselect a skill
  skills [query]          list skills, optionally filtered by label
  add-skill <label>       add a custom skill
  remove-skill <value>    remove a custom skill
  show                    show the form
  status                  show draft status
  load                    restore the saved draft into the form
  clear                   delete the saved draft
  submit [files...]       send the form with documents
  help                    show this help
  quit                    save pending changes and exit";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Set(FormField, String),
    ToggleSkill(String),
    ListSkills(String),
    AddSkill(String),
    RemoveSkill(String),
    Show,
    Status,
    Load,
    Clear,
    Submit(Vec<PathBuf>),
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> anyhow::Result<Option<SessionCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "set" => {
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            if field.is_empty() {
                bail!("Usage: set <field> [value]");
            }
            let field: FormField = field.parse()?;
            SessionCommand::Set(field, value.to_string())
        }
        "skill" => SessionCommand::ToggleSkill(required(rest, "skill <value>")?),
        "skills" => SessionCommand::ListSkills(rest.to_string()),
        "add-skill" => SessionCommand::AddSkill(required(rest, "add-skill <label>")?),
        "remove-skill" => SessionCommand::RemoveSkill(required(rest, "remove-skill <value>")?),
        "show" => SessionCommand::Show,
        "status" => SessionCommand::Status,
        "load" => SessionCommand::Load,
        "clear" => SessionCommand::Clear,
        "submit" => SessionCommand::Submit(rest.split_whitespace().map(PathBuf::from).collect()),
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        other => bail!("Unknown command '{}'. Type 'help' for a list.", other),
    };

    Ok(Some(command))
}

fn required(rest: &str, usage: &str) -> anyhow::Result<String> {
    if rest.is_empty() {
        bail!("Usage: {}", usage);
    }
    Ok(rest.to_string())
}

/// What `submit` needs besides the form itself
pub struct Submitter {
    pub batch: DocumentBatch,
    pub client: SubmissionClient,
    pub download_dir: PathBuf,
}

pub struct FormSession<D, K> {
    form: FormSnapshot,
    drafts: DraftStore<D>,
    skills: SkillRegistry<K>,
    formatter: Box<dyn OutputFormatter>,
    delay: Duration,
    submitter: Option<Submitter>,
}

impl<D: KeyValueStore, K: KeyValueStore> FormSession<D, K> {
    pub fn new(
        drafts: DraftStore<D>,
        skills: SkillRegistry<K>,
        formatter: Box<dyn OutputFormatter>,
        delay: Duration,
    ) -> Self {
        Self {
            form: FormSnapshot::default(),
            drafts,
            skills,
            formatter,
            delay,
            submitter: None,
        }
    }

    pub fn with_submitter(mut self, submitter: Submitter) -> Self {
        self.submitter = Some(submitter);
        self
    }

    pub fn form(&self) -> &FormSnapshot {
        &self.form
    }

    pub fn drafts(&self) -> &DraftStore<D> {
        &self.drafts
    }

    pub fn skills(&self) -> &SkillRegistry<K> {
        &self.skills
    }

    pub fn into_parts(self) -> (FormSnapshot, DraftStore<D>, SkillRegistry<K>) {
        (self.form, self.drafts, self.skills)
    }

    /// Drive the session until `quit` or end of input. A save still
    /// counting down at that point is written immediately.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();

        if self.drafts.draft_exists() {
            write!(out, "{}", self.formatter.format_draft_status(&self.drafts.status())?)?;
            writeln!(out, "Type 'load' to restore it or 'clear' to discard it.")?;
        }

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    match parse_command(&line) {
                        Ok(Some(SessionCommand::Quit)) => break,
                        Ok(Some(command)) => self.execute(command, out).await?,
                        Ok(None) => {}
                        Err(e) => writeln!(out, "{}", e)?,
                    }
                }
                outcome = self.drafts.wait_for_save() => {
                    report_save(&outcome, out)?;
                }
            }
        }

        if let Some(outcome) = self.drafts.flush() {
            report_save(&outcome, out)?;
        }
        Ok(())
    }

    pub async fn execute<W: Write>(&mut self, command: SessionCommand, out: &mut W) -> Result<()> {
        debug!("Session command: {:?}", command);

        match command {
            SessionCommand::Set(field, value) => match self.form.set_field(field, &value) {
                Ok(()) => self.changed(),
                Err(e) => writeln!(out, "{}", e)?,
            },

            SessionCommand::ToggleSkill(value) => {
                if self.skills.get(&value).is_none() {
                    writeln!(out, "Unknown skill '{}'. Use 'skills' to list them.", value)?;
                } else {
                    let selected = self.form.toggle_skill(&value);
                    writeln!(out, "{} {}", if selected { "Selected" } else { "Deselected" }, value)?;
                    self.changed();
                }
            }

            SessionCommand::ListSkills(query) => {
                let listing: Vec<_> = self
                    .skills
                    .search(&query)
                    .into_iter()
                    .map(|s| SkillListing::new(s, self.skills.is_builtin(&s.value)))
                    .collect();
                write!(out, "{}", self.formatter.format_skills(&listing)?)?;
            }

            SessionCommand::AddSkill(label) => match self.skills.add_skill(&label) {
                Ok(skill) => writeln!(out, "Added {} ({})", skill.label, skill.value)?,
                Err(rejection) => writeln!(out, "{}", rejection)?,
            },

            SessionCommand::RemoveSkill(value) => match self.skills.remove_skill(&value) {
                RemoveOutcome::Removed(skill) => {
                    writeln!(out, "Removed {}", skill.label)?;
                    if self.form.skills.contains(&skill.value) {
                        self.form.toggle_skill(&skill.value);
                        self.changed();
                    }
                }
                RemoveOutcome::BuiltIn => writeln!(out, "Built-in skills cannot be removed")?,
                RemoveOutcome::NotFound => writeln!(out, "No custom skill '{}'", value)?,
            },

            SessionCommand::Show => write!(out, "{}", self.formatter.format_snapshot(&self.form)?)?,

            SessionCommand::Status => {
                write!(out, "{}", self.formatter.format_draft_status(&self.drafts.status())?)?
            }

            SessionCommand::Load => match self.drafts.load_draft() {
                Some(snapshot) => {
                    self.form = snapshot;
                    // Supersede edits still waiting to be saved
                    self.changed();
                    writeln!(out, "Draft restored")?;
                }
                None => writeln!(out, "No draft to restore")?,
            },

            SessionCommand::Clear => {
                self.drafts.clear_draft();
                writeln!(out, "Draft deleted")?;
            }

            SessionCommand::Submit(files) => self.submit(files, out).await?,

            SessionCommand::Help => writeln!(out, "{}", HELP)?,

            SessionCommand::Quit => {}
        }

        Ok(())
    }

    fn changed(&mut self) {
        self.drafts.auto_save(self.form.clone(), self.delay);
    }

    async fn submit<W: Write>(&mut self, files: Vec<PathBuf>, out: &mut W) -> Result<()> {
        let Some(submitter) = &self.submitter else {
            writeln!(out, "Submission is not configured for this session")?;
            return Ok(());
        };

        let result =
            submit::submit_application(&self.form, &files, &submitter.batch, &submitter.client).await;

        match result {
            Ok(outcome) => {
                write!(out, "{}", self.formatter.format_outcome(&outcome)?)?;
                if let SubmissionOutcome::Document(bytes) = &outcome {
                    let path = submit::save_document(bytes, &submitter.download_dir).await?;
                    writeln!(out, "Saved document to {}", path.display())?;
                }
            }
            Err(e @ JobFormError::Validation(_)) => writeln!(out, "{}", e)?,
            Err(e) => {
                error!("Submission failed: {}", e);
                writeln!(out, "Submission failed: {}", e)?;
            }
        }
        Ok(())
    }
}

fn report_save<W: Write>(outcome: &SaveOutcome, out: &mut W) -> Result<()> {
    match outcome {
        SaveOutcome::Saved(at) => {
            let local = at.with_timezone(&chrono::Local);
            writeln!(out, "Saved automatically at {}", local.format("%H:%M:%S"))?;
        }
        SaveOutcome::SkippedEmpty => {}
        SaveOutcome::Failed => writeln!(out, "Auto-save failed, see log")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set() {
        assert_eq!(
            parse_command("set jobTitle  Rust Developer ").unwrap(),
            Some(SessionCommand::Set(FormField::JobTitle, "Rust Developer".to_string()))
        );
        assert_eq!(
            parse_command("set interests").unwrap(),
            Some(SessionCommand::Set(FormField::Interests, String::new()))
        );
        assert!(parse_command("set").is_err());
        assert!(parse_command("set salary 100").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(parse_command("QUIT").unwrap(), Some(SessionCommand::Quit));
        assert_eq!(
            parse_command("submit cv.pdf letter.pdf").unwrap(),
            Some(SessionCommand::Submit(vec![
                PathBuf::from("cv.pdf"),
                PathBuf::from("letter.pdf")
            ]))
        );
        assert_eq!(
            parse_command("add-skill Vue.js").unwrap(),
            Some(SessionCommand::AddSkill("Vue.js".to_string()))
        );
        assert!(parse_command("skill").is_err());
        assert!(parse_command("dance").is_err());
    }
}
