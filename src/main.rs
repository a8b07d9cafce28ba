//! jobform: fill in, save and submit job application preferences

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use jobform::cli::{self, Cli, Commands, ConfigAction, DraftAction, SkillAction};
use jobform::config::Config;
use jobform::draft::{DraftStore, FormField};
use jobform::error::{JobFormError, Result};
use jobform::form::{catalog, FormSession, Submitter};
use jobform::input::DocumentBatch;
use jobform::output::{formatter_for, SkillListing};
use jobform::skills::{RemoveOutcome, SkillRegistry};
use jobform::storage::FileStore;
use jobform::submit::{self, SubmissionClient, SubmissionOutcome};
use log::{error, info};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "txt", "md", "markdown"];

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Some(format) = &cli.output {
        match cli::parse_output_format(format) {
            Ok(format) => config.output.format = format,
            Err(e) => {
                error!("{}", e);
                process::exit(1);
            }
        }
    }

    // Execute command
    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_file: Option<PathBuf>) -> Result<()> {
    let formatter = formatter_for(&config.output);

    match command {
        Commands::Form => {
            info!("Starting interactive form session");

            let drafts = DraftStore::initialize(FileStore::open(&config.storage.path)?);
            let skills = SkillRegistry::initialize(FileStore::open(&config.storage.path)?);
            let submitter = Submitter {
                batch: DocumentBatch::new(&config.extraction.page_marker),
                client: SubmissionClient::from_config(&config)?,
                download_dir: config.output.download_dir.clone(),
            };

            println!("Job application form. Type 'help' for commands, 'quit' to leave.");
            let mut session = FormSession::new(drafts, skills, formatter, config.autosave_delay())
                .with_submitter(submitter);

            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            session.run(stdin, &mut stdout).await?;
        }

        Commands::Skills { action } => {
            let mut registry = SkillRegistry::initialize(FileStore::open(&config.storage.path)?);

            match action {
                SkillAction::List { custom, search } => {
                    let found = registry.search(search.as_deref().unwrap_or(""));
                    let listing: Vec<_> = found
                        .into_iter()
                        .map(|s| SkillListing::new(s, registry.is_builtin(&s.value)))
                        .filter(|s| !custom || !s.builtin)
                        .collect();
                    print!("{}", formatter.format_skills(&listing)?);
                }

                SkillAction::Add { label } => match registry.add_skill(&label) {
                    Ok(skill) => println!("✅ Added {} ({})", skill.label, skill.value),
                    Err(rejection) => return Err(JobFormError::InvalidInput(rejection.to_string())),
                },

                SkillAction::Remove { value } => match registry.remove_skill(&value) {
                    RemoveOutcome::Removed(skill) => println!("🗑️  Removed {}", skill.label),
                    RemoveOutcome::BuiltIn => {
                        return Err(JobFormError::InvalidInput(format!(
                            "'{}' is a built-in skill and cannot be removed",
                            value
                        )))
                    }
                    RemoveOutcome::NotFound => {
                        return Err(JobFormError::InvalidInput(format!("No custom skill '{}'", value)))
                    }
                },

                SkillAction::Reset => {
                    registry.reset_to_base_skills();
                    println!("🔄 Custom skills removed, {} built-in skills remain", registry.all_skills().len());
                }
            }
        }

        Commands::Draft { action } => {
            let mut drafts = DraftStore::initialize(FileStore::open(&config.storage.path)?);

            match action {
                DraftAction::Status => print!("{}", formatter.format_draft_status(&drafts.status())?),

                DraftAction::Show => match drafts.load_draft() {
                    Some(snapshot) => print!("{}", formatter.format_snapshot(&snapshot)?),
                    None => println!("No draft saved."),
                },

                DraftAction::Clear => {
                    drafts.clear_draft();
                    println!("🗑️  Draft deleted");
                }
            }
        }

        Commands::Extract { files } => {
            validate_documents(&files)?;

            let batch = DocumentBatch::new(&config.extraction.page_marker);
            let spinner = spinner(&format!("Extracting {} document(s)...", files.len()));
            let result = batch.extract_all(&files).await;
            spinner.finish_and_clear();

            print!("{}", formatter.format_documents(&result?)?);
        }

        Commands::Submit { files } => {
            validate_documents(&files)?;

            let drafts = DraftStore::initialize(FileStore::open(&config.storage.path)?);
            let form = drafts.load_draft().ok_or_else(|| {
                JobFormError::InvalidInput(
                    "No draft saved. Fill in the form with 'jobform form' first.".to_string(),
                )
            })?;

            let batch = DocumentBatch::new(&config.extraction.page_marker);
            let client = SubmissionClient::from_config(&config)?;
            info!("Submitting to {}", client.url());

            let spinner = spinner("Sending application...");
            let result = submit::submit_application(&form, &files, &batch, &client).await;
            spinner.finish_and_clear();

            let outcome = result?;
            print!("{}", formatter.format_outcome(&outcome)?);
            if let SubmissionOutcome::Document(bytes) = &outcome {
                let path = submit::save_document(bytes, &config.output.download_dir).await?;
                println!("📄 Saved document to {}", path.display());
            }
        }

        Commands::Options => print_options(),

        Commands::Config { action } => {
            let path = config_file.unwrap_or_else(Config::config_path);

            match action {
                Some(ConfigAction::Show) | None => {
                    println!("⚙️  Current Configuration ({})\n", path.display());
                    println!("Storage File: {}", config.storage.path.display());
                    println!("Auto-save Delay: {} ms", config.draft.autosave_delay_ms);
                    println!("Submission URL: {}", config.submission_url());
                    println!("Submission Mode: {:?}", config.api.mode);
                    println!("Request Timeout: {} s", config.api.timeout_secs);
                    println!("Page Marker: {}", config.extraction.page_marker);
                    println!("Output Format: {:?}", config.output.format);
                    println!("Download Directory: {}", config.output.download_dir.display());
                }

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    Config::default().save_to(&path)?;
                    println!("✅ Configuration reset successfully!");
                }
            }
        }
    }

    Ok(())
}

fn validate_documents(files: &[PathBuf]) -> Result<()> {
    for file in files {
        cli::validate_file_extension(file, DOCUMENT_EXTENSIONS).map_err(JobFormError::InvalidInput)?;
    }
    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn print_options() {
    for field in FormField::ALL {
        if let Some(options) = field.options() {
            println!("{}:", field.name());
            for option in options {
                println!("  {:<20} {}", option.value, option.label);
            }
            println!();
        }
    }
    println!(
        "radius: 0 to {} km in steps of {} (requires a location)",
        catalog::RADIUS_MAX_KM,
        catalog::RADIUS_STEP_KM
    );
}
