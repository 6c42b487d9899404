use clap::{Parser, Subcommand};
use colored::*;
use inactive_user_cli::{init_tracing, open_store, Config};
use std::path::PathBuf;
use std::process;

mod cli;

use cli::policy::{self, PreviewArgs};

#[derive(Parser)]
#[command(name = "inactive-user")]
#[command(about = "Manage the inactive user notify / block / delete policy")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current policy with defaults filled in
    Show {
        /// Print the policy as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the current policy as a submission that `apply` accepts
    Export,
    /// Validate and save a complete submission read from a JSON file
    Apply {
        /// JSON object mapping setting keys to values
        file: PathBuf,
    },
    /// Write defaults for every setting that has not been saved yet
    Install,
    /// List the selectable periods
    Periods,
    /// Check a comma-separated list of administrator e-mail addresses
    ValidateEmails {
        /// e.g. "admin@example.com, ops@example.com"
        emails: String,
    },
    /// Print the default text of a notification template
    Template {
        /// notify_text, block_warn_text, block_notify_text, delete_warn_text or delete_notify_text
        kind: String,
    },
    /// Render the saved template of a notification for a sample user
    Preview {
        kind: String,
        #[arg(long, default_value = "jdoe")]
        username: String,
        #[arg(long, default_value = "jdoe@example.com")]
        email: String,
        /// RFC 3339 timestamp of the last login
        #[arg(long)]
        last_access: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    };
    init_tracing(&config);

    if let Err(e) = handle_command(cli.command, &config).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands, config: &Config) -> anyhow::Result<()> {
    // Commands that never touch the database
    match &command {
        Commands::Periods => {
            policy::periods();
            return Ok(());
        }
        Commands::ValidateEmails { emails } => return policy::validate_emails(emails),
        Commands::Template { kind } => return policy::template(kind),
        _ => {}
    }

    let store = open_store(config).await?;

    match command {
        Commands::Show { json } => policy::show(&store, json).await,
        Commands::Export => policy::export(&store).await,
        Commands::Apply { file } => policy::apply(&store, &file).await,
        Commands::Install => policy::install(&store).await,
        Commands::Periods | Commands::ValidateEmails { .. } | Commands::Template { .. } => Ok(()),
        Commands::Preview {
            kind,
            username,
            email,
            last_access,
        } => {
            policy::preview(
                &store,
                config,
                PreviewArgs {
                    kind,
                    username,
                    email,
                    last_access,
                },
            )
            .await
        }
    }
}
