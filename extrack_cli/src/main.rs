use clap::{Args, Parser, Subcommand};
use extrack_core::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "extrack")]
#[command(about = "Exercise log tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register and list users
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Append an exercise to a user's log
    Exercise {
        /// User id
        id: String,

        #[arg(long)]
        description: String,

        /// Duration in minutes
        #[arg(long, allow_hyphen_values = true)]
        duration: String,

        /// Date of the exercise (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show a user's exercise log
    Log {
        /// User id
        id: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Export a user's exercise log as CSV
    Export {
        /// User id
        id: String,

        #[command(flatten)]
        filter: FilterArgs,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    Add { username: String },

    /// List users
    List {
        /// Only users with exactly this name
        #[arg(long)]
        username: Option<String>,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Earliest date to include
    #[arg(long)]
    from: Option<String>,

    /// Latest date to include
    #[arg(long)]
    to: Option<String>,

    /// Maximum number of entries (zero or less shows all)
    #[arg(long, allow_hyphen_values = true)]
    limit: Option<String>,
}

impl FilterArgs {
    fn into_query(self, config: &Config) -> Result<LogQuery> {
        let limit = extrack_core::query::parse_limit(self.limit.as_deref())?;
        Ok(LogQuery {
            from: self.from,
            to: self.to,
            limit,
        }
        .with_default_limit(config.query.default_limit))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    extrack_core::logging::init_with_level(&config.logging.level);

    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());

    match run(cli.command, &data_dir, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_failure(&e),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn run(command: Commands, data_dir: &Path, config: &Config) -> Result<()> {
    let mut log = ExerciseLog::new(JsonFileStore::in_dir(data_dir));

    match command {
        Commands::Users { command } => cmd_users(&mut log, command),
        Commands::Exercise {
            id,
            description,
            duration,
            date,
        } => cmd_exercise(
            &mut log,
            &id,
            NewExercise {
                description,
                duration,
                date,
            },
        ),
        Commands::Log { id, filter } => {
            let view = log.query_log(&id.parse()?, &filter.into_query(config)?)?;
            print_json(&view)
        }
        Commands::Export { id, filter, output } => {
            cmd_export(&log, &id, filter.into_query(config)?, output)
        }
    }
}

fn cmd_users(log: &mut ExerciseLog<JsonFileStore>, command: UserCommands) -> Result<()> {
    let mut directory = UserDirectory::new(log);
    match command {
        UserCommands::Add { username } => print_json(&directory.register(&username)?),
        UserCommands::List { username } => {
            let filter = username.map(UserFilter::username).unwrap_or_default();
            print_json(&directory.list_matching(&filter)?)
        }
    }
}

fn cmd_exercise(
    log: &mut ExerciseLog<JsonFileStore>,
    id: &str,
    exercise: NewExercise,
) -> Result<()> {
    let (_, receipt) = log.append_entry(&id.parse()?, &exercise)?;
    print_json(&receipt)
}

fn cmd_export(
    log: &ExerciseLog<JsonFileStore>,
    id: &str,
    query: LogQuery,
    output: Option<PathBuf>,
) -> Result<()> {
    let user = log.find_user(&id.parse()?)?;

    match output {
        Some(path) => {
            let count = extrack_core::export::export_log_to_path(&user, &query, &path)?;
            eprintln!("✓ Exported {} entries to {}", count, path.display());
        }
        None => {
            let stdout = std::io::stdout();
            extrack_core::export::write_log_csv(&user, &query, stdout.lock())?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Report an operation failure as structured JSON on stdout
fn report_failure(err: &Error) -> ExitCode {
    let failure = Failure::from(err);
    match failure.kind {
        FailureKind::Storage => tracing::error!("Operation failed: {}", err),
        _ => tracing::warn!("Operation rejected: {}", err),
    }

    println!("{}", render_failure(&failure));
    ExitCode::FAILURE
}

fn render_failure(failure: &Failure) -> String {
    serde_json::to_string_pretty(failure)
        .unwrap_or_else(|_| serde_json::json!({ "error": failure.error }).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_is_escaped() {
        let err = Error::Validation("limit must be a whole number: \"1.5\"\nnext".into());
        let rendered = render_failure(&Failure::from(&err));

        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["error"], err.to_string());
        assert_eq!(parsed["kind"], "validation");
    }
}
