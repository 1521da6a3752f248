//! Health Stats CLI
//!
//! Command-line interface for Health Stats:
//! - Register, log in, log out
//! - List, add, update, delete, and export health records
//! - Show per-type statistics

use anyhow::Context;
use chrono::{Duration, Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use healthstats::views::{self, render_page};
use healthstats::{
    guard, App, AppError, Config, HealthRecordUpdate, LoggingConfig, Page, Route, RouteDecision,
};

#[derive(Parser)]
#[command(name = "healthstats")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Track personal health records")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: searched in standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding the config
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Serve records from built-in sample data
    #[arg(long, global = true)]
    pub mock: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    #[command(flatten)]
    Client(ClientCommands),
}

/// Commands that talk to the backend through an [`App`]
#[derive(Subcommand)]
pub enum ClientCommands {
    /// Log in to an existing account
    Login {
        email: String,
        /// Password; prefer this over the prompt, which echoes input
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account and log in
    Register {
        email: String,
        /// Full name; the first word becomes the first name
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
        /// Password; prefer this over the prompt, which echoes input
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Log out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Open a page by path (/, /stats, /profile, /login, /register)
    Open {
        #[arg(default_value = "/")]
        path: String,
    },

    /// Manage health records
    Records {
        #[command(subcommand)]
        command: RecordCommands,
    },

    /// Show per-type statistics
    Stats,
}

#[derive(Subcommand)]
pub enum RecordCommands {
    /// List records, newest first
    List,

    /// Add a record
    Add {
        /// Record type (e.g. weight, heart_rate, steps, sleep)
        record_type: String,
        value: f64,
        unit: String,
        /// Date: "today", "yesterday", or YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Update fields of a record
    Update {
        id: String,
        #[arg(long = "type")]
        record_type: Option<String>,
        #[arg(long)]
        value: Option<f64>,
        #[arg(long)]
        unit: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long, conflicts_with = "clear_notes")]
        notes: Option<String>,
        /// Remove the record's notes
        #[arg(long)]
        clear_notes: bool,
    },

    /// Delete a record
    Delete { id: String },

    /// Export records
    Export {
        /// Output format (csv, json)
        #[arg(short, long, default_value = "csv")]
        format: String,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let command = match cli.command {
        Commands::Config { output } => return write_default_config(output.as_deref()),
        Commands::Client(command) => command,
    };

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if cli.mock {
        config.api.mock_data = true;
    }

    init_logging(&config.logging);
    tracing::debug!(base_url = %config.api.base_url, "Health Stats v{}", env!("CARGO_PKG_VERSION"));

    let app = App::new(config).context("failed to start")?;

    if let Err(e) = run(&app, command).await {
        report(&e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(app: &App, command: ClientCommands) -> Result<(), AppError> {
    match command {
        ClientCommands::Login { email, password } => {
            let password = password_or_prompt(password)?;
            let user = app.login(&email, &password).await?;
            println!("Logged in as {}", user.email);
        }

        ClientCommands::Register {
            email,
            name,
            password,
        } => {
            let password = password_or_prompt(password)?;
            let user = app.register(&email, &password, &name.join(" ")).await?;
            println!("Account created. Logged in as {}", user.email);
        }

        ClientCommands::Logout => {
            app.logout().await?;
            println!("Logged out");
        }

        ClientCommands::Whoami => show(app, Route::Profile).await?,

        ClientCommands::Open { path } => show(app, Route::from_path(&path)).await?,

        ClientCommands::Stats => show(app, Route::Stats).await?,

        ClientCommands::Records { command } => records(app, command).await?,
    }

    Ok(())
}

async fn records(app: &App, command: RecordCommands) -> Result<(), AppError> {
    require_session(app).await?;

    match command {
        RecordCommands::List => show(app, Route::Dashboard).await?,

        RecordCommands::Add {
            record_type,
            value,
            unit,
            date,
            notes,
        } => {
            let date = resolve_date(date.as_deref().unwrap_or("today"))?;
            let record = app
                .add_record(&date, &record_type, value, &unit, notes)
                .await?;
            println!(
                "Added {} {} {} on {} (id {})",
                record.record_type, record.value, record.unit, record.date, record.id
            );
        }

        RecordCommands::Update {
            id,
            record_type,
            value,
            unit,
            date,
            notes,
            clear_notes,
        } => {
            let update = HealthRecordUpdate {
                date: date.as_deref().map(resolve_date).transpose()?,
                record_type,
                value,
                unit,
                notes: if clear_notes { Some(None) } else { notes.map(Some) },
            };
            if update.is_empty() {
                println!("Nothing to update");
                return Ok(());
            }

            let record = app.update_record(&id, update).await?;
            println!("Updated {}", record.id);
        }

        RecordCommands::Delete { id } => {
            app.delete_record(&id).await?;
            println!("Deleted {}", id);
        }

        RecordCommands::Export { format, output } => {
            let records = app.list_records().await?;
            let mut data = Vec::new();

            match format.as_str() {
                "json" => {
                    let json = views::to_json(&records)
                        .map_err(|e| AppError::Export(e.to_string()))?;
                    data.extend_from_slice(json.as_bytes());
                    data.push(b'\n');
                }
                "csv" => views::write_csv(&records, &mut data)
                    .map_err(|e| AppError::Export(e.to_string()))?,
                other => {
                    return Err(AppError::InvalidInput(format!(
                        "unknown export format: {}",
                        other
                    )))
                }
            }

            match output {
                Some(path) => {
                    std::fs::write(&path, &data)?;
                    println!("Exported {} records to {:?}", records.len(), path);
                }
                None => std::io::stdout().write_all(&data)?,
            }
        }
    }

    Ok(())
}

/// Render the route through the guard, running the startup check once
async fn show(app: &App, route: Route) -> Result<(), AppError> {
    app.ensure_started().await;
    let page = app.open(route).await?;

    match page {
        Page::Redirect(_) | Page::Loading => {
            eprintln!("{}", render_page(&page));
            std::process::exit(1);
        }
        page => println!("{}", render_page(&page)),
    }

    Ok(())
}

/// Resolve the session and stop unless it allows protected pages
async fn require_session(app: &App) -> Result<(), AppError> {
    let state = app.ensure_started().await;

    match guard(&state, Route::Dashboard) {
        RouteDecision::Render(_) => Ok(()),
        RouteDecision::Redirect(target) => {
            eprintln!("{}", render_page(&Page::Redirect(target)));
            std::process::exit(1);
        }
        RouteDecision::Loading => Err(AppError::NotAuthenticated),
    }
}

fn report(error: &AppError) {
    eprintln!("{}", views::form_error(error));

    if let AppError::Records(e) = error {
        if e.is_unauthorized() {
            eprintln!("Your session may have expired. Run `healthstats login` again.");
        }
    }
}

/// The prompt reads a plain line from stdin, so typed characters are visible.
/// Scripts and shared terminals should pass `--password` instead.
fn password_or_prompt(password: Option<String>) -> Result<String, AppError> {
    if let Some(password) = password {
        return Ok(password);
    }

    eprint!("Password (input is visible; use --password to skip): ");
    std::io::stderr().flush()?;

    read_password(std::io::stdin().lock())
}

fn read_password<R: BufRead>(mut reader: R) -> Result<String, AppError> {
    let mut line = String::new();
    reader.read_line(&mut line)?;

    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(AppError::InvalidInput(
            "password must not be empty".to_string(),
        ));
    }
    Ok(password)
}

/// Accept "today", "yesterday", or a YYYY-MM-DD date
fn resolve_date(input: &str) -> Result<String, AppError> {
    let today = Local::now().date_naive();

    let date = match input.trim() {
        "today" => today,
        "yesterday" => today - Duration::days(1),
        s => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| {
                AppError::InvalidInput(format!("invalid date {:?}, expected YYYY-MM-DD", s))
            })?,
    };

    Ok(date.format("%Y-%m-%d").to_string())
}

fn write_default_config(output: Option<&std::path::Path>) -> anyhow::Result<()> {
    let config = healthstats::config::generate_default_config();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)
                .with_context(|| format!("failed to write {:?}", path))?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", config),
    }

    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("healthstats={}", config.level)));

    let json = config.format.eq_ignore_ascii_case("json");

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}
