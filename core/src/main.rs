use std::process::ExitCode;

use clap::{Parser, Subcommand};
use doable_core::{
    logging, ApiError, ClientConfig, FilterMode, NotificationKind, Notifier, Query,
    RemoteGateway, Renderer, SearchField, SyncController, ToggleAction, ToggleOutcome, View,
};

/// Sync todos from a doable server and print the filtered list.
#[derive(Parser)]
#[command(name = "doable", version)]
struct Cli {
    /// Search text, matched case-insensitively.
    #[arg(short, long, default_value = "")]
    search: String,

    /// 1 = not completed, 2 = all, 3 = completed.
    #[arg(short, long, default_value_t = 2)]
    filter: u8,

    /// 1 = title, 2 = description, 3 = title or description.
    #[arg(long, default_value_t = 3)]
    field: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Mark a todo as completed.
    Check { id: String },
    /// Mark a todo as not completed.
    Uncheck { id: String },
    /// Flip a todo's completion state.
    Toggle { id: String },
}

struct Terminal;

impl Renderer for Terminal {
    fn render(&mut self, view: &View) {
        match view {
            View::Empty(reason) => println!("{}", reason.message()),
            View::Records(records) => {
                for record in records {
                    let mark = match record.action {
                        ToggleAction::Check => "[ ]",
                        ToggleAction::Uncheck => "[x]",
                    };
                    println!("{mark} {} ({}) #{}", record.title, record.badge.label(), record.id);
                    if !record.description.is_empty() {
                        println!("    {}", record.description);
                    }
                }
            }
        }
    }
}

impl Notifier for Terminal {
    fn notify(&mut self, message: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Success => eprintln!("ok: {message}"),
            NotificationKind::Warning => eprintln!("warning: {message}"),
            NotificationKind::Error => eprintln!("error: {message}"),
        }
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<bool, ApiError> {
    let query = Query::new(
        FilterMode::try_from(cli.filter)?,
        SearchField::try_from(cli.field)?,
        cli.search,
    );
    let ctrl = SyncController::new(RemoteGateway::connect(&config)?, Terminal, Terminal)
        .with_query(query);

    let report = ctrl.refresh().await;
    let synced = !report.lists.is_failure() && !report.todos.is_failure();
    let outcome = match cli.command {
        None => return Ok(synced),
        Some(Command::Check { id }) => ctrl.check(&id).await,
        Some(Command::Uncheck { id }) => ctrl.uncheck(&id).await,
        Some(Command::Toggle { id }) => ctrl.toggle(&id).await,
    };
    Ok(matches!(outcome, ToggleOutcome::Applied(_)))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config.log_level);

    match run(cli, config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
