use crate::demo::{run_completion_report, run_demo, run_roster_import, CompletionArgs, RosterArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use student_erp::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Student Onboarding ERP",
    about = "Run the student onboarding service and its administration tooling",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a profile document against an optional visibility configuration
    Completion(CompletionArgs),
    /// Roster administration
    Roster {
        #[command(subcommand)]
        command: RosterCommand,
    },
    /// Walk through registration, batch assignment, and profile completion
    Demo,
}

#[derive(Subcommand, Debug)]
enum RosterCommand {
    /// Register every student in a CSV roster and print the batch summary
    Import(RosterArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Completion(args) => run_completion_report(args),
        Command::Roster {
            command: RosterCommand::Import(args),
        } => run_roster_import(args),
        Command::Demo => run_demo(),
    }
}
