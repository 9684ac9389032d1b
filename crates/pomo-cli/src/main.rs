use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "pomo",
    version,
    about = "A pomodoro timer that tracks your sessions and analyzes your productivity"
)]
struct Cli {
    #[command(flatten)]
    timer: commands::timer::TimerArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report pomodoro statistics for a time period
    Report(commands::report::ReportArgs),
    /// Analyze productivity patterns and trends
    Analyze {
        #[command(subcommand)]
        action: commands::analyze::AnalyzeAction,
    },
    /// Manage and track pomodoro goals
    Goals {
        #[command(subcommand)]
        action: commands::goals::GoalsAction,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Some(Commands::Report(args)) => commands::report::run(args),
        Some(Commands::Analyze { action }) => commands::analyze::run(action),
        Some(Commands::Goals { action }) => commands::goals::run(action),
        None => commands::timer::run(cli.timer).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
