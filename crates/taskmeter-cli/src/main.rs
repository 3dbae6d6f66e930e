use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "taskmeter", version, about = "Taskmeter CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive timer session (commands are read from stdin)
    Session {
        /// Emit events as JSON lines instead of text
        #[arg(long)]
        json: bool,
    },
    /// Project a principal forward with daily compounding
    Project(commands::project::ProjectArgs),
    /// Compute earnings from elapsed seconds per task
    Earnings(commands::earnings::EarningsArgs),
    /// List configured tasks
    Tasks {
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TASKMETER_LOG")
                .unwrap_or_else(|_| EnvFilter::new("taskmeter=warn,taskmeter_core=warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Session { json } => commands::session::run(json),
        Commands::Project(args) => commands::project::run(args),
        Commands::Earnings(args) => commands::earnings::run(args),
        Commands::Tasks { json } => commands::tasks::run(json),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
