use clap::{Parser, Subcommand};

mod commands;
mod logging;
mod tui;

#[derive(Parser)]
#[command(
    name = "power1440",
    version,
    about = "1440 Power System -- budget the minutes of your day"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive planner (default)
    Tui,
    /// Compute a plan without the interactive view and print it as JSON
    Plan(commands::plan::PlanArgs),
    /// Print minutes remaining in the current local day
    Clock,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);

    logging::init(match command {
        Commands::Tui => logging::LogTarget::File,
        _ => logging::LogTarget::Stderr,
    });

    let result = match command {
        Commands::Tui => tui::run(),
        Commands::Plan(args) => commands::plan::run(args),
        Commands::Clock => commands::clock::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
