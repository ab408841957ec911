use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "showcase-cli", version, about = "Weekly Showcase CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Subject management
    Subject {
        #[command(subcommand)]
        action: commands::subject::SubjectAction,
    },
    /// Class management
    Class {
        #[command(subcommand)]
        action: commands::class::ClassAction,
    },
    /// Roster management
    Student {
        #[command(subcommand)]
        action: commands::student::StudentAction,
    },
    /// Drive a presentation session for a class
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Participation reports
    Report {
        #[command(subcommand)]
        action: commands::report::ReportAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Subject { action } => commands::subject::run(action),
        Commands::Class { action } => commands::class::run(action),
        Commands::Student { action } => commands::student::run(action),
        Commands::Session { action } => commands::session::run(action),
        Commands::Report { action } => commands::report::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
