//! Stance CLI — stability analysis of planar rigid-body assemblies.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "stance")]
#[command(version, about = "Stance — does a planar block assembly stand or collapse?")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an assembly described by a JSON file.
    Analyze {
        /// Path to the assembly file.
        path: String,

        /// Print the machine-readable report instead of the tables.
        #[arg(long)]
        json: bool,

        /// Also print the telemetry events of the run.
        #[arg(long)]
        events: bool,

        /// TOML configuration overriding the file's own settings.
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Run the built-in reference scenarios.
    Scenarios {
        /// Which scenario to run (two_body_collapse, two_body_stands,
        /// three_body_collapse, three_body_stands, all).
        #[arg(short, long, default_value = "all")]
        scenario: String,

        /// Output CSV file path.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Validate an assembly file (JSON/TOML) or a TOML configuration.
    Validate {
        /// Path to the assembly or configuration file.
        path: String,
    },

    /// Print the equilibrium matrix of an assembly file.
    Matrix {
        /// Path to the assembly file.
        path: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            path,
            json,
            events,
            config,
        } => commands::analyze(&path, json, events, config.as_deref()),
        Commands::Scenarios { scenario, output } => {
            commands::scenarios(&scenario, output.as_deref())
        }
        Commands::Validate { path } => commands::validate(&path),
        Commands::Matrix { path } => commands::matrix(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
