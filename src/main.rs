use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "gradestake")]
#[command(about = "Achievement points and grade wagers for coursework")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.gradestake/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the economy database (overrides [database] path)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file and create the database
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Load a coursework snapshot (profile, courses, assignments, syncs)
    Import {
        /// Snapshot JSON file
        file: PathBuf,

        /// Delete the user's achievements and wagers first
        #[arg(long)]
        reset: bool,
    },

    /// Evaluate and list achievements
    Achievements {
        #[arg(short, long)]
        user: String,
    },

    /// Show total and spendable points
    Points {
        #[arg(short, long)]
        user: String,
    },

    /// Estimate the base score from grade history
    Estimate {
        #[arg(short, long)]
        user: String,

        /// Limit history to one course
        #[arg(long)]
        course: Option<String>,
    },

    /// Quote a wager without placing it
    Odds {
        #[arg(short, long)]
        user: String,

        /// Assignment to wager on
        #[arg(long)]
        item: String,

        /// Required score for this multiplier
        #[arg(long, required_unless_present = "target", conflicts_with = "target")]
        multiplier: Option<f64>,

        /// Multiplier implied by this target score
        #[arg(long)]
        target: Option<f64>,
    },

    /// Place a wager on an upcoming grade
    Wager {
        #[arg(short, long)]
        user: String,

        #[arg(long)]
        item: String,

        #[arg(long)]
        amount: f64,

        #[arg(long)]
        multiplier: f64,
    },

    /// Settle wagers whose grades are available
    Resolve {
        #[arg(short, long)]
        user: String,

        /// Settle only this wager
        #[arg(long)]
        wager: Option<String>,
    },

    /// List wagers, newest first
    Wagers {
        #[arg(short, long)]
        user: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (stderr, so --json output stays parseable)
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Init { force } = cli.command {
        return cli::init::init_command(cli.config, cli.db, force);
    }

    let ctx = cli::Context::load(cli.config.as_deref(), cli.db, cli.json)?;

    match cli.command {
        Commands::Init { .. } => {}
        Commands::Import { file, reset } => {
            cli::import::import_command(&ctx, &file, reset)?;
        }
        Commands::Achievements { user } => {
            cli::achievements::achievements_command(&ctx, &user)?;
        }
        Commands::Points { user } => {
            cli::points::points_command(&ctx, &user)?;
        }
        Commands::Estimate { user, course } => {
            cli::estimate::estimate_command(&ctx, &user, course)?;
        }
        Commands::Odds {
            user,
            item,
            multiplier,
            target,
        } => {
            cli::odds::odds_command(&ctx, &user, &item, multiplier, target)?;
        }
        Commands::Wager {
            user,
            item,
            amount,
            multiplier,
        } => {
            cli::wager::wager_command(&ctx, &user, &item, amount, multiplier)?;
        }
        Commands::Resolve { user, wager } => {
            cli::resolve::resolve_command(&ctx, &user, wager.as_deref())?;
        }
        Commands::Wagers { user } => {
            cli::wagers::wagers_command(&ctx, &user)?;
        }
    }

    Ok(())
}
