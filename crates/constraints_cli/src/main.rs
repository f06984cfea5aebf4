mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "constrain")]
#[command(version, about = "Constraint expression engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate JSON or YAML data against a schema
    Validate {
        /// Path to the schema file (YAML, TOML or JSON)
        schema: String,

        /// Path to the data file (JSON or YAML); a top-level array is a batch
        data: String,

        /// Skip unknown rules and malformed parameters instead of failing
        #[arg(short, long)]
        lenient: bool,

        /// Accept a trailing `>` with nothing after it
        #[arg(long)]
        allow_trailing_dive: bool,

        /// Output format: text, json
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Check every expression of a schema without validating data
    Check {
        /// Path to the schema file (YAML, TOML or JSON)
        schema: String,

        /// Skip unknown rules and formats instead of failing
        #[arg(short, long)]
        lenient: bool,

        /// Accept a trailing `>` with nothing after it
        #[arg(long)]
        allow_trailing_dive: bool,

        /// Output format: text, json
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Show how an expression splits into levels, keys and rule groups
    Explain {
        /// The expression, e.g. "empty=false > format=alpha"
        expression: String,

        /// Skip unknown rules and formats instead of failing
        #[arg(short, long)]
        lenient: bool,

        /// Accept a trailing `>` with nothing after it
        #[arg(long)]
        allow_trailing_dive: bool,

        /// Output format: text, json
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Commands::Validate {
            schema,
            data,
            lenient,
            allow_trailing_dive,
            format,
        } => {
            let context = commands::context(lenient, allow_trailing_dive);
            commands::validate::execute(&schema, &data, context, &format)
        }

        Commands::Check {
            schema,
            lenient,
            allow_trailing_dive,
            format,
        } => {
            let context = commands::context(lenient, allow_trailing_dive);
            commands::check::execute(&schema, context, &format)
        }

        Commands::Explain {
            expression,
            lenient,
            allow_trailing_dive,
            format,
        } => {
            let context = commands::context(lenient, allow_trailing_dive);
            commands::explain::execute(&expression, context, &format)
        }
    }
}
