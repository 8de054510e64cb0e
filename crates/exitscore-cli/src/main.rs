//! exitscore CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "exitscore",
    version,
    about = "Business sale-readiness assessment and scoring"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a set of answers
    Score {
        /// JSON file with an array of answers or a full submission
        #[arg(long)]
        responses: PathBuf,

        /// Question schema (JSON or TOML)
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Process a quiz submission into an assessment report
    Assess {
        /// Submission JSON file
        #[arg(long)]
        submission: PathBuf,

        /// Question schema (JSON or TOML)
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, markdown, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Provider that drafts the advisory report
        #[arg(long)]
        provider: Option<String>,

        /// Skip the written advisory report
        #[arg(long)]
        no_narrative: bool,
    },

    /// Compare two assessment reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Exit code 1 if any score went down
        #[arg(long)]
        fail_on_decline: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate a question schema
    Validate {
        /// Question schema (JSON or TOML)
        #[arg(long)]
        schema: Option<PathBuf>,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and question schema
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("exitscore=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            responses,
            schema,
            format,
        } => commands::score::execute(responses, schema, format),
        Commands::Assess {
            submission,
            schema,
            config,
            output,
            format,
            provider,
            no_narrative,
        } => {
            commands::assess::execute(
                submission,
                schema,
                config,
                output,
                format,
                provider,
                no_narrative,
            )
            .await
        }
        Commands::Compare {
            baseline,
            current,
            fail_on_decline,
            format,
        } => commands::compare::execute(baseline, current, fail_on_decline, format),
        Commands::Validate { schema } => commands::validate::execute(schema),
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
