//! eduflex CLI: take quizzes, analyze gradesheets and browse courses.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(
    name = "eduflex",
    version,
    about = "Adaptive quizzes and course recommendations"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for quiz and gradesheet results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Output format for progress summaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProgressFormat {
    Text,
    Markdown,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List quiz subjects
    Subjects {
        /// Ask the quiz backend instead of the configured bank
        #[arg(long)]
        remote: bool,
    },

    /// Take a quiz and get course recommendations
    Quiz {
        /// Quiz subject
        #[arg(long)]
        subject: String,

        /// Student name
        #[arg(long)]
        name: String,

        /// Student age
        #[arg(long)]
        age: u32,

        /// Answers as "0=A,1=C,..."; prompts interactively when omitted
        #[arg(long)]
        answers: Option<String>,

        /// Grade with the quiz backend instead of locally
        #[arg(long)]
        remote: bool,

        /// Save a JSON report to the output directory
        #[arg(long)]
        save: bool,

        /// Output directory (overrides config)
        #[arg(long)]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Find weak subjects in a gradesheet and recommend courses
    Analyze {
        /// Gradesheet file (.csv with subject,score rows or .json)
        #[arg(long)]
        gradesheet: PathBuf,

        /// Weakness threshold (overrides config)
        #[arg(long)]
        threshold: Option<f64>,

        /// Only report the lowest-scoring subjects
        #[arg(long, conflicts_with = "threshold")]
        weakest_only: bool,

        /// Upload to the quiz backend instead of analyzing locally
        #[arg(long)]
        remote: bool,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Browse the course catalog
    Courses {
        /// Subject to recommend for
        #[arg(long, required_unless_present = "search")]
        subject: Option<String>,

        /// Difficulty tier: beginner, intermediate or advanced
        #[arg(long, requires = "subject")]
        tier: Option<String>,

        /// Search local catalog course names instead
        #[arg(long)]
        search: Option<String>,
    },

    /// Search or list quiz questions in the configured bank
    Questions {
        /// Text to search for in question prompts
        #[arg(long)]
        search: Option<String>,

        /// List every question of a subject
        #[arg(long, conflicts_with = "search")]
        subject: Option<String>,
    },

    /// Talk to the career advice bot
    Chat {
        /// Single message; starts an interactive chat when omitted
        #[arg(long)]
        message: Option<String>,

        /// Seed for reproducible replies
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Summarize saved quiz reports
    Progress {
        /// Report directory (overrides config)
        #[arg(long)]
        dir: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "text")]
        format: ProgressFormat,
    },

    /// Validate question bank and catalog files
    Validate {
        /// Question bank file or directory
        #[arg(long, required_unless_present = "catalog")]
        bank: Option<PathBuf>,

        /// Course catalog file
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Create a starter config, question bank and catalog
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("eduflex=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Subjects { remote } => commands::subjects::execute(remote, config).await,
        Commands::Quiz {
            subject,
            name,
            age,
            answers,
            remote,
            save,
            output,
            format,
        } => {
            commands::quiz::execute(commands::quiz::QuizArgs {
                subject,
                name,
                age,
                answers,
                remote,
                save,
                output,
                format,
                config,
            })
            .await
        }
        Commands::Analyze {
            gradesheet,
            threshold,
            weakest_only,
            remote,
            format,
        } => {
            commands::analyze::execute(gradesheet, threshold, weakest_only, remote, format, config)
                .await
        }
        Commands::Courses {
            subject,
            tier,
            search,
        } => commands::courses::execute(subject, tier, search, config).await,
        Commands::Questions { search, subject } => {
            commands::questions::execute(search, subject, config)
        }
        Commands::Chat { message, seed } => commands::chat::execute(message, seed),
        Commands::Progress { dir, format } => commands::progress::execute(dir, format, config),
        Commands::Validate { bank, catalog } => commands::validate::execute(bank, catalog),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
