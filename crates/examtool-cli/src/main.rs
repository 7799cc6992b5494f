//! examtool CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "examtool",
    version,
    about = "Command-line client for the EXAM service and exam markup importer"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get information about an EXAM object, or objects
    Get {
        #[command(subcommand)]
        subject: GetSubject,
    },

    /// Add objects to an exam. Use `remove` to unlink them again
    Add {
        #[command(subcommand)]
        subject: AddSubject,
    },

    /// Edit an EXAM object. Usually replaces the old object completely
    Edit {
        #[command(subcommand)]
        subject: EditSubject,
    },

    /// Unlink an object from an exam without deleting it
    Remove {
        #[command(subcommand)]
        subject: RemoveSubject,
    },

    /// Permanently delete an object and remove it everywhere it is used
    Delete {
        #[command(subcommand)]
        subject: DeleteSubject,
    },

    /// Create new objects. Use `delete` to permanently delete them
    Create {
        #[command(subcommand)]
        subject: CreateSubject,
    },

    /// Import an exam from a parsed JSON or markup file. Deletes the exam's
    /// sections and previously imported questions first!
    Import {
        /// Exam ID, found in the URL when editing the exam
        exam_id: u64,

        /// Question owner ID, found e.g. by getting all exams
        owner_id: u64,

        /// Exam file (.json from `parse`, anything else is read as markup)
        file: PathBuf,
    },

    /// Parse an exam markup file and print it as JSON
    Parse {
        /// Exam markup file
        path: PathBuf,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Check an exam file against the rules the EXAM service enforces
    Validate {
        /// Exam file (.json or markup)
        file: PathBuf,
    },

    /// Create a starter config and example exam
    Init,
}

#[derive(Subcommand)]
pub enum GetSubject {
    /// Exams you are a reviewer of
    Exams,
    /// A single exam
    Exam {
        /// Exam ID, found in the URL when editing the exam
        exam_id: u64,
    },
    /// All questions in the question bank
    Questions,
}

#[derive(Subcommand)]
pub enum AddSubject {
    /// Attach a bank question to a section
    Question {
        exam_id: u64,
        /// Section ID, listed under `examSections` when getting an exam
        section_id: u64,
        sequence_number: u32,
        question_id: u64,
    },
}

#[derive(Subcommand)]
pub enum EditSubject {
    /// Replace a section's name, description and lottery settings
    Section {
        exam_id: u64,
        section_id: u64,
        name: String,
        description: String,
        #[arg(long)]
        lottery_on: bool,
        #[arg(long)]
        lottery_item_count: Option<u32>,
    },
    /// Replace a bank question
    Question {
        question_id: u64,
        owner_id: u64,
        default_max_score: u32,
        /// Question body (HTML)
        question: String,
        /// Options as JSON, e.g. '[{"id": 1, "option": "a", "correctOption": true}]'
        options: String,
        /// Extra tags as a JSON list of strings
        #[arg(long, default_value = "[]")]
        tags: String,
    },
}

#[derive(Subcommand)]
pub enum RemoveSubject {
    /// Unlink a question from a section
    Question {
        exam_id: u64,
        section_id: u64,
        question_id: u64,
    },
}

#[derive(Subcommand)]
pub enum DeleteSubject {
    /// Delete a section from an exam
    Section { exam_id: u64, section_id: u64 },
    /// Delete a question from the question bank
    Question { question_id: u64 },
}

#[derive(Subcommand)]
pub enum CreateSubject {
    /// Create an empty section; name it with `edit section`
    Section { exam_id: u64 },
    /// Create a multiple-choice bank question
    Question {
        owner_id: u64,
        default_max_score: u32,
        /// Question body (HTML)
        question: String,
        /// Options as JSON, e.g. '[{"option": "a", "correctOption": true}, {"option": "b"}]'
        options: String,
        /// Extra tags as a JSON list of strings
        #[arg(long, default_value = "[]")]
        tags: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("examtool=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Get { subject } => commands::api::get(subject, config).await,
        Commands::Add { subject } => commands::api::add(subject, config).await,
        Commands::Edit { subject } => commands::api::edit(subject, config).await,
        Commands::Remove { subject } => commands::api::remove(subject, config).await,
        Commands::Delete { subject } => commands::api::delete(subject, config).await,
        Commands::Create { subject } => commands::api::create(subject, config).await,
        Commands::Import {
            exam_id,
            owner_id,
            file,
        } => commands::import::execute(exam_id, owner_id, file, config).await,
        Commands::Parse { path, pretty } => commands::parse::execute(path, pretty),
        Commands::Validate { file } => commands::validate::execute(file),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
