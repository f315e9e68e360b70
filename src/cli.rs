use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::types::ExportFormat;

/// Resume Wizard - tailor a resume to a job posting, step by step
#[derive(Parser)]
#[command(name = "resume-wizard")]
#[command(about = "A guided resume wizard: upload, target a job, score, pay, build, download")]
#[command(version)]
pub struct Cli {
    /// Path to a JSON settings file (see `config init`)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Write logs to this file (the interactive wizard logs nowhere otherwise)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive wizard (default)
    Run {
        /// Directory downloaded resumes are written to
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Drive the wizard non-interactively from files
    Walkthrough(WalkthroughArgs),
    /// Score a resume against a job description and exit
    Score {
        /// Plain-text resume
        #[arg(long)]
        resume_text: PathBuf,
        /// Plain-text job description
        #[arg(long)]
        job_description: PathBuf,
    },
    /// List resume templates
    Templates,
    /// List payment plans
    Plans,
    /// Create or check a settings file
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Args, Debug, Clone)]
pub struct WalkthroughArgs {
    /// Resume document to upload (PDF, DOC or DOCX)
    #[arg(long, conflicts_with = "resume_text", required_unless_present = "resume_text")]
    pub resume: Option<PathBuf>,

    /// Plain-text file to use as pasted resume text
    #[arg(long)]
    pub resume_text: Option<PathBuf>,

    /// Plain-text job description
    #[arg(long)]
    pub job_description: PathBuf,

    /// Template id (see `templates`)
    #[arg(long)]
    pub template: String,

    /// Plan id (see `plans`)
    #[arg(long)]
    pub plan: String,

    /// Extra skill to add before optimization (repeatable)
    #[arg(long = "skill")]
    pub skills: Vec<String>,

    /// Download format (defaults to the settings file's)
    #[arg(long)]
    pub format: Option<ExportFormat>,

    /// Directory the resume is written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Write a JSON session summary here
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a settings file with default values
    Init {
        /// Where to write the file
        path: PathBuf,
    },
    /// Validate a settings file
    Validate {
        /// Path to settings file to validate
        path: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
