use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Terminal front-end for the resume screening service.
#[derive(Debug, Parser)]
#[command(name = "screener", version)]
pub struct Cli {
    /// Base URL of the screening server.
    #[arg(
        long,
        env = "SCREENER_SERVER",
        default_value = "http://127.0.0.1:5000",
        global = true
    )]
    pub server: String,

    /// Log more detail; repeat for trace output.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List rubrics available for screening and previously uploaded ones.
    Rubrics,
    /// Upload a rubric advertisement and store the extracted rubrics.
    AddRubric {
        /// Name to store the extracted rubrics under.
        #[arg(long)]
        name: String,
        /// Advertisement file (PDF).
        file: PathBuf,
    },
    /// Evaluate resume files against one or more rubrics.
    Check {
        /// Rubric identifier to screen against; repeatable.
        #[arg(long = "rubric")]
        rubrics: Vec<String>,
        /// Resume files to evaluate.
        files: Vec<PathBuf>,
        /// Directory to save the aggregate report into, when the server
        /// offers one.
        #[arg(long)]
        report_dir: Option<PathBuf>,
    },
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
