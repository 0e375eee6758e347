use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use gantry::commands::{inspect_release, merge_releases};
use gantry::release::{ArchiveReader, ArchiveWriter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gantry")]
#[command(about = "Release archive tooling for the deployment orchestrator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge two compiled releases of the same name and version into one archive
    #[command(name = "merge-releases")]
    MergeReleases {
        /// Path to the first release archive
        release_1: PathBuf,

        /// Path to the second release archive
        release_2: PathBuf,

        /// Where to write the merged release archive
        target_path: PathBuf,
    },

    /// Show the contents of a local release archive
    #[command(name = "inspect-release")]
    InspectRelease {
        /// Path to the release archive
        path: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::MergeReleases {
            release_1,
            release_2,
            target_path,
        } => merge_releases::execute(
            &ArchiveReader::new(),
            &ArchiveWriter::new(),
            &release_1,
            &release_2,
            &target_path,
        ),
        Commands::InspectRelease { path } => {
            inspect_release::execute(&ArchiveReader::new(), &path)
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "gantry", &mut io::stdout());
            Ok(())
        }
    }
}
