use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "arascribe",
    version,
    about = "Transcribe Arabic speech from video URLs and translate it into English"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download, transcribe and translate a batch of video URLs
    Process {
        /// Video URLs; read from --input or stdin (one per line) when omitted
        urls: Vec<String>,

        /// File with one URL per line
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory the transcript archive is written to
        #[arg(long, default_value = ".")]
        export_dir: PathBuf,

        /// Skip writing the transcript archive
        #[arg(long)]
        no_export: bool,

        /// OpenAI API key used for transcription and translation
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: String,
    },

    /// Verify external tools and service availability
    Check {
        /// OpenAI API key to validate; skipped when empty
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, default_value = "")]
        api_key: String,
    },
}
