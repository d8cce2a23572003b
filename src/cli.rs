use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ytsum::summarize::Mode;

#[derive(Parser)]
#[command(
    name = "ytsum",
    about = "Summarize YouTube videos from their captions",
    version
)]
pub struct Cli {
    /// Config file (default: ~/.config/ytsum/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Show configuration and progress on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the web UI (default)
    Serve {
        /// Address to listen on, overrides the config file
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Summarize one video and print the result
    Summarize {
        /// YouTube video URL
        url: String,

        /// Summary type
        #[arg(short, long, value_enum, default_value_t = Mode::Detailed)]
        mode: Mode,
    },

    /// Print the joined transcript of one video
    Transcript {
        /// YouTube video URL
        url: String,
    },
}
