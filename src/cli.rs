use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal chat assistant with weather, search, notes and reminders", long_about = None)]
pub struct Args {
    /// Completion model to use
    #[arg(short, long)]
    pub model: Option<String>,

    /// SQLite database for notes and reminders
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Directory that /save writes conversation files to
    #[arg(long)]
    pub save_dir: Option<PathBuf>,

    /// Alternate config file (default: ~/.pchat/config.yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
