pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dagfs")]
#[command(about = "A content-addressed file system with a public and an encrypted private tree")]
#[command(version)]
pub struct Args {
    /// Path to the dagfs state directory (defaults to ~/.dagfs)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG overrides
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: crate::Command,
}
