use clap::Args;
use common::fs::FileSystemVersion;

use crate::state::{AppConfig, AppState};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Name of the key that will open the private tree
    #[arg(long, default_value = common::fs::DEFAULT_KEY_NAME)]
    pub key_name: String,

    /// Format version for new nodes (unrecognised values mean 0.0.0)
    #[arg(long)]
    pub format_version: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] crate::state::StateError),
}

#[async_trait::async_trait]
impl crate::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let version = self
            .format_version
            .as_deref()
            .map(FileSystemVersion::parse_lossy)
            .unwrap_or_else(FileSystemVersion::latest);
        let config = AppConfig {
            key_name: self.key_name.clone(),
            version,
            ..AppConfig::default()
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let output = format!(
            "Initialized dagfs directory at: {}\n\
             - Blobs: {}\n\
             - Keys: {}\n\
             - Config: {}\n\
             - Private key name: {}\n\
             - Format version: {}",
            state.dagfs_dir.display(),
            state.blobs_path.display(),
            state.keys_path.display(),
            state.config_path.display(),
            state.config.key_name,
            state.config.version,
        );

        Ok(output)
    }
}
