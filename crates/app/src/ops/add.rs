use std::path::PathBuf;

use clap::Args;
use common::fs::FsError;

use crate::state::{AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Add {
    /// Destination, starting with public/ or private/
    pub path: String,

    /// Local file to read the content from
    pub source: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum AddError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error("add failed: {0}")]
    Fs(#[from] FsError),
    #[error("could not read {0}: {1}")]
    Source(PathBuf, std::io::Error),
}

#[async_trait::async_trait]
impl crate::op::Op for Add {
    type Error = AddError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let content = tokio::fs::read(&self.source)
            .await
            .map_err(|e| AddError::Source(self.source.clone(), e))?;

        let state = AppState::load(ctx.config_path.clone())?;
        let mut fs = state.open().await?;

        let root = fs.add(&self.path, &content).await?;
        state.write_root(&root)?;
        tracing::info!("added {} bytes at {}", content.len(), self.path);

        Ok(root.to_string())
    }
}
