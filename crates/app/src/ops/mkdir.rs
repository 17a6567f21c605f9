use clap::Args;
use common::fs::FsError;

use crate::state::{AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Mkdir {
    /// Directory to create, parents included
    pub path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MkdirError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error("mkdir failed: {0}")]
    Fs(#[from] FsError),
}

#[async_trait::async_trait]
impl crate::op::Op for Mkdir {
    type Error = MkdirError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;
        let mut fs = state.open().await?;

        let root = fs.mkdir(&self.path).await?;
        state.write_root(&root)?;

        Ok(root.to_string())
    }
}
