use clap::Args;
use common::fs::FsError;

use crate::state::{AppState, StateError};

/// Write out the current trees and record the root
#[derive(Args, Debug, Clone)]
pub struct Sync;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error("sync failed: {0}")]
    Fs(#[from] FsError),
}

#[async_trait::async_trait]
impl crate::op::Op for Sync {
    type Error = SyncError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;
        let mut fs = state.open().await?;

        let root = fs.sync().await?;
        state.write_root(&root)?;

        Ok(root.to_string())
    }
}
