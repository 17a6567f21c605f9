use clap::Args;
use common::fs::FsError;

use crate::state::{AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Cat {
    /// File to print, starting with public/ or private/
    pub path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CatError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error("cat failed: {0}")]
    Fs(#[from] FsError),
    #[error("no such file: {0}")]
    NoSuchFile(String),
}

#[async_trait::async_trait]
impl crate::op::Op for Cat {
    type Error = CatError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;
        let fs = state.open().await?;

        let content = fs
            .cat(&self.path)
            .await?
            .ok_or_else(|| CatError::NoSuchFile(self.path.clone()))?;

        Ok(String::from_utf8_lossy(&content).into_owned())
    }
}
