use clap::Args;
use common::fs::FsError;

use crate::state::{AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Ls {
    /// Directory to list, starting with public/ or private/
    pub path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LsError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error("ls failed: {0}")]
    Fs(#[from] FsError),
}

#[async_trait::async_trait]
impl crate::op::Op for Ls {
    type Error = LsError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;
        let fs = state.open().await?;
        let links = fs.ls(&self.path).await?;

        if links.is_empty() {
            return Ok("(empty)".to_string());
        }

        let output = links
            .values()
            .map(|link| match (link.is_file, link.size) {
                (true, Some(size)) => format!("f {:>10} {} ({})", size, link.name, link.cid),
                (true, None) => format!("f {:>10} {} ({})", "-", link.name, link.cid),
                (false, _) => format!("d {:>10} {}/ ({})", "-", link.name, link.cid),
            })
            .collect::<Vec<_>>()
            .join("\n");
        Ok(output)
    }
}
