use clap::Args;
use common::fs::FsError;

use crate::state::{AppState, StateError};

/// List every block that must be kept to preserve the private tree and root
#[derive(Args, Debug, Clone)]
pub struct Pins;

#[derive(Debug, thiserror::Error)]
pub enum PinsError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error("pin listing failed: {0}")]
    Fs(#[from] FsError),
}

#[async_trait::async_trait]
impl crate::op::Op for Pins {
    type Error = PinsError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;
        let mut fs = state.open().await?;

        let pins = fs.pin_list().await?;
        if let Some(root) = pins.last() {
            state.write_root(root)?;
        }

        Ok(pins
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
