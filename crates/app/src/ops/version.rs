use clap::Args;
use common::fs::FileSystemVersion;

#[derive(Args, Debug, Clone)]
pub struct Version;

#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    #[error("Version operation failed: {0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl crate::op::Op for Version {
    type Error = VersionError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        Ok(format!(
            "{} {} (newest format {})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            FileSystemVersion::latest()
        ))
    }
}
