use crate::config::ConfigError;

/// Failure to bring the credible layer up. Once running, hooks never fail.
#[derive(Debug, thiserror::Error)]
pub enum CredibleLayerError {
    #[error("invalid credible layer configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to start sidecar client: {0}")]
    Client(#[from] sidecar_client::BuildError),
}
