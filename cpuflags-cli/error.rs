use std::io;
use thiserror::Error;

use cpuflags_raw::RegistryError;

#[derive(Error, Debug)]
pub enum CpuflagsError {
    #[error("Registry error: {0}")]
    RegistryError(#[from] RegistryError),

    #[error("Affinity operation failed: {0}")]
    AffinityError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("System call failed: {0}")]
    NixError(#[from] nix::Error),

    #[error("Unsupported architecture: {0}")]
    UnsupportedArchitecture(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CpuflagsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nix_errors_convert() {
        let err: CpuflagsError = nix::Error::EINVAL.into();
        assert!(matches!(err, CpuflagsError::NixError(nix::Error::EINVAL)));
        assert!(err.to_string().starts_with("System call failed"));
    }
}
