use std::path::PathBuf;

use thiserror::Error;

/// Fatal problems detected before any synthesis request is made
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no API key given; pass --key or set speechkit.key in the config file")]
    MissingCredential,

    #[error("cannot read input {path:?}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open output {path:?}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}
