use thiserror::Error;

use crate::config::ConfigError;
use crate::descriptor::DescriptorError;
use crate::rewrite::RewriteError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    #[error("Invalid lockfile JSON: {0}")]
    Json(#[from] serde_json::Error),
}
