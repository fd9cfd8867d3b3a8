use std::io;

use thiserror::Error;

use crate::conll::ConllError;
use crate::dependency::ExtractError;
use crate::tree::MalformedTreeError;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TreeheadError {
    #[error(transparent)]
    ConllError(#[from] ConllError),

    #[error(transparent)]
    ExtractError(#[from] ExtractError),

    #[error("Illegal configuration: {0}")]
    IllegalConfigurationError(String),

    #[error(transparent)]
    IoError(#[from] io::Error),

    #[error(transparent)]
    MalformedTreeError(#[from] MalformedTreeError),

    #[error(transparent)]
    TomlDeserializationError(#[from] toml::de::Error),

    #[error(transparent)]
    UdgraphError(#[from] udgraph::Error),
}
