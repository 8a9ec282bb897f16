//! Top-level error for the binary

use crate::words::CatalogError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
    #[error("word bank: {0}")]
    Catalog(#[from] CatalogError),
}
