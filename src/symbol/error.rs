// Fri Oct 16 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SymbolError {
    #[error("No parameter list in signature: {0}")]
    MissingParameterList(String),
    #[error("Signature has no name component: {0}")]
    EmptyName(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
