use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to load books: {0}")]
    Load(String),

    #[error("Save failed: {0}")]
    Save(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Registration failed: {0}")]
    Registration(String),

    #[error("Not in edit mode (run with edit mode enabled first)")]
    NotEditing,

    #[error("Server responded with HTTP {0}")]
    UnexpectedStatus(u16),

    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
