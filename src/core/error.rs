use thiserror::Error;

#[derive(Error, Debug)]
pub enum MindError {
    #[error("Monster not found: {0:?}")]
    MonsterNotFound(crate::core::types::MonsterHandle),

    #[error("Squad contract violated: {0}")]
    SquadContract(&'static str),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, MindError>;
