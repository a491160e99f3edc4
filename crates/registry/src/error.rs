//! The module contains the errors the registry can throw.

use sea_orm::DbErr;
use thiserror::Error;

/// Registry custom errors.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("invalid role: {0}")]
    InvalidRole(String),
    #[error("invalid membership event kind: {0}")]
    InvalidEventKind(String),
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for RegistryError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidRole(a), Self::InvalidRole(b)) => a == b,
            (Self::InvalidEventKind(a), Self::InvalidEventKind(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
