//! The module contains the error the engine can throw.
//!
//! The errors fall in three families:
//!
//! - [`KeyNotFound`] thrown when a project, donation or user does not exist.
//! - precondition violations ([`ExistingKey`], [`InvalidAmount`],
//!   [`InvalidName`], [`ProjectClosed`], [`ProjectInvested`],
//!   [`TargetBelowInvested`], [`Forbidden`]) thrown before any mutation.
//! - [`InvalidId`] thrown when a stored identifier cannot be parsed.
//! - [`Database`] thrown when the storage fails. The surrounding transaction
//!   is rolled back, so the caller can retry from scratch.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidName`]: EngineError::InvalidName
//!  [`ProjectClosed`]: EngineError::ProjectClosed
//!  [`ProjectInvested`]: EngineError::ProjectInvested
//!  [`TargetBelowInvested`]: EngineError::TargetBelowInvested
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`InvalidId`]: EngineError::InvalidId
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Project \"{0}\" is closed and cannot be edited")]
    ProjectClosed(String),
    #[error("Project \"{0}\" already received funds and cannot be deleted")]
    ProjectInvested(String),
    #[error("Target amount {target} is below the invested amount {invested}")]
    TargetBelowInvested { target: i64, invested: i64 },
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::ProjectClosed(a), Self::ProjectClosed(b)) => a == b,
            (Self::ProjectInvested(a), Self::ProjectInvested(b)) => a == b,
            (
                Self::TargetBelowInvested {
                    target: t1,
                    invested: i1,
                },
                Self::TargetBelowInvested {
                    target: t2,
                    invested: i2,
                },
            ) => t1 == t2 && i1 == i2,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
