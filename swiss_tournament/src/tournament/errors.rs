//! Tournament error types.

use sqlx::error::ErrorKind;
use thiserror::Error;

use super::models::PlayerId;

/// Tournament errors
#[derive(Debug, Error)]
pub enum TournamentError {
    /// A match report referenced a player that is not registered
    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    /// Odd player count but every active player already had a bye
    #[error("No player is eligible for a bye")]
    NoEligiblePlayer,

    /// A player cannot be reported as both winner and loser
    #[error("Player {0} cannot play against themselves")]
    SelfMatch(PlayerId),

    /// Player name was empty or whitespace
    #[error("Player name must not be blank")]
    InvalidName,

    /// Underlying database unreachable or query failed
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(sqlx::Error),

    /// A write broke a uniqueness, key or range constraint
    #[error("Conflicting record: {0}")]
    Conflict(String),

    /// Commit or rollback failed in a non-SQL store
    #[error("Transaction failed: {0}")]
    Transaction(String),
}

impl From<sqlx::Error> for TournamentError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if matches!(
                db.kind(),
                ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
            ) {
                return TournamentError::Conflict(db.message().to_string());
            }
        }
        TournamentError::StoreUnavailable(err)
    }
}

impl TournamentError {
    /// Get a client-safe error message
    ///
    /// Store errors are reduced to a generic message so connection strings and SQL
    /// never reach the caller's output.
    pub fn client_message(&self) -> String {
        match self {
            TournamentError::StoreUnavailable(_) | TournamentError::Transaction(_) => {
                "Record store unavailable".to_string()
            }
            TournamentError::Conflict(_) => "Conflicting tournament record".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for tournament operations
pub type TournamentResult<T> = Result<T, TournamentError>;
