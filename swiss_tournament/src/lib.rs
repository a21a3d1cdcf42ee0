//! # Swiss Tournament
//!
//! Standings, byes and pairings for a Swiss-system tournament.
//!
//! ## Architecture
//!
//! The engine never holds a global connection. A [`tournament::TournamentManager`]
//! is built around an injected [`db::RecordStore`] and runs each operation as one
//! store transaction:
//!
//! - **Standings**: players ranked by wins, ties by registration order
//! - **Bye**: with an odd number of active players, the lowest-ranked player who
//!   never had a bye gets a free win
//! - **Pairings**: players holding identical win counts are paired, each at most once
//! - **Reporting**: a match result updates both players atomically
//!
//! ## Core Modules
//!
//! - [`db`]: Record store traits, PostgreSQL and in-memory stores
//! - [`tournament`]: Tournament engine and manager

/// Record store abstraction and implementations.
pub mod db;

/// Tournament engine: standings, byes, pairings and match reporting.
pub mod tournament;

pub use db::{Database, DatabaseConfig, InMemoryRecordStore, PgRecordStore, RecordStore};
pub use tournament::{
    Pairing, PlayerId, RoundPairings, Standing, TournamentConfig, TournamentError,
    TournamentManager, TournamentResult,
};
