//! Tournament module for Swiss-system events.
//!
//! This module provides:
//! - Player registration
//! - Match result reporting
//! - Standings ranked by wins
//! - Bye assignment for odd player counts
//! - Equal-win pairings for the next round
//!
//! Rematches are not prevented: there is no round history, and byes are tracked
//! only as the set of players who ever received one.
//!
//! ## Example
//!
//! ```no_run
//! use swiss_tournament::db::InMemoryRecordStore;
//! use swiss_tournament::tournament::TournamentManager;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mgr = TournamentManager::new(Arc::new(InMemoryRecordStore::new()));
//!
//!     let alice = mgr.register_player("Alice").await?;
//!     let bob = mgr.register_player("Bob").await?;
//!     mgr.report_match(alice, bob).await?;
//!
//!     for row in mgr.player_standings().await? {
//!         println!("{} {} {}/{}", row.player_id, row.name, row.wins, row.matches);
//!     }
//!
//!     let round = mgr.swiss_pairings().await?;
//!     println!("{} pairings", round.pairings.len());
//!     Ok(())
//! }
//! ```

pub mod bye;
pub mod errors;
pub mod manager;
pub mod models;
pub mod pairing;
pub mod reporter;
pub mod standings;

pub use errors::{TournamentError, TournamentResult};
pub use manager::TournamentManager;
pub use models::{
    ByePolicy, MatchStat, Pairing, Player, PlayerId, ResetScope, RoundPairings, Standing,
    TournamentConfig,
};
