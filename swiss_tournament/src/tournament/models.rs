//! Tournament data models: players, match stats, standings and pairings.

use serde::{Deserialize, Serialize};

use crate::db::config::{ConfigError, parse_env_or};

/// Player ID type (assigned by the record store, increasing with registration order)
pub type PlayerId = i64;

/// A registered player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Display name, not required to be unique
    pub name: String,
}

/// Aggregate win/match record for one player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStat {
    pub player_id: PlayerId,
    pub wins: u32,
    pub matches: u32,
}

impl MatchStat {
    /// Fresh record for a player who has not played yet
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            wins: 0,
            matches: 0,
        }
    }
}

/// One row of the standings table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub player_id: PlayerId,
    pub name: String,
    pub wins: u32,
    pub matches: u32,
}

/// A pairing for the next round.
///
/// Always stored with the larger id first so `(a, b)` and `(b, a)` never both appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub id1: PlayerId,
    pub name1: String,
    pub id2: PlayerId,
    pub name2: String,
}

impl Pairing {
    /// Build a pairing in canonical order from two distinct standings rows
    pub fn between(a: &Standing, b: &Standing) -> Self {
        let (high, low) = if a.player_id > b.player_id {
            (a, b)
        } else {
            (b, a)
        };

        Self {
            id1: high.player_id,
            name1: high.name.clone(),
            id2: low.player_id,
            name2: low.name.clone(),
        }
    }

    /// Whether `player_id` is one of the two seats
    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.id1 == player_id || self.id2 == player_id
    }
}

/// Outcome of generating the next round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundPairings {
    /// Player credited with this round's free win, if the active count was odd
    pub bye: Option<PlayerId>,
    /// Equal-win pairings, each player at most once
    pub pairings: Vec<Pairing>,
    /// Active players left out because no remaining player shares their win count.
    ///
    /// Only players with a stat row are active. A registered player who has not
    /// been ranked or reported yet appears in neither `pairings` nor `unpaired`.
    pub unpaired: Vec<PlayerId>,
}

/// How a bye is credited to the recipient's record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ByePolicy {
    /// Wins +1, matches unchanged. A recipient may show more wins than matches.
    #[default]
    WinOnly,
    /// Wins +1 and matches +1, keeping `wins <= matches`
    WinAndMatch,
}

impl ByePolicy {
    /// `(wins_delta, matches_delta)` applied to the bye recipient
    pub fn deltas(self) -> (i32, i32) {
        match self {
            ByePolicy::WinOnly => (1, 0),
            ByePolicy::WinAndMatch => (1, 1),
        }
    }
}

/// Which entities a reset removes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetScope {
    /// Match stats and bye history; players stay registered
    Matches,
    /// Everything, players included
    All,
}

/// Tournament configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub bye_policy: ByePolicy,
}

impl TournamentConfig {
    /// Load from environment variables
    ///
    /// - `BYE_COUNTS_AS_MATCH`: `true` selects [`ByePolicy::WinAndMatch`] (default: `false`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let counts_as_match: bool = parse_env_or("BYE_COUNTS_AS_MATCH", false)?;
        let bye_policy = if counts_as_match {
            ByePolicy::WinAndMatch
        } else {
            ByePolicy::WinOnly
        };

        Ok(Self { bye_policy })
    }
}
