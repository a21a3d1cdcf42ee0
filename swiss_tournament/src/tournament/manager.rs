//! Tournament manager: the public entry point for all tournament operations.

use std::sync::Arc;

use log::{debug, info};

use super::errors::{TournamentError, TournamentResult};
use super::models::{PlayerId, ResetScope, RoundPairings, Standing, TournamentConfig};
use super::{bye, pairing, reporter, standings};
use crate::db::{RecordStore, in_transaction};

/// Tournament manager
///
/// Holds an injected record store; each method runs as exactly one store
/// transaction.
pub struct TournamentManager<S: RecordStore + ?Sized> {
    store: Arc<S>,
    config: TournamentConfig,
}

impl<S: RecordStore + ?Sized> Clone for TournamentManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: RecordStore + ?Sized> TournamentManager<S> {
    /// Create a new tournament manager with the default configuration
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, TournamentConfig::default())
    }

    /// Create a new tournament manager
    pub fn with_config(store: Arc<S>, config: TournamentConfig) -> Self {
        Self { store, config }
    }

    /// Settings the manager applies, such as how byes are credited
    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    /// Register a player
    ///
    /// # Errors
    ///
    /// * `TournamentError::InvalidName` - Name is empty after trimming
    pub async fn register_player(&self, name: &str) -> TournamentResult<PlayerId> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(TournamentError::InvalidName);
        }

        let display = name.clone();
        let player_id = in_transaction(self.store.as_ref(), move |tx| {
            Box::pin(async move { tx.create_player(&name).await })
        })
        .await?;

        info!("Registered player {} as {}", display, player_id);
        Ok(player_id)
    }

    /// Number of registered players
    pub async fn count_players(&self) -> TournamentResult<usize> {
        in_transaction(self.store.as_ref(), |tx| {
            Box::pin(async move { tx.count_players().await })
        })
        .await
    }

    /// Current standings, most wins first
    ///
    /// Registered players without a record are initialized to (0, 0) wins/matches.
    pub async fn player_standings(&self) -> TournamentResult<Vec<Standing>> {
        let standings = in_transaction(self.store.as_ref(), |tx| {
            Box::pin(async move { standings::compute_standings(tx).await })
        })
        .await?;

        debug!("Computed standings for {} players", standings.len());
        Ok(standings)
    }

    /// Record the outcome of a single match
    ///
    /// # Errors
    ///
    /// * `TournamentError::UnknownPlayer` - Either id is not registered
    /// * `TournamentError::SelfMatch` - Winner and loser are the same player
    pub async fn report_match(&self, winner: PlayerId, loser: PlayerId) -> TournamentResult<()> {
        in_transaction(self.store.as_ref(), move |tx| {
            Box::pin(async move { reporter::report_match(tx, winner, loser).await })
        })
        .await?;

        info!("Recorded match: {} beat {}", winner, loser);
        Ok(())
    }

    /// Credit a free win if the number of active players is odd
    ///
    /// # Errors
    ///
    /// * `TournamentError::NoEligiblePlayer` - Every active player already had a bye
    pub async fn assign_bye_if_odd(&self) -> TournamentResult<Option<PlayerId>> {
        let policy = self.config.bye_policy;
        let recipient = in_transaction(self.store.as_ref(), move |tx| {
            Box::pin(async move { bye::assign_bye_if_odd(tx, policy).await })
        })
        .await?;

        if let Some(player_id) = recipient {
            info!("Player {} received a bye", player_id);
        }
        Ok(recipient)
    }

    /// Pairings for the next round
    ///
    /// Assigns the round's bye first when the active count is odd. Players whose
    /// win count nobody else shares end up in [`RoundPairings::unpaired`].
    pub async fn swiss_pairings(&self) -> TournamentResult<RoundPairings> {
        let policy = self.config.bye_policy;
        let round = in_transaction(self.store.as_ref(), move |tx| {
            Box::pin(async move { pairing::swiss_pairings(tx, policy).await })
        })
        .await?;

        info!(
            "Generated {} pairings (bye: {:?}, unpaired: {})",
            round.pairings.len(),
            round.bye,
            round.unpaired.len()
        );
        Ok(round)
    }

    /// Remove all match records and bye history
    pub async fn delete_matches(&self) -> TournamentResult<()> {
        self.reset(ResetScope::Matches).await
    }

    /// Remove all players, with their records and byes
    pub async fn delete_players(&self) -> TournamentResult<()> {
        self.reset(ResetScope::All).await
    }

    /// Remove bye history only
    pub async fn delete_byes(&self) -> TournamentResult<()> {
        in_transaction(self.store.as_ref(), |tx| {
            Box::pin(async move { tx.delete_all_byes().await })
        })
        .await?;

        info!("Cleared bye history");
        Ok(())
    }

    /// Bulk reset
    pub async fn reset(&self, scope: ResetScope) -> TournamentResult<()> {
        in_transaction(self.store.as_ref(), move |tx| {
            Box::pin(async move {
                match scope {
                    ResetScope::Matches => tx.delete_all_matches().await,
                    ResetScope::All => tx.delete_all_players().await,
                }
            })
        })
        .await?;

        info!("Tournament reset ({:?})", scope);
        Ok(())
    }
}
