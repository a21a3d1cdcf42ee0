//! In-memory record store.
//!
//! Backs tests and local dry runs. A transaction works on a private copy of the
//! state while holding the store lock, and writes the copy back on commit.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::repository::{RecordStore, StoreTransaction};
use crate::tournament::{
    MatchStat, Player, PlayerId, Standing, TournamentError, TournamentResult,
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    players: BTreeMap<PlayerId, Player>,
    stats: BTreeMap<PlayerId, MatchStat>,
    byes: BTreeSet<PlayerId>,
    last_id: PlayerId,
    #[cfg(test)]
    faults: Faults,
}

/// Writes that fail on purpose, so tests can reach rollback paths
#[cfg(test)]
#[derive(Debug, Clone, Default)]
struct Faults {
    updates: BTreeSet<PlayerId>,
    byes: BTreeSet<PlayerId>,
}

#[cfg(test)]
impl Faults {
    fn check(set: &BTreeSet<PlayerId>, op: &str, player_id: PlayerId) -> TournamentResult<()> {
        if set.contains(&player_id) {
            return Err(TournamentError::Transaction(format!(
                "injected failure in {op} for player {player_id}"
            )));
        }
        Ok(())
    }
}

/// Record store kept entirely in process memory
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl InMemoryRecordStore {
    /// Make every later `update_stat` on `player_id` fail
    pub(crate) async fn inject_update_failure(&self, player_id: PlayerId) {
        self.state.lock().await.faults.updates.insert(player_id);
    }

    /// Make every later `record_bye` for `player_id` fail
    pub(crate) async fn inject_bye_failure(&self, player_id: PlayerId) {
        self.state.lock().await.faults.byes.insert(player_id);
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn begin(&self) -> TournamentResult<Box<dyn StoreTransaction>> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTransaction { guard, working }))
    }
}

struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn create_player(&mut self, name: &str) -> TournamentResult<PlayerId> {
        self.working.last_id += 1;
        let id = self.working.last_id;
        self.working.players.insert(
            id,
            Player {
                id,
                name: name.to_string(),
            },
        );
        Ok(id)
    }

    async fn delete_all_players(&mut self) -> TournamentResult<()> {
        self.delete_all_matches().await?;
        self.working.players.clear();
        Ok(())
    }

    async fn delete_all_matches(&mut self) -> TournamentResult<()> {
        self.delete_all_byes().await?;
        self.working.stats.clear();
        Ok(())
    }

    async fn delete_all_byes(&mut self) -> TournamentResult<()> {
        self.working.byes.clear();
        Ok(())
    }

    async fn count_players(&mut self) -> TournamentResult<usize> {
        Ok(self.working.players.len())
    }

    async fn list_players(&mut self) -> TournamentResult<Vec<Player>> {
        Ok(self.working.players.values().cloned().collect())
    }

    async fn get_or_init_stat(
        &mut self,
        player_id: PlayerId,
    ) -> TournamentResult<Option<MatchStat>> {
        if !self.working.players.contains_key(&player_id) {
            return Ok(None);
        }

        let stat = self
            .working
            .stats
            .entry(player_id)
            .or_insert_with(|| MatchStat::new(player_id));
        Ok(Some(*stat))
    }

    async fn list_stats(&mut self) -> TournamentResult<Vec<Standing>> {
        let state = &self.working;
        Ok(state
            .stats
            .values()
            .filter_map(|stat| {
                state.players.get(&stat.player_id).map(|player| Standing {
                    player_id: stat.player_id,
                    name: player.name.clone(),
                    wins: stat.wins,
                    matches: stat.matches,
                })
            })
            .collect())
    }

    async fn list_bye_recipients(&mut self) -> TournamentResult<BTreeSet<PlayerId>> {
        Ok(self.working.byes.clone())
    }

    async fn update_stat(
        &mut self,
        player_id: PlayerId,
        wins_delta: i32,
        matches_delta: i32,
    ) -> TournamentResult<()> {
        #[cfg(test)]
        Faults::check(&self.working.faults.updates, "update_stat", player_id)?;

        let stat = self
            .working
            .stats
            .get_mut(&player_id)
            .ok_or(TournamentError::UnknownPlayer(player_id))?;

        let wins = stat.wins.checked_add_signed(wins_delta);
        let matches = stat.matches.checked_add_signed(matches_delta);
        match (wins, matches) {
            (Some(wins), Some(matches)) => {
                stat.wins = wins;
                stat.matches = matches;
                Ok(())
            }
            _ => Err(TournamentError::Transaction(format!(
                "stat for player {player_id} out of range"
            ))),
        }
    }

    async fn record_bye(&mut self, player_id: PlayerId) -> TournamentResult<()> {
        #[cfg(test)]
        Faults::check(&self.working.faults.byes, "record_bye", player_id)?;

        if !self.working.byes.insert(player_id) {
            return Err(TournamentError::Conflict(format!(
                "player {player_id} already has a bye"
            )));
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> TournamentResult<()> {
        let MemoryTransaction { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> TournamentResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ids_increase_across_resets() {
        let store = InMemoryRecordStore::new();

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.create_player("Alice").await.unwrap(), 1);
        assert_eq!(tx.create_player("Bob").await.unwrap(), 2);
        tx.delete_all_players().await.unwrap();
        assert_eq!(tx.create_player("Carol").await.unwrap(), 3);
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_get_or_init_stat_unknown_player() {
        let store = InMemoryRecordStore::new();
        let mut tx = store.begin().await.unwrap();

        assert_eq!(tx.get_or_init_stat(5).await.unwrap(), None);
        assert!(tx.list_stats().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_or_init_stat_creates_once() {
        let store = InMemoryRecordStore::new();
        let mut tx = store.begin().await.unwrap();
        let id = tx.create_player("Alice").await.unwrap();

        assert_eq!(tx.get_or_init_stat(id).await.unwrap(), Some(MatchStat::new(id)));
        tx.update_stat(id, 1, 1).await.unwrap();

        let stat = tx.get_or_init_stat(id).await.unwrap().unwrap();
        assert_eq!((stat.wins, stat.matches), (1, 1), "Existing stat must not be reset");
    }

    #[tokio::test]
    async fn test_delete_matches_clears_byes() {
        let store = InMemoryRecordStore::new();
        let mut tx = store.begin().await.unwrap();
        let id = tx.create_player("Alice").await.unwrap();
        tx.get_or_init_stat(id).await.unwrap();
        tx.record_bye(id).await.unwrap();

        tx.delete_all_matches().await.unwrap();

        assert!(tx.list_bye_recipients().await.unwrap().is_empty());
        assert!(tx.list_stats().await.unwrap().is_empty());
        assert_eq!(tx.count_players().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_bye_rejected() {
        let store = InMemoryRecordStore::new();
        let mut tx = store.begin().await.unwrap();
        let id = tx.create_player("Alice").await.unwrap();

        tx.record_bye(id).await.unwrap();
        assert!(matches!(
            tx.record_bye(id).await,
            Err(TournamentError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_dropped_transaction_discards_writes() {
        let store = InMemoryRecordStore::new();
        {
            let mut tx = store.begin().await.unwrap();
            tx.create_player("Alice").await.unwrap();
        }

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.count_players().await.unwrap(), 0);
    }
}
