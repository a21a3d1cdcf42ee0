//! Applying a reported match result to both players' stats.

use super::errors::{TournamentError, TournamentResult};
use super::models::PlayerId;
use crate::db::StoreTransaction;

/// Record that `winner` beat `loser`.
///
/// Players registered but never ranked get their stat row created here. Both
/// updates run in the caller's transaction, so a failure on the loser's row
/// leaves the winner's row untouched once the transaction rolls back.
pub async fn report_match(
    tx: &mut dyn StoreTransaction,
    winner: PlayerId,
    loser: PlayerId,
) -> TournamentResult<()> {
    if winner == loser {
        return Err(TournamentError::SelfMatch(winner));
    }

    for player_id in [winner, loser] {
        if tx.get_or_init_stat(player_id).await?.is_none() {
            return Err(TournamentError::UnknownPlayer(player_id));
        }
    }

    tx.update_stat(winner, 1, 1).await?;
    tx.update_stat(loser, 0, 1).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{InMemoryRecordStore, RecordStore};

    #[tokio::test]
    async fn test_report_initializes_unranked_players() {
        let store = InMemoryRecordStore::new();
        let mut tx = store.begin().await.unwrap();
        let a = tx.create_player("Alice").await.unwrap();
        let b = tx.create_player("Bob").await.unwrap();

        report_match(tx.as_mut(), a, b).await.unwrap();

        let stats = tx.list_stats().await.unwrap();
        let alice = stats.iter().find(|s| s.player_id == a).unwrap();
        let bob = stats.iter().find(|s| s.player_id == b).unwrap();
        assert_eq!((alice.wins, alice.matches), (1, 1));
        assert_eq!((bob.wins, bob.matches), (0, 1));
    }

    #[tokio::test]
    async fn test_unknown_loser_fails_before_any_write() {
        let store = InMemoryRecordStore::new();
        let mut tx = store.begin().await.unwrap();
        let a = tx.create_player("Alice").await.unwrap();

        let err = report_match(tx.as_mut(), a, 42).await.unwrap_err();
        assert!(matches!(err, TournamentError::UnknownPlayer(42)));

        let stat = tx.get_or_init_stat(a).await.unwrap().unwrap();
        assert_eq!((stat.wins, stat.matches), (0, 0));
    }
}
