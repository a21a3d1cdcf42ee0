//! Record store trait definitions for testability and dependency injection.
//!
//! Every tournament operation talks to storage through a [`StoreTransaction`]
//! obtained from a [`RecordStore`]. [`in_transaction`] is the single place that
//! begins, commits and rolls back.

use std::collections::BTreeSet;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use log::warn;
use sqlx::{PgPool, Postgres, Row, Transaction};

use crate::tournament::{
    MatchStat, Player, PlayerId, Standing, TournamentError, TournamentResult,
};

/// Source of store transactions
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Acquire a handle and open a unit of work
    async fn begin(&self) -> TournamentResult<Box<dyn StoreTransaction>>;
}

/// Operations available inside one unit of work
///
/// Nothing written through a transaction is visible to other callers until
/// [`StoreTransaction::commit`] succeeds. Dropping a transaction discards it.
#[async_trait]
pub trait StoreTransaction: Send {
    /// Register a player and return the store-assigned id
    async fn create_player(&mut self, name: &str) -> TournamentResult<PlayerId>;

    /// Remove every player together with their stats and byes
    async fn delete_all_players(&mut self) -> TournamentResult<()>;

    /// Remove every match stat; bye history goes with it
    async fn delete_all_matches(&mut self) -> TournamentResult<()>;

    /// Remove bye history only
    async fn delete_all_byes(&mut self) -> TournamentResult<()>;

    /// Number of registered players
    async fn count_players(&mut self) -> TournamentResult<usize>;

    /// All registered players in id order
    async fn list_players(&mut self) -> TournamentResult<Vec<Player>>;

    /// Stat row for `player_id`, created as (0, 0) if missing.
    ///
    /// Returns `None` when no such player is registered.
    async fn get_or_init_stat(&mut self, player_id: PlayerId)
    -> TournamentResult<Option<MatchStat>>;

    /// Every player holding a stat row, joined with their name
    async fn list_stats(&mut self) -> TournamentResult<Vec<Standing>>;

    /// Players that have ever received a bye
    async fn list_bye_recipients(&mut self) -> TournamentResult<BTreeSet<PlayerId>>;

    /// Add deltas to a stat row; `UnknownPlayer` if the row does not exist
    async fn update_stat(
        &mut self,
        player_id: PlayerId,
        wins_delta: i32,
        matches_delta: i32,
    ) -> TournamentResult<()>;

    /// Record that `player_id` received a bye
    async fn record_bye(&mut self, player_id: PlayerId) -> TournamentResult<()>;

    /// Make all writes visible
    async fn commit(self: Box<Self>) -> TournamentResult<()>;

    /// Discard all writes
    async fn rollback(self: Box<Self>) -> TournamentResult<()>;
}

/// Run `body` as one unit of work against `store`.
///
/// Commits when `body` returns `Ok`, rolls back when it returns `Err`. The
/// transaction handle is released on every path, including a failed commit.
///
/// ```no_run
/// use swiss_tournament::db::{InMemoryRecordStore, in_transaction};
///
/// # async fn example() -> swiss_tournament::tournament::TournamentResult<()> {
/// let store = InMemoryRecordStore::new();
/// let count = in_transaction(&store, |tx| Box::pin(async move { tx.count_players().await }))
///     .await?;
/// assert_eq!(count, 0);
/// # Ok(())
/// # }
/// ```
pub async fn in_transaction<S, F, T>(store: &S, body: F) -> TournamentResult<T>
where
    S: RecordStore + ?Sized,
    F: for<'t> FnOnce(&'t mut dyn StoreTransaction) -> BoxFuture<'t, TournamentResult<T>>,
{
    let mut tx = store.begin().await?;

    match body(&mut *tx).await {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback failed after {err}: {rollback_err}");
            }
            Err(err)
        }
    }
}

/// PostgreSQL implementation of [`RecordStore`]
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn begin(&self) -> TournamentResult<Box<dyn StoreTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgStoreTransaction { tx }))
    }
}

struct PgStoreTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTransaction for PgStoreTransaction {
    async fn create_player(&mut self, name: &str) -> TournamentResult<PlayerId> {
        let row = sqlx::query("INSERT INTO players (name) VALUES ($1) RETURNING id")
            .bind(name)
            .fetch_one(&mut *self.tx)
            .await?;

        Ok(row.get("id"))
    }

    async fn delete_all_players(&mut self) -> TournamentResult<()> {
        self.delete_all_matches().await?;
        sqlx::query("DELETE FROM players")
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn delete_all_matches(&mut self) -> TournamentResult<()> {
        self.delete_all_byes().await?;
        sqlx::query("DELETE FROM match_stats")
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn delete_all_byes(&mut self) -> TournamentResult<()> {
        sqlx::query("DELETE FROM byes")
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn count_players(&mut self) -> TournamentResult<usize> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM players")
            .fetch_one(&mut *self.tx)
            .await?;

        Ok(row.get::<i64, _>("count") as usize)
    }

    async fn list_players(&mut self) -> TournamentResult<Vec<Player>> {
        let rows = sqlx::query("SELECT id, name FROM players ORDER BY id")
            .fetch_all(&mut *self.tx)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| Player {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }

    async fn get_or_init_stat(
        &mut self,
        player_id: PlayerId,
    ) -> TournamentResult<Option<MatchStat>> {
        // Inserts nothing when the player does not exist
        sqlx::query(
            "INSERT INTO match_stats (player_id)
             SELECT id FROM players WHERE id = $1
             ON CONFLICT (player_id) DO NOTHING",
        )
        .bind(player_id)
        .execute(&mut *self.tx)
        .await?;

        let row = sqlx::query("SELECT player_id, wins, matches FROM match_stats WHERE player_id = $1")
            .bind(player_id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(row.map(|r| MatchStat {
            player_id: r.get("player_id"),
            wins: r.get::<i32, _>("wins") as u32,
            matches: r.get::<i32, _>("matches") as u32,
        }))
    }

    async fn list_stats(&mut self) -> TournamentResult<Vec<Standing>> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.name, s.wins, s.matches
            FROM players p
            JOIN match_stats s ON s.player_id = p.id
            ORDER BY s.wins DESC, p.id
            "#,
        )
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Standing {
                player_id: row.get("id"),
                name: row.get("name"),
                wins: row.get::<i32, _>("wins") as u32,
                matches: row.get::<i32, _>("matches") as u32,
            })
            .collect())
    }

    async fn list_bye_recipients(&mut self) -> TournamentResult<BTreeSet<PlayerId>> {
        let rows = sqlx::query("SELECT player_id FROM byes")
            .fetch_all(&mut *self.tx)
            .await?;

        Ok(rows.into_iter().map(|row| row.get("player_id")).collect())
    }

    async fn update_stat(
        &mut self,
        player_id: PlayerId,
        wins_delta: i32,
        matches_delta: i32,
    ) -> TournamentResult<()> {
        let result = sqlx::query(
            "UPDATE match_stats
             SET wins = wins + $2, matches = matches + $3
             WHERE player_id = $1",
        )
        .bind(player_id)
        .bind(wins_delta)
        .bind(matches_delta)
        .execute(&mut *self.tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(TournamentError::UnknownPlayer(player_id));
        }

        Ok(())
    }

    async fn record_bye(&mut self, player_id: PlayerId) -> TournamentResult<()> {
        sqlx::query("INSERT INTO byes (player_id) VALUES ($1)")
            .bind(player_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> TournamentResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> TournamentResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryRecordStore;

    #[tokio::test]
    async fn test_in_transaction_commits_on_ok() {
        let store = InMemoryRecordStore::new();

        let id = in_transaction(&store, |tx| {
            Box::pin(async move { tx.create_player("Alice").await })
        })
        .await
        .expect("register");
        assert_eq!(id, 1);

        let count = in_transaction(&store, |tx| Box::pin(async move { tx.count_players().await }))
            .await
            .unwrap();
        assert_eq!(count, 1, "Committed player should be visible");
    }

    #[tokio::test]
    async fn test_in_transaction_rolls_back_on_err() {
        let store = InMemoryRecordStore::new();

        let result: TournamentResult<()> = in_transaction(&store, |tx| {
            Box::pin(async move {
                tx.create_player("Ghost").await?;
                Err(TournamentError::NoEligiblePlayer)
            })
        })
        .await;
        assert!(matches!(result, Err(TournamentError::NoEligiblePlayer)));

        let count = in_transaction(&store, |tx| Box::pin(async move { tx.count_players().await }))
            .await
            .unwrap();
        assert_eq!(count, 0, "Rolled back player must not be visible");
    }

    #[tokio::test]
    async fn test_transaction_released_after_error() {
        let store = InMemoryRecordStore::new();

        for _ in 0..3 {
            let _ = in_transaction(&store, |tx| {
                Box::pin(async move { tx.update_stat(99, 1, 1).await })
            })
            .await;
        }

        // Would hang if a failed transaction leaked its handle
        let players = in_transaction(&store, |tx| Box::pin(async move { tx.list_players().await }))
            .await
            .unwrap();
        assert!(players.is_empty());
    }
}
