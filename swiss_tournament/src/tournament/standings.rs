//! Standings: players ranked by wins.

use std::cmp::Ordering;

use super::errors::TournamentResult;
use super::models::Standing;
use crate::db::StoreTransaction;

/// Ranking order: most wins first, ties by registration order (lower id first)
pub fn rank_order(a: &Standing, b: &Standing) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then_with(|| a.player_id.cmp(&b.player_id))
}

/// Sort standings rows in ranking order
pub fn sort_standings(standings: &mut [Standing]) {
    standings.sort_by(rank_order);
}

/// Standings of the active players only, without creating missing stats
pub async fn active_standings(tx: &mut dyn StoreTransaction) -> TournamentResult<Vec<Standing>> {
    let mut standings = tx.list_stats().await?;
    sort_standings(&mut standings);
    Ok(standings)
}

/// Full standings.
///
/// Any registered player without a stat row gets one at (0, 0) first, so every
/// registered player appears exactly once.
pub async fn compute_standings(tx: &mut dyn StoreTransaction) -> TournamentResult<Vec<Standing>> {
    for player in tx.list_players().await? {
        tx.get_or_init_stat(player.id).await?;
    }

    active_standings(tx).await
}
