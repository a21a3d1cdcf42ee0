//! Bye assignment for rounds with an odd number of active players.

use std::collections::BTreeSet;

use log::debug;

use super::errors::{TournamentError, TournamentResult};
use super::models::{ByePolicy, PlayerId, Standing};
use crate::db::StoreTransaction;

/// Pick the bye recipient: fewest wins among players who never had a bye,
/// ties going to the lowest id.
pub fn select_bye_recipient(
    active: &[Standing],
    previous_recipients: &BTreeSet<PlayerId>,
) -> Option<PlayerId> {
    active
        .iter()
        .filter(|s| !previous_recipients.contains(&s.player_id))
        .min_by_key(|s| (s.wins, s.player_id))
        .map(|s| s.player_id)
}

/// Credit a free win when the active player count is odd.
///
/// Returns `Ok(None)` without touching the store when the count is even, and
/// `NoEligiblePlayer` when every active player already had a bye. The stat update
/// and the bye record share the caller's transaction.
pub async fn assign_bye_if_odd(
    tx: &mut dyn StoreTransaction,
    policy: ByePolicy,
) -> TournamentResult<Option<PlayerId>> {
    let active = tx.list_stats().await?;
    if active.len() % 2 == 0 {
        return Ok(None);
    }

    let previous = tx.list_bye_recipients().await?;
    let player_id =
        select_bye_recipient(&active, &previous).ok_or(TournamentError::NoEligiblePlayer)?;

    let (wins_delta, matches_delta) = policy.deltas();
    tx.update_stat(player_id, wins_delta, matches_delta).await?;
    tx.record_bye(player_id).await?;

    debug!(
        "Bye credited to player {} ({} active, policy {:?})",
        player_id,
        active.len(),
        policy
    );
    Ok(Some(player_id))
}
