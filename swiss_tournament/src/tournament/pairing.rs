//! Next-round pairing generation.
//!
//! Only players with identical win counts are paired. Within a win group players
//! are taken in ranking order and seated two at a time, so nobody is paired twice.
//! A player left over in a group (or alone in it) is reported as unpaired rather
//! than dropped into a neighbouring group.

use log::debug;

use super::bye::assign_bye_if_odd;
use super::errors::TournamentResult;
use super::models::{ByePolicy, Pairing, PlayerId, RoundPairings, Standing};
use super::standings::{active_standings, rank_order};
use crate::db::StoreTransaction;

/// Pair players sharing a win count, skipping `excluded`.
///
/// Returns the pairings (larger id first in each) and the ids left without a
/// partner, both in ranking order.
pub fn pair_equal_wins(
    standings: &[Standing],
    excluded: Option<PlayerId>,
) -> (Vec<Pairing>, Vec<PlayerId>) {
    let mut eligible: Vec<&Standing> = standings
        .iter()
        .filter(|s| Some(s.player_id) != excluded)
        .collect();
    eligible.sort_by(|a, b| rank_order(a, b));

    let mut pairings = Vec::with_capacity(eligible.len() / 2);
    let mut unpaired = Vec::new();

    for group in eligible.chunk_by(|a, b| a.wins == b.wins) {
        let mut seats = group.chunks_exact(2);
        for pair in seats.by_ref() {
            pairings.push(Pairing::between(pair[0], pair[1]));
        }
        unpaired.extend(seats.remainder().iter().map(|s| s.player_id));
    }

    (pairings, unpaired)
}

/// Generate the next round: assign a bye if needed, then pair the rest.
pub async fn swiss_pairings(
    tx: &mut dyn StoreTransaction,
    policy: ByePolicy,
) -> TournamentResult<RoundPairings> {
    let bye = assign_bye_if_odd(tx, policy).await?;
    let standings = active_standings(tx).await?;
    let (pairings, unpaired) = pair_equal_wins(&standings, bye);

    if !unpaired.is_empty() {
        debug!("No equal-win partner for players {:?}", unpaired);
    }

    Ok(RoundPairings {
        bye,
        pairings,
        unpaired,
    })
}
