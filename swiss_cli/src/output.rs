//! Human-readable and JSON rendering of command results.

use serde::Serialize;
use swiss_tournament::tournament::{PlayerId, RoundPairings, Standing};

#[derive(Debug, Serialize)]
pub struct Registered {
    pub player_id: PlayerId,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct PlayerCount {
    pub players: usize,
}

#[derive(Debug, Serialize)]
pub struct ByeResult {
    pub bye: Option<PlayerId>,
}

pub fn render_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

pub fn render_standings(standings: &[Standing]) -> String {
    let mut out = format!("{:>4}  {:<24} {:>4} {:>7}\n", "ID", "NAME", "WINS", "MATCHES");
    for row in standings {
        out.push_str(&format!(
            "{:>4}  {:<24} {:>4} {:>7}\n",
            row.player_id, row.name, row.wins, row.matches
        ));
    }
    out
}

pub fn render_round(round: &RoundPairings) -> String {
    let mut out = String::new();

    if let Some(player_id) = round.bye {
        out.push_str(&format!("Bye: player {player_id}\n"));
    }

    for p in &round.pairings {
        out.push_str(&format!(
            "{} ({}) vs {} ({})\n",
            p.name1, p.id1, p.name2, p.id2
        ));
    }

    if !round.unpaired.is_empty() {
        let ids: Vec<String> = round.unpaired.iter().map(|id| id.to_string()).collect();
        out.push_str(&format!("No equal-win partner: {}\n", ids.join(", ")));
    }

    if out.is_empty() {
        out.push_str("No pairings\n");
    }
    out
}
