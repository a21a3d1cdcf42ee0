//! Command-line argument parsing.

use std::ffi::OsString;

use anyhow::{Error, bail};
use pico_args::Arguments;
use swiss_tournament::tournament::PlayerId;

pub const HELP: &str = "\
Run a Swiss-system tournament

USAGE:
  swiss [OPTIONS] <COMMAND>

COMMANDS:
  setup                    Create the tournament tables
  register NAME...         Register a player (name may contain spaces)
  report WINNER LOSER      Record a match result by player id
  standings                Show players ranked by wins
  bye                      Award a bye if the active player count is odd
  pairings                 Assign this round's bye and pair the next round
  count                    Show the number of registered players
  reset [--players]        Clear matches and byes (and players with --players)

OPTIONS:
  --db-url     URL         Database connection string  [default: env DATABASE_URL]
  --json                   Print results as JSON

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  DATABASE_URL             PostgreSQL connection string
  BYE_COUNTS_AS_MATCH      Count a bye as a played match  [default: false]
  RUST_LOG                 Log filter  [default: info]
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Setup,
    Register { name: String },
    Report { winner: PlayerId, loser: PlayerId },
    Standings,
    Bye,
    Pairings,
    Count,
    Reset { players: bool },
}

#[derive(Debug)]
pub struct Args {
    pub database_url: Option<String>,
    pub json: bool,
    pub command: Command,
}

/// Outcome of parsing: either run a command or print help
#[derive(Debug)]
pub enum Parsed {
    Help,
    Run(Args),
}

pub fn parse(mut pargs: Arguments) -> Result<Parsed, Error> {
    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        return Ok(Parsed::Help);
    }

    let database_url = pargs.opt_value_from_str("--db-url")?;
    let json = pargs.contains("--json");

    let command = match pargs.subcommand()?.as_deref() {
        Some("setup") => Command::Setup,
        Some("register") => {
            let name = join_words(pargs.finish());
            if name.is_empty() {
                bail!("register needs a player name");
            }
            return Ok(Parsed::Run(Args {
                database_url,
                json,
                command: Command::Register { name },
            }));
        }
        Some("report") => Command::Report {
            winner: pargs.free_from_str()?,
            loser: pargs.free_from_str()?,
        },
        Some("standings") => Command::Standings,
        Some("bye") => Command::Bye,
        Some("pairings") => Command::Pairings,
        Some("count") => Command::Count,
        Some("reset") => Command::Reset {
            players: pargs.contains("--players"),
        },
        Some(other) => bail!("unknown command: {other}"),
        None => bail!("missing command, see --help"),
    };

    let leftover = pargs.finish();
    if !leftover.is_empty() {
        bail!("unexpected arguments: {leftover:?}");
    }

    Ok(Parsed::Run(Args {
        database_url,
        json,
        command,
    }))
}

fn join_words(words: Vec<OsString>) -> String {
    words
        .iter()
        .map(|w| w.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_strs(args: &[&str]) -> Result<Parsed, Error> {
        parse(Arguments::from_vec(args.iter().map(OsString::from).collect()))
    }

    fn command(args: &[&str]) -> Command {
        match parse_strs(args).expect("parse") {
            Parsed::Run(args) => args.command,
            Parsed::Help => panic!("unexpected help"),
        }
    }

    #[test]
    fn test_help() {
        assert!(matches!(parse_strs(&["--help"]).unwrap(), Parsed::Help));
        assert!(matches!(parse_strs(&["standings", "-h"]).unwrap(), Parsed::Help));
    }

    #[test]
    fn test_register_joins_name() {
        assert_eq!(
            command(&["register", "Ada", "Lovelace"]),
            Command::Register {
                name: "Ada Lovelace".to_string()
            }
        );
        assert!(parse_strs(&["register"]).is_err());
    }

    #[test]
    fn test_report_ids() {
        assert_eq!(
            command(&["report", "3", "7"]),
            Command::Report {
                winner: 3,
                loser: 7
            }
        );
        assert!(parse_strs(&["report", "3"]).is_err());
        assert!(parse_strs(&["report", "x", "7"]).is_err());
    }

    #[test]
    fn test_options_before_command() {
        match parse_strs(&["--json", "--db-url", "postgres://h/db", "pairings"]).unwrap() {
            Parsed::Run(args) => {
                assert!(args.json);
                assert_eq!(args.database_url.as_deref(), Some("postgres://h/db"));
                assert_eq!(args.command, Command::Pairings);
            }
            Parsed::Help => panic!("unexpected help"),
        }
    }

    #[test]
    fn test_reset_scope() {
        assert_eq!(command(&["reset"]), Command::Reset { players: false });
        assert_eq!(
            command(&["reset", "--players"]),
            Command::Reset { players: true }
        );
    }

    #[test]
    fn test_unknown_command_and_leftovers() {
        assert!(parse_strs(&["shuffle"]).is_err());
        assert!(parse_strs(&[]).is_err());
        assert!(parse_strs(&["count", "extra"]).is_err());
    }
}
