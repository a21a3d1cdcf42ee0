//! Swiss tournament command-line front end.
//!
//! Each invocation runs one tournament operation against the PostgreSQL record
//! store and exits.

mod cli;
mod config;
mod output;

use std::sync::Arc;

use anyhow::{Context, Error, anyhow};
use log::{debug, info};
use pico_args::Arguments;
use swiss_tournament::{
    db::Database,
    tournament::{ResetScope, TournamentError, TournamentManager},
};

use cli::{Command, Parsed};
use config::CliConfig;
use output::{ByeResult, PlayerCount, Registered};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let args = match cli::parse(Arguments::from_env())? {
        Parsed::Help => {
            print!("{}", cli::HELP);
            return Ok(());
        }
        Parsed::Run(args) => args,
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let config = CliConfig::from_env(args.database_url)?;

    let db = Database::new(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Database connected successfully");

    let result = run(&db, config, args.command, args.json).await;
    db.close().await;

    result.map_err(|err| match err.downcast::<TournamentError>() {
        Ok(err) => {
            debug!("{err:?}");
            anyhow!(err.client_message())
        }
        Err(other) => other,
    })
}

async fn run(db: &Database, config: CliConfig, command: Command, json: bool) -> Result<(), Error> {
    let mgr = TournamentManager::with_config(Arc::new(db.record_store()), config.tournament);
    debug!("Bye policy: {:?}", mgr.config().bye_policy);

    let text = match command {
        Command::Setup => {
            db.apply_schema().await.context("Failed to apply schema")?;
            "Tournament tables ready".to_string()
        }
        Command::Register { name } => {
            let player_id = mgr.register_player(&name).await?;
            let registered = Registered { player_id, name };
            if json {
                output::render_json(&registered)?
            } else {
                format!("Registered {} as player {}", registered.name, player_id)
            }
        }
        Command::Report { winner, loser } => {
            mgr.report_match(winner, loser).await?;
            format!("Recorded: {winner} beat {loser}")
        }
        Command::Standings => {
            let standings = mgr.player_standings().await?;
            if json {
                output::render_json(&standings)?
            } else {
                output::render_standings(&standings)
            }
        }
        Command::Bye => {
            let bye = mgr.assign_bye_if_odd().await?;
            if json {
                output::render_json(&ByeResult { bye })?
            } else {
                match bye {
                    Some(player_id) => format!("Bye awarded to player {player_id}"),
                    None => "Even number of active players, no bye".to_string(),
                }
            }
        }
        Command::Pairings => {
            let round = mgr.swiss_pairings().await?;
            if json {
                output::render_json(&round)?
            } else {
                output::render_round(&round)
            }
        }
        Command::Count => {
            let players = mgr.count_players().await?;
            if json {
                output::render_json(&PlayerCount { players })?
            } else {
                players.to_string()
            }
        }
        Command::Reset { players } => {
            let scope = if players {
                ResetScope::All
            } else {
                ResetScope::Matches
            };
            mgr.reset(scope).await?;
            format!("Reset {scope:?}")
        }
    };

    println!("{}", text.trim_end());
    Ok(())
}
