//! Integration tests for the PostgreSQL record store.
//!
//! Ignored by default; run with a scratch database:
//! `DATABASE_URL=postgres://... cargo test -- --ignored`

use serial_test::serial;
use std::sync::Arc;
use swiss_tournament::db::{Database, DatabaseConfig};
use swiss_tournament::tournament::{TournamentError, TournamentManager};
use swiss_tournament::PgRecordStore;

/// Helper to connect, create the schema and start from an empty tournament
async fn setup_manager() -> (TournamentManager<PgRecordStore>, Database) {
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://postgres@localhost/tournament_test".to_string());

    let config = DatabaseConfig {
        database_url,
        ..DatabaseConfig::development()
    };

    let db = Database::new(&config)
        .await
        .expect("Failed to create test database");
    db.apply_schema().await.expect("Failed to apply schema");

    let mgr = TournamentManager::new(Arc::new(db.record_store()));
    mgr.delete_players().await.expect("Failed to reset");
    (mgr, db)
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
async fn test_pg_full_round() {
    let (mgr, _db) = setup_manager().await;

    let mut ids = Vec::new();
    for name in ["Twilight Sparkle", "Fluttershy", "Applejack", "Pinkie Pie"] {
        ids.push(mgr.register_player(name).await.unwrap());
    }
    assert_eq!(mgr.count_players().await.unwrap(), 4);

    mgr.report_match(ids[0], ids[1]).await.unwrap();
    mgr.report_match(ids[2], ids[3]).await.unwrap();

    let standings = mgr.player_standings().await.unwrap();
    assert_eq!(standings.len(), 4);
    assert_eq!(standings[0].wins, 1);
    assert_eq!(standings[3].wins, 0);

    let round = mgr.swiss_pairings().await.unwrap();
    let pairs: Vec<_> = round.pairings.iter().map(|p| (p.id1, p.id2)).collect();
    assert_eq!(pairs, vec![(ids[2], ids[0]), (ids[3], ids[1])]);
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
async fn test_pg_unknown_player_rolls_back() {
    let (mgr, _db) = setup_manager().await;
    let id = mgr.register_player("Solo").await.unwrap();

    let err = mgr.report_match(id, id + 1000).await.unwrap_err();
    assert!(matches!(err, TournamentError::UnknownPlayer(_)));

    let standings = mgr.player_standings().await.unwrap();
    assert_eq!((standings[0].wins, standings[0].matches), (0, 0));
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
async fn test_pg_bye_and_reset() {
    let (mgr, _db) = setup_manager().await;
    for name in ["A", "B", "C"] {
        mgr.register_player(name).await.unwrap();
    }
    mgr.player_standings().await.unwrap();

    let round = mgr.swiss_pairings().await.unwrap();
    let recipient = round.bye.expect("odd count should give a bye");
    assert!(round.pairings.iter().all(|p| !p.contains(recipient)));

    mgr.delete_matches().await.unwrap();
    assert_eq!(mgr.count_players().await.unwrap(), 3);
    assert!(
        mgr.player_standings()
            .await
            .unwrap()
            .iter()
            .all(|s| s.wins == 0)
    );
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL server at DATABASE_URL"]
async fn test_pg_duplicate_bye_is_conflict() {
    let (mgr, db) = setup_manager().await;
    for name in ["A", "B", "C"] {
        mgr.register_player(name).await.unwrap();
    }
    mgr.player_standings().await.unwrap();
    let recipient = mgr.assign_bye_if_odd().await.unwrap().unwrap();

    let err = sqlx::query("INSERT INTO byes (player_id) VALUES ($1)")
        .bind(recipient)
        .execute(db.pool())
        .await
        .unwrap_err();
    let err = TournamentError::from(err);
    assert!(matches!(err, TournamentError::Conflict(_)));
    assert_eq!(err.client_message(), "Conflicting tournament record");
}
