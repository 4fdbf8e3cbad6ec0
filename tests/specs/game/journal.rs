//! Journal specs
//!
//! Verify a journal configured from TOML records a session in order.

use crate::prelude::*;
use similar_asserts::assert_eq;
use tempfile::tempdir;

#[test]
fn configured_journal_records_the_session() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("flip7.toml");
    std::fs::write(
        &config_path,
        "trace_emissions = true\njournal_path = \"journal/events.jsonl\"\n",
    )
    .unwrap();

    let config = BusConfig::load(&config_path).unwrap();
    assert_eq!(
        config.journal_path.as_deref(),
        Some(dir.path().join("journal/events.jsonl").as_path())
    );

    let table = Table::with_config(config.clone());
    let journal = EventJournal::from_config(&config)
        .unwrap()
        .unwrap()
        .attach(&table.bus);

    table.bus.on(EventKind::PlayerStay, |envelope, bus| {
        let Some(stay) = envelope.payload::<PlayerStay>() else {
            return Ok(());
        };
        bus.emit(PlayerStayCompleted {
            player_id: stay.player_id,
            score: 17,
        })?;
        Ok(())
    });

    table
        .bus
        .emit(PlayerStay {
            player_id: PlayerId(1),
        })
        .unwrap();
    table
        .bus
        .emit(WinningScoreReached {
            player_id: PlayerId(1),
            total_score: 203,
            winning_score: 200,
        })
        .unwrap();

    let journal = journal.borrow();
    let kinds: Vec<EventKind> = journal.read_all().unwrap().iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::PlayerStay,
            EventKind::PlayerStayCompleted,
            EventKind::WinningScoreReached,
        ]
    );

    let player_records = journal.query(&EventPattern::domain("player")).unwrap();
    assert_eq!(player_records.len(), 2);
    assert_eq!(
        player_records[1].event.payload::<PlayerStayCompleted>(),
        Some(&PlayerStayCompleted {
            player_id: PlayerId(1),
            score: 17,
        })
    );

    let tail = journal.after(2).unwrap();
    assert_eq!(tail.len(), 1);
    assert_eq!(tail[0].timestamp, table.clock.now());
}

#[test]
fn reopened_journal_keeps_earlier_sessions() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");

    for session in 1..=2 {
        let table = Table::new();
        let _journal = EventJournal::open(&path).unwrap().attach(&table.bus);
        table
            .bus
            .emit(GameStart {
                players: vec![player(1, "Ada", true)],
                winning_score: 200 * session,
            })
            .unwrap();
    }

    let journal = EventJournal::open(&path).unwrap();
    assert_eq!(journal.len(), 2);
    let scores: Vec<u32> = journal
        .read_all()
        .unwrap()
        .iter()
        .filter_map(|r| r.event.payload::<GameStart>().map(|s| s.winning_score))
        .collect();
    assert_eq!(scores, vec![200, 400]);
}
