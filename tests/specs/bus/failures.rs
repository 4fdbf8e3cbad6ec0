//! Listener failure specs
//!
//! Verify that a failing listener is reported once and never stops the
//! rest of the dispatch.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn erroring_listener_is_reported_once_and_siblings_run() {
    let table = Table::new();
    let transcript = Transcript::new();
    table.bus.on(EventKind::PlayerBust, transcript.listener("ui"));
    let sound = table.bus.subscribe(
        EventKind::PlayerBust,
        |_, _| Err(ListenerFailure::new("audio device missing")),
        SubscribeOptions::default().with_label("sound"),
    );
    table
        .bus
        .on(EventKind::PlayerBust, transcript.listener("mobile"));

    let delivery = table
        .bus
        .emit(PlayerBust {
            player_id: PlayerId(2),
            card: Some(Card::number("n-7b", 7)),
        })
        .unwrap();

    assert_eq!(transcript.lines(), vec!["ui", "mobile"]);
    assert_eq!((delivery.delivered, delivery.failed), (2, 1));

    let errors = table.diagnostics.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].subscription, sound.id());
    assert_eq!(errors[0].label.as_deref(), Some("sound"));
    assert_eq!(errors[0].message, "audio device missing");
}

#[test]
fn panicking_listener_is_contained() {
    let table = Table::new();
    let transcript = Transcript::new();
    table
        .bus
        .on(EventKind::PlayerFlip7, |_, _| panic!("confetti asset missing"));
    table
        .bus
        .on(EventKind::PlayerFlip7, transcript.listener("celebrate"));

    let delivery = table
        .bus
        .emit(PlayerFlip7 {
            player_id: PlayerId(1),
        })
        .unwrap();

    assert_eq!(transcript.lines(), vec!["celebrate"]);
    assert_eq!(delivery.failed, 1);
    assert_eq!(table.diagnostics.len(), 1);
    assert!(table.diagnostics.errors()[0]
        .message
        .contains("confetti asset missing"));
    assert_eq!(table.bus.depth(), 0);
}

#[test]
fn failures_carry_the_emission_sequence() {
    let table = Table::new();
    table
        .bus
        .on(EventKind::AiThinking, |_, _| Err(ListenerFailure::new("x")));

    for _ in 0..3 {
        table
            .bus
            .emit(AiThinking {
                player_id: PlayerId(4),
            })
            .unwrap();
    }

    let sequences: Vec<u64> = table
        .diagnostics
        .errors()
        .iter()
        .map(|e| e.sequence)
        .collect();
    assert_eq!(sequences, vec![1, 2, 3]);
}

#[test]
fn typed_listener_errors_propagate_with_question_mark() {
    let table = Table::new();
    table
        .bus
        .on_payload::<AnimationComplete, _>(|payload, _| {
            let _frames: u32 = payload.animation.parse()?;
            Ok(())
        });

    table
        .bus
        .emit(AnimationComplete {
            animation: "flip3".to_string(),
        })
        .unwrap();

    assert_eq!(table.diagnostics.len(), 1);
    assert_eq!(table.diagnostics.errors()[0].kind, EventKind::AnimationComplete);
}

#[test]
fn unknown_kind_is_rejected_before_any_state_changes() {
    let table = Table::new();
    let transcript = Transcript::new();
    table.bus.on(EventKind::PlayerHit, transcript.listener("L1"));

    let err = table
        .bus
        .emit_named("player:split", json!({"playerId": 1}))
        .unwrap_err();

    assert_eq!(
        err,
        BusError::UnknownEventKind {
            name: "player:split".to_string()
        }
    );
    assert_eq!(table.bus.subscription_count(), 1);
    assert_eq!(table.bus.last_sequence(), 0);
    assert!(transcript.lines().is_empty());

    let err = table
        .bus
        .subscribe_named("player:split", |_, _| Ok(()), SubscribeOptions::default())
        .unwrap_err();
    assert!(matches!(err, BusError::UnknownEventKind { .. }));
    assert_eq!(table.bus.subscription_count(), 1);
}

#[test]
fn malformed_payload_is_rejected() {
    let table = Table::new();
    let err = table
        .bus
        .emit_named("round:start", json!({"roundNumber": 1}))
        .unwrap_err();

    match err {
        BusError::InvalidPayload { kind, message } => {
            assert_eq!(kind, EventKind::RoundStart);
            assert!(message.contains("dealerIndex"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}
