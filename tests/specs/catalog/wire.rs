//! Wire format specs
//!
//! Verify the JSON shapes payloads take on the string-keyed boundary.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn card_dealt_payload_uses_camel_case() {
    let event = GameEvent::from(CardDealt {
        player_id: PlayerId(2),
        player_index: 1,
        card: Card::modifier("m-x2", Modifier::Times2),
        is_initial_deal: true,
    });

    assert_eq!(
        event.payload_json(),
        json!({
            "playerId": 2,
            "playerIndex": 1,
            "card": {"id": "m-x2", "face": {"type": "modifier", "value": "x2"}},
            "isInitialDeal": true,
        })
    );
}

#[test]
fn target_selection_parses_with_defaults() {
    let event = GameEvent::from_wire(
        "actionCard:targetSelected",
        json!({
            "card": {"id": "a-freeze-1", "face": {"type": "action", "value": "freeze"}},
            "sourcePlayer": 1,
            "targetPlayer": 3,
        }),
    )
    .unwrap();

    let selected = event.payload::<ActionCardTargetSelected>().unwrap();
    assert_eq!(selected.target_player, PlayerId(3));
    assert!(!selected.is_initial_deal);
    assert!(!selected.is_second_chance_redistribution);
    assert!(selected.card.requires_target());
}

#[test]
fn ui_update_is_tagged_by_type() {
    let event = GameEvent::from_wire(
        "ui:updateNeeded",
        json!({"update": {"type": "deckReshuffled", "cardsRemaining": 42}}),
    )
    .unwrap();

    assert_eq!(
        event,
        GameEvent::UiUpdateNeeded(UiUpdateNeeded {
            update: UiUpdate::DeckReshuffled {
                cards_remaining: 42
            },
        })
    );
}

#[test]
fn fieldless_coordination_events_accept_null() {
    for name in ["coordination:requestNextTurn", "coordination:roundShouldEnd"] {
        let event = GameEvent::from_wire(name, serde_json::Value::Null).unwrap();
        assert_eq!(event.name(), name);
        assert_eq!(event.payload_json(), json!({}));
    }
}

#[test]
fn ai_decision_round_trips_through_the_bus() {
    let table = Table::new();
    let transcript = Transcript::new();
    {
        let transcript = transcript.clone();
        table
            .bus
            .on_payload::<AiDecisionMade, _>(move |decision, _| {
                transcript.push(format!("{}:{:?}", decision.player_id, decision.decision));
                Ok(())
            });
    }

    table
        .bus
        .emit_named(
            "ai:decisionMade",
            json!({"playerId": 2, "decision": "stay"}),
        )
        .unwrap();

    assert_eq!(transcript.lines(), vec!["player-2:Stay"]);
}
