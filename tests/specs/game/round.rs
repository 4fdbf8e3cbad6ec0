//! Round flow specs
//!
//! Drive a scripted round through a toy rules engine, a bot and the UI,
//! all talking only through the bus.

use crate::prelude::*;
use similar_asserts::assert_eq;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Just enough of a rules engine to deal, draw and bust
struct Engine {
    seats: Vec<PlayerState>,
    /// Top of the deck is the end of the vec
    deck: RefCell<Vec<Card>>,
    hands: RefCell<HashMap<PlayerId, Vec<u8>>>,
}

impl Engine {
    fn new(seats: Vec<PlayerState>, mut deck: Vec<Card>) -> Rc<Self> {
        deck.reverse();
        Rc::new(Self {
            seats,
            deck: RefCell::new(deck),
            hands: RefCell::new(HashMap::new()),
        })
    }

    fn draw(&self) -> Result<Card, ListenerFailure> {
        self.deck
            .borrow_mut()
            .pop()
            .ok_or_else(|| ListenerFailure::new("deck is empty"))
    }

    fn is_human(&self, player: PlayerId) -> bool {
        self.seats.iter().any(|p| p.id == player && p.is_human)
    }

    fn install(self: &Rc<Self>, bus: &EventBus) {
        let engine = Rc::clone(self);
        bus.on_payload::<RoundStart, _>(move |start, bus| {
            bus.emit(RequestInitialDeal {
                players: engine.seats.iter().map(|p| p.id).collect(),
                dealer_index: start.dealer_index,
            })?;
            Ok(())
        });

        let engine = Rc::clone(self);
        bus.on_payload::<RequestInitialDeal, _>(move |deal, bus| {
            for (index, player_id) in deal.players.iter().enumerate() {
                let card = engine.draw()?;
                if let Some(value) = number_on(&card) {
                    engine
                        .hands
                        .borrow_mut()
                        .entry(*player_id)
                        .or_default()
                        .push(value);
                }
                bus.emit(CardDealt {
                    player_id: *player_id,
                    player_index: index,
                    card,
                    is_initial_deal: true,
                })?;
            }
            bus.emit(InitialDealComplete {
                players: engine.seats.clone(),
            })?;

            let first = (deal.dealer_index + 1) % deal.players.len();
            bus.emit(TurnStart {
                player_id: deal.players[first],
                player_index: first,
            })?;
            Ok(())
        });

        let engine = Rc::clone(self);
        bus.on_payload::<ExecuteHit, _>(move |hit, bus| {
            let card = engine.draw()?;
            let duplicate = number_on(&card).is_some_and(|value| {
                engine
                    .hands
                    .borrow()
                    .get(&hit.player_id)
                    .is_some_and(|hand| hand.contains(&value))
            });

            if duplicate {
                bus.emit(PlayerBust {
                    player_id: hit.player_id,
                    card: Some(card),
                })?;
            } else {
                bus.emit(CardDrawn {
                    player_id: hit.player_id,
                    card,
                    is_initial_deal: false,
                })?;
            }
            bus.emit(TurnEnd {
                player_id: hit.player_id,
            })?;
            Ok(())
        });

        bus.on_payload::<TurnEnd, _>(|_, bus| {
            bus.emit(RoundShouldEnd {})?;
            Ok(())
        });
    }
}

fn number_on(card: &Card) -> Option<u8> {
    match card.face {
        CardFace::Number(n) => Some(n),
        _ => None,
    }
}

/// A bot that always hits
fn install_bot(engine: &Rc<Engine>, bus: &EventBus) {
    let engine = Rc::clone(engine);
    bus.on_payload::<TurnStart, _>(move |turn, bus| {
        if engine.is_human(turn.player_id) {
            return Ok(());
        }
        bus.emit(AiThinking {
            player_id: turn.player_id,
        })?;
        bus.emit(AiDecisionMade {
            player_id: turn.player_id,
            decision: Decision::Hit,
        })?;
        bus.emit(ExecuteHit {
            player_id: turn.player_id,
        })?;
        Ok(())
    });
}

/// Mobile sync mirrors busts to the player's phone
fn install_mobile_sync(bus: &EventBus) {
    bus.on_payload::<PlayerBust, _>(|bust, bus| {
        bus.emit(MobileSyncNeeded {
            player_id: bust.player_id,
        })?;
        Ok(())
    });
}

#[test]
fn bot_busts_on_a_duplicate_after_the_initial_deal() {
    flip7_events::telemetry::init_test_writer();

    let table = Table::new();
    let transcript = Transcript::new();

    // UI first, so it sees every event as dispatch begins
    table
        .bus
        .subscribe_pattern(
            &EventPattern::all(),
            {
                let transcript = transcript.clone();
                move |envelope: &Envelope, _: &EventBus| {
                    transcript.push(envelope.kind().as_str());
                    Ok(())
                }
            },
            SubscribeOptions::default().with_label("ui"),
        )
        .unwrap();

    let engine = Engine::new(
        vec![player(1, "Ada", true), player(2, "Bot", false)],
        vec![
            Card::number("n-5a", 5),
            Card::number("n-9a", 9),
            Card::number("n-9b", 9),
        ],
    );
    engine.install(&table.bus);
    install_bot(&engine, &table.bus);
    install_mobile_sync(&table.bus);

    let busted = Rc::new(RefCell::new(None));
    {
        let busted = Rc::clone(&busted);
        table
            .bus
            .once_payload::<PlayerBust, _>(move |bust, _| {
                *busted.borrow_mut() = Some(bust.clone());
                Ok(())
            });
    }

    let delivery = table
        .bus
        .emit(RoundStart {
            round_number: 1,
            dealer_index: 0,
        })
        .unwrap();

    assert_eq!(
        transcript.lines(),
        vec![
            "round:start",
            "coordination:requestInitialDeal",
            "card:dealt",
            "card:dealt",
            "initialDeal:complete",
            "turn:start",
            "ai:thinking",
            "ai:decisionMade",
            "coordination:executeHit",
            "player:bust",
            "mobile:syncNeeded",
            "turn:end",
            "coordination:roundShouldEnd",
        ]
    );
    assert_eq!(delivery.sequence, 1);
    assert_eq!(table.bus.last_sequence(), 13);
    assert!(table.diagnostics.is_empty());
    assert_eq!(
        *busted.borrow(),
        Some(PlayerBust {
            player_id: PlayerId(2),
            card: Some(Card::number("n-9b", 9)),
        })
    );
}

#[test]
fn empty_deck_is_reported_without_stopping_the_round() {
    let table = Table::new();
    let engine = Engine::new(
        vec![player(1, "Ada", true), player(2, "Bot", false)],
        vec![Card::number("n-1", 1)],
    );
    engine.install(&table.bus);

    table
        .bus
        .emit(RoundStart {
            round_number: 1,
            dealer_index: 0,
        })
        .unwrap();

    let errors = table.diagnostics.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, EventKind::RequestInitialDeal);
    assert_eq!(errors[0].message, "deck is empty");
}

#[test]
fn freeze_target_selection_round_trip() {
    let table = Table::new();
    let transcript = Transcript::new();
    let freeze = Card::action("a-freeze-1", ActionKind::Freeze);

    // UI: pick the first available target
    table
        .bus
        .on_payload::<ActionCardTargetNeeded, _>(|needed, bus| {
            let Some(target) = needed.available_targets.first() else {
                return Err(ListenerFailure::new("no targets"));
            };
            bus.emit(ActionCardTargetSelected {
                card: needed.card.clone(),
                source_player: needed.source_player,
                target_player: *target,
                is_initial_deal: false,
                is_second_chance_redistribution: false,
            })?;
            Ok(())
        });

    // Engine: apply the freeze
    table
        .bus
        .on_payload::<ActionCardTargetSelected, _>(|selected, bus| {
            bus.emit(FreezeCardUsed {
                source_player: selected.source_player,
                target_player: selected.target_player,
            })?;
            bus.emit(PlayerFrozen {
                player_id: selected.target_player,
                frozen_by: Some(selected.source_player),
            })?;
            Ok(())
        });

    {
        let transcript = transcript.clone();
        table
            .bus
            .on_payload::<PlayerFrozen, _>(move |frozen, _| {
                transcript.push(format!(
                    "{} frozen by {}",
                    frozen.player_id,
                    frozen.frozen_by.map_or("nobody".to_string(), |p| p.to_string())
                ));
                Ok(())
            });
    }

    table
        .bus
        .emit(ActionCardTargetNeeded {
            card: freeze,
            source_player: PlayerId(1),
            available_targets: vec![PlayerId(3), PlayerId(2)],
            is_second_chance_redistribution: false,
        })
        .unwrap();

    assert_eq!(transcript.lines(), vec!["player-3 frozen by player-1"]);
    assert_eq!(table.bus.last_sequence(), 4);
}

#[test]
fn envelopes_carry_clock_time() {
    let table = Table::new();
    let stamps = Rc::new(RefCell::new(Vec::new()));
    {
        let stamps = Rc::clone(&stamps);
        table.bus.on(EventKind::GameEnd, move |envelope, _| {
            stamps.borrow_mut().push(envelope.timestamp());
            Ok(())
        });
    }

    let end = GameEnd {
        winner: player(1, "Ada", true),
        final_scores: vec![PlayerScore {
            player_id: PlayerId(1),
            round_score: 40,
            total_score: 212,
        }],
    };
    let before = table.clock.now();
    table.bus.emit(end.clone()).unwrap();
    table.clock.advance(chrono::Duration::minutes(3));
    table.bus.emit(end).unwrap();

    assert_eq!(
        *stamps.borrow(),
        vec![before, before + chrono::Duration::minutes(3)]
    );
}
