// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The closed catalog of game events
//!
//! Every event the game can publish is declared once, in the table at the
//! bottom of this file. From that table the macro generates:
//! - `EventKind` - the fieldless enum of catalog entries
//! - `GameEvent` - the tagged union pairing each kind with its payload
//! - `Payload` impls linking each payload struct to its kind
//!
//! Wire strings follow the `domain:action` convention.

mod vocabulary;

pub use vocabulary::{Catalog, CatalogChange};

use crate::error::BusError;
use crate::event::Payload;
use crate::payload;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Catalog sections, in catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventGroup {
    Lifecycle,
    Turn,
    Player,
    Card,
    InitialDeal,
    SpecialCard,
    Ai,
    Ui,
    Score,
    Coordination,
}

impl EventGroup {
    pub const ALL: &'static [EventGroup] = &[
        EventGroup::Lifecycle,
        EventGroup::Turn,
        EventGroup::Player,
        EventGroup::Card,
        EventGroup::InitialDeal,
        EventGroup::SpecialCard,
        EventGroup::Ai,
        EventGroup::Ui,
        EventGroup::Score,
        EventGroup::Coordination,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventGroup::Lifecycle => "lifecycle",
            EventGroup::Turn => "turn",
            EventGroup::Player => "player",
            EventGroup::Card => "card",
            EventGroup::InitialDeal => "initial-deal",
            EventGroup::SpecialCard => "special-card",
            EventGroup::Ai => "ai",
            EventGroup::Ui => "ui",
            EventGroup::Score => "score",
            EventGroup::Coordination => "coordination",
        }
    }

    /// Kinds belonging to this group, in catalog order
    pub fn kinds(&self) -> impl Iterator<Item = EventKind> + '_ {
        EventKind::ALL.iter().copied().filter(move |k| k.group() == *self)
    }
}

impl fmt::Display for EventGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! event_catalog {
    ($(
        $group:ident {
            $(
                $(#[doc = $doc:literal])+
                $variant:ident = $wire:literal => $symbol:ident,
            )+
        }
    )+) => {
        /// Identifier of one category of game occurrence
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum EventKind {
            $($(
                $(#[doc = $doc])+
                $variant,
            )+)+
        }

        impl EventKind {
            /// Every catalog entry, in catalog order
            pub const ALL: &'static [EventKind] = &[$($(EventKind::$variant,)+)+];

            /// Wire string, e.g. `"player:hit"`
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($(EventKind::$variant => $wire,)+)+
                }
            }

            /// Symbolic name, e.g. `"PLAYER_HIT"`
            pub const fn symbol(self) -> &'static str {
                match self {
                    $($(EventKind::$variant => stringify!($symbol),)+)+
                }
            }

            pub const fn group(self) -> EventGroup {
                match self {
                    $($(EventKind::$variant => EventGroup::$group,)+)+
                }
            }

            /// When the event fires
            pub fn description(self) -> &'static str {
                match self {
                    $($(EventKind::$variant => concat!($($doc),+).trim(),)+)+
                }
            }
        }

        /// An event of the catalog together with its payload
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(tag = "kind", content = "payload")]
        pub enum GameEvent {
            $($(
                #[serde(rename = $wire)]
                $variant(payload::$variant),
            )+)+
        }

        impl GameEvent {
            pub fn kind(&self) -> EventKind {
                match self {
                    $($(GameEvent::$variant(_) => EventKind::$variant,)+)+
                }
            }
        }

        $($(
            impl Payload for payload::$variant {
                const KIND: EventKind = EventKind::$variant;

                fn into_event(self) -> GameEvent {
                    GameEvent::$variant(self)
                }

                fn from_event(event: &GameEvent) -> Option<&Self> {
                    match event {
                        GameEvent::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )+)+
    };
}

impl EventKind {
    /// Number of catalog entries
    pub const COUNT: usize = EventKind::ALL.len();

    /// The part before the colon, e.g. `"player"`
    pub fn domain(self) -> &'static str {
        self.as_str()
            .split_once(':')
            .map_or(self.as_str(), |(domain, _)| domain)
    }

    /// The part after the colon, e.g. `"hit"`
    pub fn action(self) -> &'static str {
        self.as_str()
            .split_once(':')
            .map_or("", |(_, action)| action)
    }

    /// Look up a kind by symbolic name (`"PLAYER_HIT"`)
    pub fn from_symbol(symbol: &str) -> Result<Self, BusError> {
        EventKind::ALL
            .iter()
            .copied()
            .find(|k| k.symbol() == symbol)
            .ok_or_else(|| BusError::UnknownEventKind {
                name: symbol.to_string(),
            })
    }
}

impl FromStr for EventKind {
    type Err = BusError;

    /// Look up a kind by wire string (`"player:hit"`)
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == name)
            .ok_or_else(|| BusError::UnknownEventKind {
                name: name.to_string(),
            })
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

event_catalog! {
    Lifecycle {
        /// A new game begins with the seated players
        GameStart = "game:start" => GAME_START,
        /// A player reached the winning score and the game is over
        GameEnd = "game:end" => GAME_END,
        /// A round begins; the dealer has been chosen
        RoundStart = "round:start" => ROUND_START,
        /// Every player stayed, busted or froze; round scores are final
        RoundEnd = "round:end" => ROUND_END,
    }
    Turn {
        /// Control passes to the next active player
        TurnStart = "turn:start" => TURN_START,
        /// The current player's turn is over
        TurnEnd = "turn:end" => TURN_END,
    }
    Player {
        /// A player asked for another card
        PlayerHit = "player:hit" => PLAYER_HIT,
        /// A player chose to bank their round score
        PlayerStay = "player:stay" => PLAYER_STAY,
        /// A stay has been applied and the stay animation can play
        PlayerStayCompleted = "player:stayCompleted" => PLAYER_STAY_COMPLETED,
        /// A player drew a duplicate number without a second chance
        PlayerBust = "player:bust" => PLAYER_BUST,
        /// A player collected seven unique number cards
        PlayerFlip7 = "player:flip7" => PLAYER_FLIP7,
        /// A player was frozen by an action card
        PlayerFrozen = "player:frozen" => PLAYER_FROZEN,
        /// A player's round or total score changed
        PlayerScoreUpdate = "player:scoreUpdate" => PLAYER_SCORE_UPDATE,
    }
    Card {
        /// A player drew a card from the deck
        CardDrawn = "card:drawn" => CARD_DRAWN,
        /// The dealer placed a card in front of a player
        CardDealt = "card:dealt" => CARD_DEALT,
        /// A card animation started on screen
        CardAnimationStart = "card:animationStart" => CARD_ANIMATION_START,
        /// A card animation finished on screen
        CardAnimationEnd = "card:animationEnd" => CARD_ANIMATION_END,
    }
    InitialDeal {
        /// The opening one-card-each deal begins
        InitialDealStart = "initialDeal:start" => INITIAL_DEAL_START,
        /// The opening deal paused on an action card
        InitialDealPaused = "initialDeal:paused" => INITIAL_DEAL_PAUSED,
        /// An action card dealt during the opening deal needs resolving
        InitialDealActionRequired = "initialDeal:actionRequired" => INITIAL_DEAL_ACTION_REQUIRED,
        /// The opening deal continues after an action was resolved
        InitialDealResumed = "initialDeal:resumed" => INITIAL_DEAL_RESUMED,
        /// Every active player received an opening card
        InitialDealComplete = "initialDeal:complete" => INITIAL_DEAL_COMPLETE,
    }
    SpecialCard {
        /// An action card was played against a target
        ActionCardUsed = "actionCard:used" => ACTION_CARD_USED,
        /// A freeze card was played against a target
        FreezeCardUsed = "freezeCard:used" => FREEZE_CARD_USED,
        /// A flip-three card was played against a target
        Flip3CardUsed = "flip3Card:used" => FLIP3_CARD_USED,
        /// One of the three flip-three cards was dealt to the target
        Flip3CardDealt = "flip3:cardDealt" => FLIP3_CARD_DEALT,
        /// The flip-three sequence finished on screen
        Flip3AnimationComplete = "flip3:animationComplete" => FLIP3_ANIMATION_COMPLETE,
        /// A second chance absorbed a duplicate number
        SecondChanceActivated = "secondChance:activated" => SECOND_CHANCE_ACTIVATED,
        /// The second chance animation finished on screen
        SecondChanceAnimationComplete = "secondChance:animationComplete" => SECOND_CHANCE_ANIMATION_COMPLETE,
        /// A player picked up a second chance card
        SecondChanceAcquired = "secondChance:acquired" => SECOND_CHANCE_ACQUIRED,
        /// A spare second chance was handed to another player
        SecondChanceGiven = "secondChance:given" => SECOND_CHANCE_GIVEN,
        /// A card needs its holder to choose a target
        ActionCardTargetNeeded = "actionCard:targetNeeded" => ACTION_CARD_TARGET_NEEDED,
        /// The holder chose a target for a card
        ActionCardTargetSelected = "actionCard:targetSelected" => ACTION_CARD_TARGET_SELECTED,
    }
    Ai {
        /// A bot started deliberating
        AiThinking = "ai:thinking" => AI_THINKING,
        /// A bot decided to hit or stay
        AiDecisionMade = "ai:decisionMade" => AI_DECISION_MADE,
    }
    Ui {
        /// Part of the presentation must be refreshed
        UiUpdateNeeded = "ui:updateNeeded" => UI_UPDATE_NEEDED,
        /// A player's mobile view must be resynchronised
        MobileSyncNeeded = "mobile:syncNeeded" => MOBILE_SYNC_NEEDED,
        /// A named presentation animation finished
        AnimationComplete = "animation:complete" => ANIMATION_COMPLETE,
    }
    Score {
        /// A player's round score has been computed
        ScoreCalculated = "score:calculated" => SCORE_CALCULATED,
        /// A player's total reached the winning score
        WinningScoreReached = "score:winningReached" => WINNING_SCORE_REACHED,
    }
    Coordination {
        /// The state manager asks the card manager to run the opening deal
        RequestInitialDeal = "coordination:requestInitialDeal" => REQUEST_INITIAL_DEAL,
        /// The turn manager asks for the next turn to be scheduled
        RequestNextTurn = "coordination:requestNextTurn" => REQUEST_NEXT_TURN,
        /// The turn manager asks the card manager to deal a hit
        ExecuteHit = "coordination:executeHit" => EXECUTE_HIT,
        /// A drawn action card is handed to the action card handler
        ActionCardDrawn = "coordination:actionCardDrawn" => ACTION_CARD_DRAWN,
        /// The action card handler finished resolving a card
        ActionCardExecutionComplete = "coordination:actionCardExecutionComplete" => ACTION_CARD_EXECUTION_COMPLETE,
        /// All three flip-three cards were processed
        Flip3ProcessingComplete = "coordination:flip3ProcessingComplete" => FLIP3_PROCESSING_COMPLETE,
        /// No active players remain; the round must end
        RoundShouldEnd = "coordination:roundShouldEnd" => ROUND_SHOULD_END,
    }
}
