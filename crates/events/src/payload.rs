// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Payload types carried by game events
//!
//! Every catalog entry owns exactly one payload struct of the same name,
//! e.g. `EventKind::PlayerHit` carries [`PlayerHit`]. The shared value types
//! at the top of this module (players, cards, scores) are the vocabulary
//! those payloads are built from.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Shared value types
// ============================================================================

/// Seat identifier of a player at the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player-{}", self.0)
    }
}

/// Where a player stands within the current round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    Waiting,
    Active,
    Stayed,
    Busted,
    Frozen,
}

impl PlayerStatus {
    /// True while the player may still draw cards this round
    pub fn can_play(&self) -> bool {
        matches!(self, PlayerStatus::Active)
    }
}

/// Snapshot of a player as published to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,
    pub is_human: bool,
    pub total_score: u32,
    pub round_score: u32,
    pub number_cards: u32,
    pub unique_numbers: u32,
    pub modifier_cards: u32,
    pub action_cards: u32,
    pub status: PlayerStatus,
    pub has_second_chance: bool,
}

impl PlayerState {
    /// A fresh player with no cards and no score
    pub fn new(id: PlayerId, name: impl Into<String>, is_human: bool) -> Self {
        Self {
            id,
            name: name.into(),
            is_human,
            total_score: 0,
            round_score: 0,
            number_cards: 0,
            unique_numbers: 0,
            modifier_cards: 0,
            action_cards: 0,
            status: PlayerStatus::Waiting,
            has_second_chance: false,
        }
    }

    /// Total cards currently in front of the player
    pub fn card_count(&self) -> u32 {
        self.number_cards + self.modifier_cards + self.action_cards
    }
}

/// Round and total score of one player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerScore {
    pub player_id: PlayerId,
    pub round_score: u32,
    pub total_score: u32,
}

/// Score modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    #[serde(rename = "+2")]
    Plus2,
    #[serde(rename = "+4")]
    Plus4,
    #[serde(rename = "+6")]
    Plus6,
    #[serde(rename = "+8")]
    Plus8,
    #[serde(rename = "+10")]
    Plus10,
    #[serde(rename = "x2")]
    Times2,
    #[serde(rename = "second chance")]
    SecondChance,
}

impl Modifier {
    /// Flat bonus points; zero for the multiplier and second chance
    pub fn bonus(&self) -> u32 {
        match self {
            Modifier::Plus2 => 2,
            Modifier::Plus4 => 4,
            Modifier::Plus6 => 6,
            Modifier::Plus8 => 8,
            Modifier::Plus10 => 10,
            Modifier::Times2 | Modifier::SecondChance => 0,
        }
    }
}

/// Action cards that target a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Freeze,
    Flip3,
}

/// What is printed on a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CardFace {
    Number(u8),
    Modifier(Modifier),
    Action(ActionKind),
}

/// A physical card; `id` distinguishes copies with the same face
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub face: CardFace,
}

impl Card {
    pub fn new(id: impl Into<String>, face: CardFace) -> Self {
        Self {
            id: id.into(),
            face,
        }
    }

    pub fn number(id: impl Into<String>, value: u8) -> Self {
        Self::new(id, CardFace::Number(value))
    }

    pub fn modifier(id: impl Into<String>, modifier: Modifier) -> Self {
        Self::new(id, CardFace::Modifier(modifier))
    }

    pub fn action(id: impl Into<String>, action: ActionKind) -> Self {
        Self::new(id, CardFace::Action(action))
    }

    /// Points the card contributes before multipliers
    pub fn point_value(&self) -> u32 {
        match self.face {
            CardFace::Number(n) => u32::from(n),
            CardFace::Modifier(m) => m.bonus(),
            CardFace::Action(_) => 0,
        }
    }

    /// Freeze and Flip3 need a target before play continues
    pub fn requires_target(&self) -> bool {
        matches!(self.face, CardFace::Action(_))
    }

    pub fn is_second_chance(&self) -> bool {
        self.face == CardFace::Modifier(Modifier::SecondChance)
    }
}

/// Hit-or-stay decision taken by a player or bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Hit,
    Stay,
}

/// Which card animation finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardAnimation {
    Deal,
    Draw,
    SecondChanceTransfer,
}

/// How a Flip3 sequence ended for its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flip3Outcome {
    Success,
    Bust,
}

/// Presentation refresh requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UiUpdate {
    #[serde(rename_all = "camelCase")]
    RefreshPlayerCards { player_id: PlayerId },
    #[serde(rename_all = "camelCase")]
    DeckReshuffled { cards_remaining: u32 },
    #[serde(rename_all = "camelCase")]
    ShowActionCardPrompt { player_id: PlayerId },
    UpdateGameStatus { message: String },
}

// ============================================================================
// Lifecycle
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStart {
    pub players: Vec<PlayerState>,
    pub winning_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEnd {
    pub winner: PlayerState,
    pub final_scores: Vec<PlayerScore>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundStart {
    pub round_number: u32,
    pub dealer_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundEnd {
    pub round_number: u32,
    pub scores: Vec<PlayerScore>,
}

// ============================================================================
// Turns
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnStart {
    pub player_id: PlayerId,
    pub player_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnEnd {
    pub player_id: PlayerId,
}

// ============================================================================
// Player actions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerHit {
    pub player_id: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStay {
    pub player_id: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStayCompleted {
    pub player_id: PlayerId,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerBust {
    pub player_id: PlayerId,
    #[serde(default)]
    pub card: Option<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerFlip7 {
    pub player_id: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerFrozen {
    pub player_id: PlayerId,
    #[serde(default)]
    pub frozen_by: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerScoreUpdate {
    pub player_id: PlayerId,
    pub round_score: u32,
    pub total_score: u32,
}

// ============================================================================
// Cards
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDrawn {
    pub player_id: PlayerId,
    pub card: Card,
    #[serde(default)]
    pub is_initial_deal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDealt {
    pub player_id: PlayerId,
    pub player_index: usize,
    pub card: Card,
    #[serde(default)]
    pub is_initial_deal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardAnimationStart {
    pub player_id: PlayerId,
    pub animation: CardAnimation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardAnimationEnd {
    pub player_id: PlayerId,
    pub animation: CardAnimation,
    #[serde(default)]
    pub card: Option<Card>,
}

// ============================================================================
// Initial deal
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialDealStart {
    pub players: Vec<PlayerState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialDealPaused {
    pub paused_player: PlayerId,
    pub action_card: Card,
    pub current_player_index: usize,
    pub remaining_players: Vec<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialDealActionRequired {
    pub card: Card,
    pub source_player: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialDealResumed {
    pub resuming_player_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialDealComplete {
    pub players: Vec<PlayerState>,
}

// ============================================================================
// Special cards
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionCardUsed {
    pub card: Card,
    pub source_player: PlayerId,
    pub target_player: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreezeCardUsed {
    pub source_player: PlayerId,
    pub target_player: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flip3CardUsed {
    pub source_player: PlayerId,
    pub target_player: PlayerId,
}

/// One of the three cards forced onto a Flip3 target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flip3CardDealt {
    pub target_player: PlayerId,
    pub card: Card,
    /// 1-based position within the Flip3 sequence
    pub card_number: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flip3AnimationComplete {
    pub target_player: PlayerId,
    pub outcome: Flip3Outcome,
}

impl Flip3AnimationComplete {
    pub fn completed(&self) -> bool {
        self.outcome == Flip3Outcome::Success
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondChanceActivated {
    pub player_id: PlayerId,
    /// The duplicate that would have busted the player
    pub card: Card,
    pub second_chance_card: Card,
}

impl SecondChanceActivated {
    /// Both cards leave the table when a second chance is spent
    pub fn discarded_cards(&self) -> [&Card; 2] {
        [&self.second_chance_card, &self.card]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondChanceAnimationComplete {
    pub player_id: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondChanceAcquired {
    pub player_id: PlayerId,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondChanceGiven {
    #[serde(default)]
    pub giver: Option<PlayerId>,
    pub recipient: PlayerId,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionCardTargetNeeded {
    pub card: Card,
    pub source_player: PlayerId,
    pub available_targets: Vec<PlayerId>,
    #[serde(default)]
    pub is_second_chance_redistribution: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionCardTargetSelected {
    pub card: Card,
    pub source_player: PlayerId,
    pub target_player: PlayerId,
    #[serde(default)]
    pub is_initial_deal: bool,
    #[serde(default)]
    pub is_second_chance_redistribution: bool,
}

// ============================================================================
// AI
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiThinking {
    pub player_id: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiDecisionMade {
    pub player_id: PlayerId,
    pub decision: Decision,
}

// ============================================================================
// UI and device sync
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiUpdateNeeded {
    pub update: UiUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileSyncNeeded {
    pub player_id: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationComplete {
    pub animation: String,
}

// ============================================================================
// Scoring
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCalculated {
    pub player_id: PlayerId,
    pub round_score: u32,
    pub total_score: u32,
    #[serde(default)]
    pub flip7_bonus: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinningScoreReached {
    pub player_id: PlayerId,
    pub total_score: u32,
    pub winning_score: u32,
}

// ============================================================================
// Cross-module coordination
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestInitialDeal {
    pub players: Vec<PlayerId>,
    pub dealer_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestNextTurn {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteHit {
    pub player_id: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionCardDrawn {
    pub card: Card,
    pub source_player: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionCardExecutionComplete {
    pub source_player: PlayerId,
    #[serde(default)]
    pub end_turn: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flip3ProcessingComplete {
    pub source_player: PlayerId,
    pub target_player: PlayerId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundShouldEnd {}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
