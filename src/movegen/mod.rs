//! Legal move generation.
//!
//! Enumerates candidate actions for the player expected to act, then keeps
//! the ones the rules accept by applying each to a speculative copy.

pub mod placement;

use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;

use crate::game::{GameConfig, GameState, Phase};
use crate::notation::Action;

/// Every action shape the expected actor could submit, unchecked.
///
/// `Pass` is only listed while a bonus shift is armed; otherwise it is
/// legal exactly when nothing here is.
pub fn candidate_actions(state: &GameState) -> Vec<Action> {
    if state.is_over() {
        return Vec::new();
    }
    let player = state.expected_actor();
    let tiles = state.tiles();

    if state.phase().is_selection() {
        return tiles
            .reserve_kinds(player)
            .into_iter()
            .map(|kind| Action::SelectForHand { tiles: vec![kind] })
            .collect();
    }

    let pending = state.pending();
    if pending.draws.is_some() {
        return tiles
            .reserve_kinds(player)
            .into_iter()
            .map(|tile| Action::CaptureDraw { tile })
            .collect();
    }
    if let Some(bonus) = pending.bonus {
        let mut actions = placement::bonus_candidates(player, bonus.from, state.board());
        actions.push(Action::Pass);
        return actions;
    }

    let mut actions = placement::deploy_candidates(player, state.board(), tiles);
    actions.extend(placement::shift_candidates(player, state.board()));
    actions.extend(
        tiles
            .reserve_kinds(player)
            .into_iter()
            .map(|tile| Action::Draw { tile }),
    );
    actions
}

/// Every action the expected actor may legally submit, in candidate order.
pub fn legal_actions(config: &GameConfig, state: &GameState) -> Vec<Action> {
    if state.is_over() {
        return Vec::new();
    }
    let player = state.expected_actor();
    let mut legal: Vec<Action> = candidate_actions(state)
        .into_par_iter()
        .filter(|action| state.speculate(config, player, action).is_ok())
        .collect();
    if legal.is_empty() && state.phase() == Phase::Playing {
        legal.push(Action::Pass);
    }
    legal
}

/// Returns true if the expected actor has any legal action besides `Pass`.
pub fn has_legal_action(config: &GameConfig, state: &GameState) -> bool {
    let player = state.expected_actor();
    candidate_actions(state)
        .into_par_iter()
        .filter(|action| *action != Action::Pass)
        .any(|action| state.speculate(config, player, &action).is_ok())
}

/// Picks a uniformly shuffled legal action, or `None` once the game is over.
pub fn random_action(config: &GameConfig, state: &GameState, rng: &mut impl Rng) -> Option<Action> {
    if state.is_over() {
        return None;
    }
    let player = state.expected_actor();
    let mut candidates = candidate_actions(state);
    candidates.shuffle(rng);
    candidates
        .into_iter()
        .find(|action| state.speculate(config, player, action).is_ok())
        .or_else(|| (state.phase() == Phase::Playing).then_some(Action::Pass))
}
