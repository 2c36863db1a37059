//! Протокол силы карты: выбрать цель(и), затем применить.
//!
//! Любое завершение протокола (применение, отказ, прерывание) сразу
//! завершает ход через `game_loop::finish_turn`.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::card::{Card, Power};
use crate::domain::{CardId, PlayerId};
use crate::engine::actions::{PowerDecision, SlotRef};
use crate::engine::errors::EngineError;
use crate::engine::game_loop::finish_turn;
use crate::engine::history::MatchEventKind;
use crate::engine::notices::{PrivateKind, PrivateNotice};
use crate::engine::validation::{ensure_in_play, occupied_slot};
use crate::state::{MatchState, TurnStage};

/// Выбранная цель: слот и карта, которая лежала в нём в момент выбора.
///
/// Если к моменту применения в слоте другая карта (её увели гонкой,
/// а слот заняли подарком), цель считается потерянной.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chosen {
    pub slot: SlotRef,
    pub card: CardId,
}

/// Шаг подсмотра.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PeekStep {
    Choosing,
    /// Карта показана игроку, ждём таймаут или подтверждение.
    Revealing { target: Chosen },
}

/// Шаг обмена с просмотром.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViewSwapStep {
    Choosing { first: Option<Chosen> },
    /// Обе карты показаны, ждём confirm/decline.
    Deciding { first: Chosen, second: Chosen },
}

/// Состояние выбора для каждого вида силы.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PowerSelection {
    PeekOwn(PeekStep),
    PeekOpponent(PeekStep),
    BlindSwap { first: Option<Chosen> },
    ViewSwap(ViewSwapStep),
}

/// Активная сила: кто применяет, какая карта её дала, прогресс выбора.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingPower {
    /// Номер активации (нужен, чтобы отсеять устаревшие таймауты).
    pub seq: u64,
    pub actor: PlayerId,
    pub source_card: Card,
    pub selection: PowerSelection,
}

impl PendingPower {
    pub fn power(&self) -> Power {
        match self.selection {
            PowerSelection::PeekOwn(_) => Power::PeekOwn,
            PowerSelection::PeekOpponent(_) => Power::PeekOpponent,
            PowerSelection::BlindSwap { .. } => Power::BlindSwap,
            PowerSelection::ViewSwap(_) => Power::ViewSwap,
        }
    }

    /// Сколько целей уже выбрано (0, 1 или 2).
    pub fn targets_chosen(&self) -> u8 {
        match self.selection {
            PowerSelection::PeekOwn(PeekStep::Choosing)
            | PowerSelection::PeekOpponent(PeekStep::Choosing)
            | PowerSelection::BlindSwap { first: None }
            | PowerSelection::ViewSwap(ViewSwapStep::Choosing { first: None }) => 0,
            PowerSelection::PeekOwn(PeekStep::Revealing { .. })
            | PowerSelection::PeekOpponent(PeekStep::Revealing { .. })
            | PowerSelection::BlindSwap { first: Some(_) }
            | PowerSelection::ViewSwap(ViewSwapStep::Choosing { first: Some(_) }) => 1,
            PowerSelection::ViewSwap(ViewSwapStep::Deciding { .. }) => 2,
        }
    }
}

/// Запустить силу карты для игрока, чей ход.
///
/// Возвращает `false`, если применить силу не к чему (нет подходящих
/// целей) — тогда сила сразу прерывается и ход завершает вызывающий код.
pub(crate) fn begin(state: &mut MatchState, actor: PlayerId, card: Card) -> bool {
    let power = card.power;
    let selection = match power {
        Power::PeekOwn => PowerSelection::PeekOwn(PeekStep::Choosing),
        Power::PeekOpponent => PowerSelection::PeekOpponent(PeekStep::Choosing),
        Power::BlindSwap => PowerSelection::BlindSwap { first: None },
        Power::ViewSwap => PowerSelection::ViewSwap(ViewSwapStep::Choosing { first: None }),
        Power::None | Power::Wild => return false,
    };

    if !has_targets(state, actor, power) {
        debug!(match_id = state.id, player_id = actor, ?power, "power has no targets, aborting");
        state
            .history
            .push(MatchEventKind::PowerAborted { player_id: actor, power });
        return false;
    }

    let seq = state.next_power_seq;
    state.next_power_seq += 1;

    info!(match_id = state.id, player_id = actor, ?power, power_seq = seq, "power activated");
    state.history.push(MatchEventKind::PowerActivated {
        player_id: actor,
        power,
        power_seq: seq,
    });
    state.stage = TurnStage::Power(PendingPower {
        seq,
        actor,
        source_card: card,
        selection,
    });
    true
}

fn has_targets(state: &MatchState, actor: PlayerId, power: Power) -> bool {
    let own = state
        .player(actor)
        .map(|p| p.hand.occupied_count())
        .unwrap_or(0);
    let total: usize = state.players.iter().map(|p| p.hand.occupied_count()).sum();

    match power {
        Power::PeekOwn => own > 0,
        Power::PeekOpponent => total > own,
        Power::BlindSwap | Power::ViewSwap => total >= 2,
        Power::None | Power::Wild => false,
    }
}

/// Текущая сила, если её применяет именно этот игрок.
fn pending_for(state: &MatchState, actor: PlayerId) -> Result<PendingPower, EngineError> {
    ensure_in_play(state)?;
    match &state.stage {
        TurnStage::Power(pending) if pending.actor == actor => Ok(pending.clone()),
        TurnStage::Power(_) => Err(EngineError::IllegalPhase("силу применяет другой игрок")),
        _ => Err(EngineError::IllegalPhase("нет активной силы")),
    }
}

/// Выбрать очередную цель силы.
pub fn select(
    state: &mut MatchState,
    actor: PlayerId,
    target: SlotRef,
    private: &mut Vec<PrivateNotice>,
) -> Result<(), EngineError> {
    let mut pending = pending_for(state, actor)?;
    let card = occupied_slot(state, target)?.card;
    let chosen = Chosen {
        slot: target,
        card: card.id,
    };

    match pending.selection {
        PowerSelection::PeekOwn(PeekStep::Choosing) => {
            if target.player != actor {
                return Err(EngineError::InvalidTarget("подсмотр своей карты"));
            }
            pending.selection = PowerSelection::PeekOwn(PeekStep::Revealing { target: chosen });
            reveal_peek(state, &pending, target, card, private);
        }
        PowerSelection::PeekOpponent(PeekStep::Choosing) => {
            if target.player == actor {
                return Err(EngineError::InvalidTarget("подсмотр карты соперника"));
            }
            pending.selection = PowerSelection::PeekOpponent(PeekStep::Revealing { target: chosen });
            reveal_peek(state, &pending, target, card, private);
        }
        PowerSelection::PeekOwn(PeekStep::Revealing { .. })
        | PowerSelection::PeekOpponent(PeekStep::Revealing { .. }) => {
            return Err(EngineError::IllegalPhase("карта уже подсмотрена"));
        }

        PowerSelection::BlindSwap { first: None } => {
            pending.selection = PowerSelection::BlindSwap {
                first: Some(chosen),
            };
            state.history.push(MatchEventKind::PowerTargetSelected {
                player_id: actor,
                target,
            });
        }
        PowerSelection::BlindSwap { first: Some(first) } => {
            if first.slot == target {
                return Err(EngineError::InvalidTarget("нужны два разных слота"));
            }
            state.history.push(MatchEventKind::PowerTargetSelected {
                player_id: actor,
                target,
            });
            if !still_holds(state, first) {
                abort(state, &pending);
                return Ok(());
            }
            exchange(state, first.slot, target);
            state.history.push(MatchEventKind::CardsExchanged {
                first: first.slot,
                second: target,
                blind: true,
            });
            complete(state, &pending);
            return Ok(());
        }

        PowerSelection::ViewSwap(ViewSwapStep::Choosing { first: None }) => {
            pending.selection = PowerSelection::ViewSwap(ViewSwapStep::Choosing {
                first: Some(chosen),
            });
            reveal_candidate(state, &pending, target, card, private);
        }
        PowerSelection::ViewSwap(ViewSwapStep::Choosing { first: Some(first) }) => {
            if first.slot == target {
                return Err(EngineError::InvalidTarget("нужны два разных слота"));
            }
            if !still_holds(state, first) {
                state.history.push(MatchEventKind::PowerTargetSelected {
                    player_id: actor,
                    target,
                });
                abort(state, &pending);
                return Ok(());
            }
            pending.selection = PowerSelection::ViewSwap(ViewSwapStep::Deciding {
                first,
                second: chosen,
            });
            reveal_candidate(state, &pending, target, card, private);
        }
        PowerSelection::ViewSwap(ViewSwapStep::Deciding { .. }) => {
            return Err(EngineError::IllegalPhase("обе карты уже выбраны"));
        }
    }

    state.stage = TurnStage::Power(pending);
    Ok(())
}

/// Решение по силе.
///
/// - подсмотр в фазе показа: любое решение закрывает показ;
/// - обмен с просмотром: Confirm меняет карты, Decline оставляет как есть;
/// - до выбора первой цели: Decline отменяет силу.
pub fn confirm(
    state: &mut MatchState,
    actor: PlayerId,
    decision: PowerDecision,
) -> Result<(), EngineError> {
    let pending = pending_for(state, actor)?;

    match (pending.selection, decision) {
        (
            PowerSelection::PeekOwn(PeekStep::Revealing { target })
            | PowerSelection::PeekOpponent(PeekStep::Revealing { target }),
            _,
        ) => {
            close_reveal(state, &pending, target);
            Ok(())
        }

        (PowerSelection::ViewSwap(ViewSwapStep::Deciding { first, second }), PowerDecision::Confirm) => {
            if !still_holds(state, first) || !still_holds(state, second) {
                abort(state, &pending);
                return Ok(());
            }
            exchange(state, first.slot, second.slot);
            state.history.push(MatchEventKind::CardsExchanged {
                first: first.slot,
                second: second.slot,
                blind: false,
            });
            complete(state, &pending);
            Ok(())
        }
        (PowerSelection::ViewSwap(ViewSwapStep::Deciding { .. }), PowerDecision::Decline) => {
            state
                .history
                .push(MatchEventKind::PowerDeclined { player_id: actor });
            finish_turn(state);
            Ok(())
        }

        (_, PowerDecision::Decline) if pending.targets_chosen() == 0 => {
            state.history.push(MatchEventKind::PowerSkipped {
                player_id: actor,
                power: pending.power(),
            });
            finish_turn(state);
            Ok(())
        }

        _ => Err(EngineError::IllegalPhase("сила ждёт выбора цели")),
    }
}

/// Таймаут показа подсмотренной карты.
///
/// Устаревший таймаут (сила уже закрыта или это другая активация)
/// отклоняется как StaleTarget и ничего не меняет.
pub fn reveal_expired(state: &mut MatchState, power_seq: u64) -> Result<(), EngineError> {
    ensure_in_play(state)?;
    let pending = match &state.stage {
        TurnStage::Power(p) if p.seq == power_seq => p.clone(),
        _ => return Err(EngineError::StaleTarget),
    };

    match pending.selection {
        PowerSelection::PeekOwn(PeekStep::Revealing { target })
        | PowerSelection::PeekOpponent(PeekStep::Revealing { target }) => {
            close_reveal(state, &pending, target);
            Ok(())
        }
        _ => Err(EngineError::StaleTarget),
    }
}

fn reveal_peek(
    state: &mut MatchState,
    pending: &PendingPower,
    target: SlotRef,
    card: Card,
    private: &mut Vec<PrivateNotice>,
) {
    state.history.push(MatchEventKind::PowerTargetSelected {
        player_id: pending.actor,
        target,
    });
    private.push(PrivateNotice {
        player_id: pending.actor,
        kind: PrivateKind::PeekResult {
            power_seq: pending.seq,
            target,
            card,
            reveal_ms: state.config.peek_reveal_ms,
        },
    });
}

fn reveal_candidate(
    state: &mut MatchState,
    pending: &PendingPower,
    target: SlotRef,
    card: Card,
    private: &mut Vec<PrivateNotice>,
) {
    state.history.push(MatchEventKind::PowerTargetSelected {
        player_id: pending.actor,
        target,
    });
    private.push(PrivateNotice {
        player_id: pending.actor,
        kind: PrivateKind::SwapCandidate {
            power_seq: pending.seq,
            target,
            card,
        },
    });
}

/// Лежит ли в выбранном слоте всё та же карта.
fn still_holds(state: &MatchState, chosen: Chosen) -> bool {
    occupied_slot(state, chosen.slot).map_or(false, |hc| hc.card.id == chosen.card)
}

/// Закрыть показ: если карту за это время увели — сила прерывается без штрафа.
fn close_reveal(state: &mut MatchState, pending: &PendingPower, target: Chosen) {
    if !still_holds(state, target) {
        abort(state, pending);
    } else {
        complete(state, pending);
    }
}

fn complete(state: &mut MatchState, pending: &PendingPower) {
    debug!(match_id = state.id, player_id = pending.actor, power_seq = pending.seq, "power resolved");
    state.history.push(MatchEventKind::PowerResolved {
        player_id: pending.actor,
        power: pending.power(),
    });
    finish_turn(state);
}

fn abort(state: &mut MatchState, pending: &PendingPower) {
    info!(match_id = state.id, player_id = pending.actor, power_seq = pending.seq, "power target vanished, aborting");
    state.history.push(MatchEventKind::PowerAborted {
        player_id: pending.actor,
        power: pending.power(),
    });
    finish_turn(state);
}

/// Обменять карты двух занятых слотов на месте. Обе ложатся рубашкой вверх.
/// Слоты могут принадлежать одному игроку.
fn exchange(state: &mut MatchState, a: SlotRef, b: SlotRef) {
    let card_a = state.player_mut(a.player).and_then(|p| p.hand.take(a.slot));
    let card_b = state.player_mut(b.player).and_then(|p| p.hand.take(b.slot));

    match (card_a, card_b) {
        (Some(x), Some(y)) => {
            put(state, a, y);
            put(state, b, x);
        }
        // Слоты проверяются заранее; если нет — карты возвращаются на место.
        (x, y) => {
            if let Some(x) = x {
                put(state, a, x);
            }
            if let Some(y) = y {
                put(state, b, y);
            }
        }
    }
}

fn put(state: &mut MatchState, at: SlotRef, card: Card) {
    if let Some(player) = state.player_mut(at.player) {
        if let Err(card) = player.hand.place(at.slot, card) {
            player.hand.add(card);
        }
    }
}
