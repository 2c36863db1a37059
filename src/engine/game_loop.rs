use tracing::{debug, info};

use crate::domain::card::Card;
use crate::domain::deck::Deck;
use crate::domain::hand::Hand;
use crate::domain::player::Player;
use crate::domain::{PlayerId, SeatIndex, SlotIndex};
use crate::engine::actions::{DrawSource, MatchAction, TurnResolution};
use crate::engine::errors::{EngineError, Missing, Pile};
use crate::engine::history::MatchEventKind;
use crate::engine::notices::{ActionOutcome, PrivateKind, PrivateNotice};
use crate::engine::positions::{next_seat, prev_seat};
use crate::engine::validation::{
    ensure_in_play, ensure_not_frozen, ensure_phase, ensure_turn_owner, seat_of,
};
use crate::engine::{piles, powers, race, scoring, RandomSource};
use crate::state::{MatchState, Phase, TurnStage};

/// Применить команду к матчу.
///
/// Команда применяется к рабочей копии; при ошибке `state` не меняется.
/// При успехе растёт `version`, а в ответе — новые публичные события
/// и личные уведомления.
pub fn apply_action(state: &mut MatchState, action: MatchAction) -> Result<ActionOutcome, EngineError> {
    // Журнал не копируется: команда пишет в пустое продолжение.
    let history = std::mem::take(&mut state.history);
    let mut next = state.clone();
    next.history = history.fork();
    let mut private = Vec::new();

    if let Err(e) = dispatch(&mut next, action, &mut private) {
        state.history = history;
        return Err(e);
    }

    let events = next.history.events.clone();
    let mut history = history;
    history.append(&next.history);
    history.trim_to(next.config.history_limit);
    next.history = history;
    next.version += 1;
    *state = next;

    Ok(ActionOutcome { events, private })
}

fn dispatch(
    state: &mut MatchState,
    action: MatchAction,
    private: &mut Vec<PrivateNotice>,
) -> Result<(), EngineError> {
    if state.phase == Phase::Ended {
        return Err(EngineError::IllegalPhase("матч завершён"));
    }

    match action {
        MatchAction::Join { player_id, name } => join(state, player_id, name),
        MatchAction::Leave { player_id } => leave(state, player_id),
        MatchAction::SetReady { player_id, ready } => set_ready(state, player_id, ready),
        MatchAction::Start => start(state, private),
        MatchAction::ConfirmPeeked { player_id } => confirm_peeked(state, player_id),
        MatchAction::Draw { player_id, source } => draw(state, player_id, source, private),
        MatchAction::ResolveTurn {
            player_id,
            resolution,
            use_power,
        } => resolve_turn(state, player_id, resolution, use_power),
        MatchAction::PowerSelect { player_id, target } => {
            powers::select(state, player_id, target, private)
        }
        MatchAction::PowerConfirm {
            player_id,
            decision,
        } => powers::confirm(state, player_id, decision),
        MatchAction::RevealExpired { power_seq } => powers::reveal_expired(state, power_seq),
        MatchAction::CallCambio { player_id } => call_cambio(state, player_id),
        MatchAction::RaceDiscard {
            player_id,
            target,
            expected_top,
        } => race::race_discard(state, player_id, target, expected_top),
        MatchAction::RaceGift { player_id, slot } => race::race_gift(state, player_id, slot),
        MatchAction::ForceEnd => force_end(state),
    }
}

//
// Лобби
//

fn join(state: &mut MatchState, player_id: PlayerId, name: String) -> Result<(), EngineError> {
    ensure_phase(state, Phase::Waiting, "вход только до старта")?;
    if state.seat_of(player_id).is_some() {
        return Err(EngineError::PlayerAlreadyJoined(player_id));
    }
    if state.player_count() >= state.config.max_players as usize {
        return Err(EngineError::MatchFull);
    }

    let seat = state.player_count() as SeatIndex;
    state.players.push(Player::new(player_id, name, seat));
    state
        .history
        .push(MatchEventKind::PlayerJoined { player_id, seat });
    info!(match_id = state.id, player_id, seat, "player joined");
    Ok(())
}

fn leave(state: &mut MatchState, player_id: PlayerId) -> Result<(), EngineError> {
    ensure_phase(state, Phase::Waiting, "выход только до старта")?;
    let seat = seat_of(state, player_id)?;

    state.players.remove(seat as usize);
    // Места уплотняются: seat = индекс.
    for (idx, p) in state.players.iter_mut().enumerate() {
        p.seat = idx as SeatIndex;
    }
    state.history.push(MatchEventKind::PlayerLeft { player_id });
    info!(match_id = state.id, player_id, "player left");
    Ok(())
}

fn set_ready(state: &mut MatchState, player_id: PlayerId, ready: bool) -> Result<(), EngineError> {
    ensure_phase(state, Phase::Waiting, "готовность только в лобби")?;
    let player = state
        .player_mut(player_id)
        .ok_or(EngineError::NotFound(Missing::Player(player_id)))?;
    player.ready = ready;
    state
        .history
        .push(MatchEventKind::ReadyChanged { player_id, ready });
    Ok(())
}

//
// Старт и подсмотр
//

/// Собрать и перемешать колоду, раздать руки, перейти к подсмотру.
fn start(state: &mut MatchState, private: &mut Vec<PrivateNotice>) -> Result<(), EngineError> {
    ensure_phase(state, Phase::Waiting, "матч уже начат")?;
    state.config.validate()?;

    let count = state.player_count();
    if count < state.config.min_players as usize {
        return Err(EngineError::NotEnoughPlayers);
    }
    if state.config.require_ready_to_start && !state.players.iter().all(|p| p.ready) {
        return Err(EngineError::PlayersNotReady);
    }

    let mut deck = Deck::full(&state.config.rules());
    let mut rng = state.next_rng();
    rng.shuffle(&mut deck.cards);

    let per_player = state.config.cards_per_player as usize;
    for player in state.players.iter_mut() {
        let mut cards = Vec::with_capacity(per_player);
        for _ in 0..per_player {
            cards.push(deck.draw_one().ok_or(EngineError::EmptySource(Pile::Deck))?);
        }
        player.hand = Hand::dealt(cards);
        player.peeked = false;
        player.score = 0;
    }

    state.deck = deck;
    state.discard.cards.clear();
    state.turn = 0;
    state.stage = TurnStage::AwaitingDraw;
    state.phase = Phase::Peeking;

    // Каждый видит свои "нижние" слоты.
    let peek = state.config.initial_peek_count as usize;
    for player in &state.players {
        let from = player.hand.len().saturating_sub(peek);
        let cards = (from..player.hand.len())
            .filter_map(|i| {
                let slot = i as SlotIndex;
                player.hand.get(slot).map(|hc| (slot, hc.card))
            })
            .collect();
        private.push(PrivateNotice {
            player_id: player.id,
            kind: PrivateKind::InitialPeek { cards },
        });
    }

    state.history.push(MatchEventKind::HandsDealt {
        players: count as u8,
        cards_per_player: state.config.cards_per_player,
        deck_size: state.deck.len(),
    });
    info!(
        match_id = state.id,
        players = count,
        deck_size = state.deck.len(),
        "match started, hands dealt"
    );
    Ok(())
}

fn confirm_peeked(state: &mut MatchState, player_id: PlayerId) -> Result<(), EngineError> {
    ensure_phase(state, Phase::Peeking, "подсмотр уже закончен")?;
    let player = state
        .player_mut(player_id)
        .ok_or(EngineError::NotFound(Missing::Player(player_id)))?;
    if player.peeked {
        return Err(EngineError::AlreadyClaimed("подсмотр уже подтверждён"));
    }
    player.peeked = true;
    state
        .history
        .push(MatchEventKind::PeekConfirmed { player_id });

    if state.players.iter().all(|p| p.peeked) {
        state.phase = Phase::Playing;
        state.history.push(MatchEventKind::PlayStarted {
            first_seat: state.turn,
        });
        info!(match_id = state.id, first_seat = state.turn, "all players peeked, play started");
    }
    Ok(())
}

//
// Ход
//

fn draw(
    state: &mut MatchState,
    player_id: PlayerId,
    source: DrawSource,
    private: &mut Vec<PrivateNotice>,
) -> Result<(), EngineError> {
    ensure_in_play(state)?;
    ensure_turn_owner(state, player_id)?;
    ensure_not_frozen(state, player_id)?;
    if state.stage != TurnStage::AwaitingDraw {
        return Err(EngineError::IllegalPhase("карта уже вытянута"));
    }

    let card = piles::draw(state, source)?;

    let public_card = match source {
        DrawSource::Deck => {
            private.push(PrivateNotice {
                player_id,
                kind: PrivateKind::DrawnCard { card },
            });
            None
        }
        DrawSource::Discard => Some(card),
    };
    state.history.push(MatchEventKind::CardDrawn {
        player_id,
        source,
        card: public_card,
    });
    state.stage = TurnStage::AwaitingResolution {
        drawn: card,
        source,
    };
    debug!(match_id = state.id, player_id, ?source, "card drawn");
    Ok(())
}

/// Разыграть вытянутую карту: сброс / обмен / добавить.
///
/// Сила активируется только у карты, попавшей в сброс, и только если
/// вытянутая карта пришла из колоды. При обмене это вытесненная карта.
fn resolve_turn(
    state: &mut MatchState,
    player_id: PlayerId,
    resolution: TurnResolution,
    use_power: bool,
) -> Result<(), EngineError> {
    ensure_in_play(state)?;
    ensure_turn_owner(state, player_id)?;
    ensure_not_frozen(state, player_id)?;
    let (drawn, source) = match state.stage {
        TurnStage::AwaitingResolution { drawn, source } => (drawn, source),
        _ => return Err(EngineError::IllegalPhase("нет вытянутой карты")),
    };

    let discarded: Option<Card> = match resolution {
        TurnResolution::Discard => {
            piles::discard(state, drawn);
            state.history.push(MatchEventKind::CardDiscarded {
                player_id,
                card: drawn,
            });
            Some(drawn)
        }
        TurnResolution::Swap { slot } => {
            let player = state
                .player_mut(player_id)
                .ok_or(EngineError::NotFound(Missing::Player(player_id)))?;
            if !player.hand.has_slot(slot) {
                return Err(EngineError::NotFound(Missing::Slot {
                    player: player_id,
                    slot,
                }));
            }
            let displaced = player
                .hand
                .replace(slot, drawn)
                .ok_or(EngineError::InvalidTarget("обмен с пустым слотом"))?;
            piles::discard(state, displaced);
            state.history.push(MatchEventKind::CardSwapped {
                player_id,
                slot,
                discarded: displaced,
            });
            Some(displaced)
        }
        TurnResolution::Add => {
            let player = state
                .player_mut(player_id)
                .ok_or(EngineError::NotFound(Missing::Player(player_id)))?;
            let slot = player.hand.add(drawn);
            state
                .history
                .push(MatchEventKind::CardAdded { player_id, slot });
            None
        }
    };
    state.stage = TurnStage::AwaitingDraw;

    let power_card = discarded.filter(|c| c.power.is_activatable() && source == DrawSource::Deck);
    match power_card {
        Some(card) if use_power && state.config.allow_card_powers => {
            if !powers::begin(state, player_id, card) {
                finish_turn(state);
            }
        }
        Some(card) => {
            state.history.push(MatchEventKind::PowerSkipped {
                player_id,
                power: card.power,
            });
            finish_turn(state);
        }
        None => finish_turn(state),
    }
    Ok(())
}

/// Завершить ход текущего игрока и передать ход дальше.
pub(crate) fn finish_turn(state: &mut MatchState) {
    state.stage = TurnStage::AwaitingDraw;
    state.last_completed_turn = Some(state.turn);
    state.turns_completed += 1;
    advance_turn(state);
}

/// Передать ход следующему месту. Возврат хода к объявившему камбио
/// завершает матч.
fn advance_turn(state: &mut MatchState) {
    let from = state.turn;
    let to = next_seat(from, state.player_count());
    state.turn = to;
    state
        .history
        .push(MatchEventKind::TurnAdvanced { from, to });
    debug!(match_id = state.id, from, to, "turn advanced");

    if state.cambio_caller_seat() == Some(to) {
        end_match(state);
    }
}

//
// Камбио и конец матча
//

/// Объявить камбио: только в промежутке сразу после своего хода,
/// пока следующий игрок ещё не тянул карту, и только один раз за матч.
fn call_cambio(state: &mut MatchState, player_id: PlayerId) -> Result<(), EngineError> {
    ensure_in_play(state)?;
    let seat = seat_of(state, player_id)?;
    if state.cambio_caller.is_some() {
        return Err(EngineError::AlreadyClaimed("камбио уже объявлено"));
    }

    let in_gap = state.stage == TurnStage::AwaitingDraw
        && state.last_completed_turn == Some(seat)
        && prev_seat(state.turn, state.player_count()) == seat;
    if !in_gap {
        return Err(EngineError::InvalidCambioTiming);
    }

    state.cambio_caller = Some(player_id);
    state.phase = Phase::FinalRound;
    state
        .history
        .push(MatchEventKind::CambioCalled { player_id, seat });
    info!(match_id = state.id, player_id, seat, "cambio called, final round");
    Ok(())
}

fn force_end(state: &mut MatchState) -> Result<(), EngineError> {
    ensure_in_play(state)?;
    // Недоигранная карта возвращается на верх сброса.
    if let TurnStage::AwaitingResolution { drawn, .. } = state.stage {
        piles::discard(state, drawn);
    }
    info!(match_id = state.id, "match force-ended by host");
    end_match(state);
    Ok(())
}

/// Подсчитать очки, открыть руки, перейти в Ended.
fn end_match(state: &mut MatchState) {
    let settlement = scoring::settle(
        &state.players,
        state.cambio_caller,
        state.config.cambio_penalty,
    );

    for player in state.players.iter_mut() {
        if let Some(score) = settlement.score_of(player.id) {
            player.score = score.final_score;
        }
        player.hand.reveal_all();
    }

    state.phase = Phase::Ended;
    state.stage = TurnStage::AwaitingDraw;
    state.race_gift = None;

    info!(
        match_id = state.id,
        winners = ?settlement.winners,
        caller_penalized = settlement.caller_penalized,
        "match ended"
    );
    state.settlement = Some(settlement.clone());
    state
        .history
        .push(MatchEventKind::MatchEnded { settlement });
}
