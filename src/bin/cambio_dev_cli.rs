// src/bin/cambio_dev_cli.rs
//
// Dev-CLI: один матч ботами от лобби до подсчёта очков.
//
// CAMBIO_CONFIG — путь к JSON-конфигу матча (иначе конфиг по умолчанию).
// CAMBIO_SEED   — u64 seed (иначе случайный).
// RUST_LOG      — фильтр логов (по умолчанию info).

use std::error::Error;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cambio_engine::api::build_match_view;
use cambio_engine::domain::{MatchConfig, PlayerId};
use cambio_engine::engine::{
    scoring, DrawSource, EngineError, ManagerError, MatchAction, MatchManager, TurnResolution,
};
use cambio_engine::infra::{InMemoryMatchStore, RngSeed, SystemRng, TracingSink};
use cambio_engine::state::{MatchState, Phase, TurnStage};

const MATCH_ID: u64 = 1;
const MAX_TURNS: u64 = 200;
/// Бот объявляет камбио, когда сумма его руки не больше этого порога.
const CAMBIO_THRESHOLD: i32 = 6;

type Manager = MatchManager<InMemoryMatchStore, TracingSink>;

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match std::env::var("CAMBIO_CONFIG") {
        Ok(path) => MatchConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        Err(_) => MatchConfig::default(),
    };
    let seed = match std::env::var("CAMBIO_SEED") {
        Ok(raw) => RngSeed::from_u64(raw.parse()?),
        Err(_) => SystemRng.fresh_seed(),
    };

    println!("cambio_dev_cli: стартуем матч ботами…");

    let manager = MatchManager::new(InMemoryMatchStore::new(), TracingSink);
    manager.create_match(MATCH_ID, config.clone(), seed)?;

    let bots = config.min_players.max(3).min(config.max_players);
    let players: Vec<PlayerId> = (1..=bots as u64).collect();
    for &pid in &players {
        manager.execute(
            MATCH_ID,
            MatchAction::Join {
                player_id: pid,
                name: format!("Bot {pid}"),
            },
        )?;
    }
    manager.execute(MATCH_ID, MatchAction::Start)?;
    for &pid in &players {
        manager.execute(MATCH_ID, MatchAction::ConfirmPeeked { player_id: pid })?;
    }

    while manager.snapshot(MATCH_ID)?.phase != Phase::Ended {
        let state = manager.snapshot(MATCH_ID)?;
        if state.turns_completed >= MAX_TURNS {
            warn!(turns = state.turns_completed, "turn limit reached, force-ending");
            manager.execute(MATCH_ID, MatchAction::ForceEnd)?;
            break;
        }
        play_turn(&manager, &state)?;
        maybe_call_cambio(&manager)?;
    }

    print_result(&manager.snapshot(MATCH_ID)?);
    Ok(())
}

/// Простой бот: тянет из колоды, меняет свою самую дорогую карту,
/// если вытянутая дешевле; силы не использует.
fn play_turn(manager: &Manager, state: &MatchState) -> Result<(), ManagerError> {
    let Some(owner) = state.turn_owner() else {
        return Ok(());
    };
    let pid = owner.id;

    match manager.execute(
        MATCH_ID,
        MatchAction::Draw {
            player_id: pid,
            source: DrawSource::Deck,
        },
    ) {
        Ok(_) => {}
        Err(ManagerError::Engine(EngineError::EmptySource(_))) => {
            warn!("no cards left to draw, force-ending");
            manager.execute(MATCH_ID, MatchAction::ForceEnd)?;
            return Ok(());
        }
        Err(e) => return Err(e),
    }

    let state = manager.snapshot(MATCH_ID)?;
    let TurnStage::AwaitingResolution { drawn, .. } = state.stage else {
        return Ok(());
    };
    let worst = state.player(pid).and_then(|p| {
        p.hand
            .occupied_slots()
            .filter_map(|s| p.hand.get(s).map(|hc| (s, hc.card.value)))
            .max_by_key(|(_, v)| *v)
    });

    let resolution = match worst {
        Some((slot, value)) if drawn.value < value => TurnResolution::Swap { slot },
        _ => TurnResolution::Discard,
    };
    manager.execute(
        MATCH_ID,
        MatchAction::ResolveTurn {
            player_id: pid,
            resolution,
            use_power: false,
        },
    )?;
    Ok(())
}

/// Игрок, только что закончивший ход, объявляет камбио при малой руке.
fn maybe_call_cambio(manager: &Manager) -> Result<(), ManagerError> {
    let state = manager.snapshot(MATCH_ID)?;
    if state.phase != Phase::Playing {
        return Ok(());
    }
    let Some(seat) = state.last_completed_turn else {
        return Ok(());
    };
    let Some(player) = state.players.get(seat as usize) else {
        return Ok(());
    };

    if scoring::hand_total(&player.hand) <= CAMBIO_THRESHOLD {
        info!(player_id = player.id, "bot calls cambio");
        manager.execute(
            MATCH_ID,
            MatchAction::CallCambio {
                player_id: player.id,
            },
        )?;
    }
    Ok(())
}

fn print_result(state: &MatchState) {
    let view = build_match_view(state);
    println!();
    println!("================ MATCH RESULT =================");
    println!(
        "turns: {} | deck: {} | discard: {}",
        state.turns_completed, view.deck_size, view.discard_size
    );
    if let Some(settlement) = &state.settlement {
        for s in &settlement.scores {
            println!(
                "player {} (seat {}): hand {} + penalty {} = {}",
                s.player_id, s.seat, s.hand_total, s.penalty, s.final_score
            );
        }
        println!("winners: {:?}", settlement.winners);
    }
}
