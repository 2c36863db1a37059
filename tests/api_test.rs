// tests/api_test.rs

mod common;

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

use cambio_engine::api::{
    handle_command, handle_query, Command, CommandResponse, CreateMatchCommand, MatchCommand,
    Query, QueryResponse, SlotDto, StageDto,
};
use cambio_engine::domain::MatchConfig;
use cambio_engine::engine::{DrawSource, ErrorKind, MatchAction, MatchEventKind, MatchManager};
use cambio_engine::infra::{InMemoryMatchStore, RecordingSink, RngSeed};
use cambio_engine::state::Phase;

use common::*;

type Manager = MatchManager<InMemoryMatchStore, RecordingSink>;

fn manager_with_match(players: u64) -> Manager {
    init_logging();
    let m = MatchManager::new(InMemoryMatchStore::new(), RecordingSink::new());

    let created = handle_command(
        &m,
        Command::CreateMatch(CreateMatchCommand {
            match_id: 1,
            config: MatchConfig::default(),
            seed: RngSeed::from_u64(5),
        }),
    )
    .unwrap();
    match created {
        CommandResponse::MatchCreated(view) => {
            assert_eq!(view.phase, Phase::Waiting);
            assert!(view.players.is_empty());
        }
        other => panic!("unexpected response {other:?}"),
    }

    for pid in 1..=players {
        send(
            &m,
            MatchAction::Join {
                player_id: pid,
                name: format!("P{pid}"),
            },
        );
    }
    m
}

fn send(m: &Manager, action: MatchAction) -> CommandResponse {
    handle_command(
        m,
        Command::MatchCommand(MatchCommand {
            match_id: 1,
            action,
        }),
    )
    .unwrap()
}

#[test]
fn match_command_returns_new_view_and_events() {
    let m = manager_with_match(2);

    let resp = send(&m, MatchAction::Start);
    let CommandResponse::MatchState(changed) = resp else {
        panic!("expected state update");
    };
    assert_eq!(changed.view.phase, Phase::Peeking);
    assert_eq!(changed.view.deck_size, 54 - 8);
    assert_eq!(changed.version, m.snapshot(1).unwrap().version);
    assert!(!changed.events.is_empty());
}

#[test]
fn view_hides_face_down_and_deck_draws() {
    let m = manager_with_match(2);
    send(&m, MatchAction::Start);
    send(&m, MatchAction::ConfirmPeeked { player_id: 1 });
    send(&m, MatchAction::ConfirmPeeked { player_id: 2 });

    let resp = send(
        &m,
        MatchAction::Draw {
            player_id: 1,
            source: DrawSource::Deck,
        },
    );
    let CommandResponse::MatchState(changed) = resp else {
        panic!("expected state update");
    };
    assert_eq!(
        changed.view.stage,
        StageDto::AwaitingResolution { from_discard: None }
    );

    // В JSON публичного вида нет ни одного номинала карты из рук.
    let json = serde_json::to_string(&changed.view).unwrap();
    assert!(!json.contains("face_up"));
    for p in &changed.view.players {
        assert_eq!(p.slots.len(), 4);
        assert!(p.slots.iter().all(|s| *s == SlotDto::FaceDown));
    }
}

#[test]
fn engine_errors_keep_their_kind() {
    let m = manager_with_match(1);

    let err = handle_command(
        &m,
        Command::MatchCommand(MatchCommand {
            match_id: 1,
            action: MatchAction::Start,
        }),
    )
    .unwrap_err();
    assert_eq!(err.kind, Some(ErrorKind::IllegalPhase));
    assert!(!err.is_internal());

    let err = handle_command(
        &m,
        Command::MatchCommand(MatchCommand {
            match_id: 77,
            action: MatchAction::Start,
        }),
    )
    .unwrap_err();
    assert_eq!(err.kind, Some(ErrorKind::NotFound));
}

#[test]
fn queries_read_without_changing() {
    let m = manager_with_match(2);
    let version = m.snapshot(1).unwrap().version;

    match handle_query(&m, Query::GetMatch { match_id: 1 }).unwrap() {
        QueryResponse::Match(view) => assert_eq!(view.players.len(), 2),
        other => panic!("unexpected response {other:?}"),
    }
    match handle_query(&m, Query::GetSettlement { match_id: 1 }).unwrap() {
        QueryResponse::Settlement(s) => assert!(s.is_none()),
        other => panic!("unexpected response {other:?}"),
    }

    let err = handle_query(
        &m,
        Query::GetHand {
            match_id: 1,
            player_id: 9,
        },
    )
    .unwrap_err();
    assert_eq!(err.kind, Some(ErrorKind::NotFound));

    assert_eq!(m.snapshot(1).unwrap().version, version);
}

#[test]
fn settlement_query_after_force_end() {
    let m = manager_with_match(2);
    send(&m, MatchAction::Start);
    send(&m, MatchAction::ConfirmPeeked { player_id: 1 });
    send(&m, MatchAction::ConfirmPeeked { player_id: 2 });
    send(&m, MatchAction::ForceEnd);

    match handle_query(&m, Query::GetSettlement { match_id: 1 }).unwrap() {
        QueryResponse::Settlement(Some(s)) => {
            assert_eq!(s.scores.len(), 2);
            assert!(!s.winners.is_empty());
        }
        other => panic!("unexpected response {other:?}"),
    }

    // После окончания все карты открыты.
    match handle_query(
        &m,
        Query::GetHand {
            match_id: 1,
            player_id: 1,
        },
    )
    .unwrap()
    {
        QueryResponse::Hand(slots) => {
            assert!(slots.iter().all(|s| matches!(s, SlotDto::FaceUp(_))))
        }
        other => panic!("unexpected response {other:?}"),
    }
}

#[test]
fn commands_parse_from_json() {
    let m = manager_with_match(0);

    let raw = r#"{"MatchCommand":{"match_id":1,"action":{"join":{"player_id":3,"name":"Zoe"}}}}"#;
    let cmd: Command = serde_json::from_str(raw).unwrap();
    handle_command(&m, cmd).unwrap();

    let raw = r#"{"MatchCommand":{"match_id":1,"action":{"set_ready":{"player_id":3,"ready":true}}}}"#;
    let cmd: Command = serde_json::from_str(raw).unwrap();
    handle_command(&m, cmd).unwrap();

    let s = m.snapshot(1).unwrap();
    assert_eq!(s.players[0].name, "Zoe");
    assert!(s.players[0].ready);
}

/// Параллельные команды одного матча: каждый ответ показывает состояние,
/// сохранённое именно этой командой, а не чужой, выполненной следом.
#[test]
fn concurrent_commands_answer_with_their_own_state() {
    let m = Arc::new(manager_with_match(4));
    let base = m.snapshot(1).unwrap().version;

    let barrier = Arc::new(Barrier::new(4));
    let handles: Vec<_> = (1..=4u64)
        .map(|pid| {
            let m = Arc::clone(&m);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (pid, send(&m, MatchAction::SetReady { player_id: pid, ready: true }))
            })
        })
        .collect();

    let mut versions = HashSet::new();
    for h in handles {
        let (pid, resp) = h.join().unwrap();
        let CommandResponse::MatchState(changed) = resp else {
            panic!("expected state update");
        };

        assert!(versions.insert(changed.version));
        assert_eq!(changed.view.version, changed.version);
        assert_eq!(changed.events.len(), 1);
        assert!(matches!(
            changed.events[0].kind,
            MatchEventKind::ReadyChanged { player_id, ready: true } if player_id == pid
        ));

        // Готовых ровно столько, сколько команд применено до этой включительно.
        let ready = changed.view.players.iter().filter(|p| p.ready).count() as u64;
        assert_eq!(ready, changed.version - base);
        assert!(changed.view.players.iter().any(|p| p.player_id == pid && p.ready));
    }
    assert_eq!(versions.len(), 4);
}
