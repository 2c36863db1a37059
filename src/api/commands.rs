use serde::{Deserialize, Serialize};

use crate::domain::settings::MatchConfig;
use crate::domain::MatchId;
use crate::engine::actions::MatchAction;
use crate::engine::MatchManager;
use crate::infra::broadcast::EventSink;
use crate::infra::persistence::MatchStore;
use crate::infra::rng_seed::RngSeed;

use super::dto::{CommandResponse, StateChanged};
use super::errors::ApiError;
use super::queries::{answer_query, build_match_view, Query, QueryResponse};

/// Команда верхнего уровня.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Command {
    /// Создать новый матч в лобби.
    CreateMatch(CreateMatchCommand),

    /// Команда над конкретным матчем.
    MatchCommand(MatchCommand),
}

/// Команда создания матча. ID и seed генерирует внешний код.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateMatchCommand {
    pub match_id: MatchId,
    #[serde(default)]
    pub config: MatchConfig,
    pub seed: RngSeed,
}

/// Команда над существующим матчем.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchCommand {
    pub match_id: MatchId,
    pub action: MatchAction,
}

/// Выполнить команду через менеджер матчей.
pub fn handle_command<S: MatchStore, B: EventSink>(
    manager: &MatchManager<S, B>,
    command: Command,
) -> Result<CommandResponse, ApiError> {
    match command {
        Command::CreateMatch(cmd) => {
            let state = manager.create_match(cmd.match_id, cmd.config, cmd.seed)?;
            Ok(CommandResponse::MatchCreated(build_match_view(&state)))
        }
        Command::MatchCommand(cmd) => {
            let (outcome, state) = manager.execute_committed(cmd.match_id, cmd.action)?;
            Ok(CommandResponse::MatchState(StateChanged::from_state(
                &state,
                outcome.events,
            )))
        }
    }
}

/// Выполнить запрос "только чтение".
pub fn handle_query<S: MatchStore, B: EventSink>(
    manager: &MatchManager<S, B>,
    query: Query,
) -> Result<QueryResponse, ApiError> {
    let state = manager.snapshot(query.match_id())?;
    Ok(answer_query(&state, &query)?)
}
