//! Командный слой: загрузить документы комнаты, выполнить операцию
//! ядра, сохранить результат.
//!
//! Сохранение происходит только при успехе — частично применённых
//! состояний не бывает. Нарушения инвариантов логируются как дефекты
//! и тоже ничего не фиксируют. Сериализация конкурирующих команд
//! (например, рейза и таймаута одновременно) — забота хранилища:
//! одна комната меняется строго по одной команде за раз.

pub mod commands;

use log::error;

use crate::domain::{GameState, PlayerId, RoomId};
use crate::engine::{game_loop, room, EngineError, HandStatus, RandomSource, TimeSource};
use crate::infra::ids::{random_room_id, IdGenerator};
use crate::infra::persistence::{GameStorage, RoomDocs};

pub use commands::Command;

/// Результат выполнения команды.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    GameCreated { room_id: RoomId, host_id: PlayerId },
    PlayerAdded { player_id: PlayerId },
    HandStarted,
    Action(HandStatus),
    Updated,
}

/// Выполнить команду над хранилищем.
pub fn apply_command<S, R, C>(
    store: &mut S,
    ids: &IdGenerator,
    rng: &mut R,
    clock: &C,
    command: Command,
) -> Result<CommandOutcome, EngineError>
where
    S: GameStorage,
    R: RandomSource,
    C: TimeSource,
{
    match command {
        Command::CreateGame(cmd) => {
            let room_id = random_room_id();
            let host_id = ids.next_player_id();
            let game = room::create_game(room_id.clone(), host_id, cmd.host_name, cmd.options)?;
            store.save(&RoomDocs::new(game));
            Ok(CommandOutcome::GameCreated { room_id, host_id })
        }

        Command::AddPlayer(cmd) => with_docs(store, &cmd.room_id, |docs| {
            let player_id = ids.next_player_id();
            room::add_player(&mut docs.game, player_id, cmd.name)?;
            Ok(CommandOutcome::PlayerAdded { player_id })
        }),

        Command::SeatPlayer(cmd) => with_docs(store, &cmd.room_id, |docs| {
            room::seat_player(&mut docs.game, cmd.player_id, cmd.seat)?;
            Ok(CommandOutcome::Updated)
        }),

        Command::StartHand(cmd) => with_docs(store, &cmd.room_id, |docs| {
            let start = game_loop::start_hand(&mut docs.game, rng, clock)?;
            docs.deck = start.deck;
            docs.hands = start.hands;
            Ok(CommandOutcome::HandStarted)
        }),

        Command::Raise(cmd) => with_docs(store, &cmd.room_id, |docs| {
            let RoomDocs { game, deck, hands } = docs;
            let status = game_loop::raise(game, cmd.player_id, cmd.amount, deck, hands, clock)?;
            Ok(CommandOutcome::Action(status))
        }),

        Command::Call(cmd) => with_docs(store, &cmd.room_id, |docs| {
            let RoomDocs { game, deck, hands } = docs;
            let status = game_loop::call(game, cmd.player_id, deck, hands, clock)?;
            Ok(CommandOutcome::Action(status))
        }),

        Command::Check(cmd) => with_docs(store, &cmd.room_id, |docs| {
            let RoomDocs { game, deck, hands } = docs;
            let status = game_loop::check(game, cmd.player_id, deck, hands, clock)?;
            Ok(CommandOutcome::Action(status))
        }),

        Command::Fold(cmd) => with_docs(store, &cmd.room_id, |docs| {
            let RoomDocs { game, deck, hands } = docs;
            let status = game_loop::fold(game, cmd.player_id, deck, hands, clock)?;
            Ok(CommandOutcome::Action(status))
        }),

        Command::ToggleStanding(cmd) => with_docs(store, &cmd.room_id, |docs| {
            let RoomDocs { game, deck, hands } = docs;
            let status = game_loop::toggle_standing(game, cmd.player_id, deck, hands, clock)?;
            Ok(CommandOutcome::Action(status))
        }),

        Command::ShowHand(cmd) => with_docs(store, &cmd.room_id, |docs| {
            room::show_hand(&mut docs.game, cmd.player_id, &docs.hands)?;
            Ok(CommandOutcome::Updated)
        }),

        Command::SetChips(cmd) => with_docs(store, &cmd.room_id, |docs| {
            room::set_chips(&mut docs.game, cmd.player_id, cmd.amount)?;
            Ok(CommandOutcome::Updated)
        }),

        Command::SetHost(cmd) => with_docs(store, &cmd.room_id, |docs| {
            room::set_host(&mut docs.game, cmd.player_id)?;
            Ok(CommandOutcome::Updated)
        }),

        Command::UpdateOptions(cmd) => with_docs(store, &cmd.room_id, |docs| {
            room::update_options(&mut docs.game, cmd.update);
            Ok(CommandOutcome::Updated)
        }),

        Command::KickPlayer(cmd) => with_docs(store, &cmd.room_id, |docs| {
            let RoomDocs { game, deck, hands } = docs;
            let status = game_loop::kick_player(game, cmd.player_id, deck, hands, clock)?;
            Ok(CommandOutcome::Action(status))
        }),

        Command::ProcessTimeout(cmd) => with_docs(store, &cmd.room_id, |docs| {
            let RoomDocs { game, deck, hands } = docs;
            let status = game_loop::process_timeout(game, cmd.observed, deck, hands, clock)?;
            Ok(CommandOutcome::Action(status))
        }),
    }
}

/// Загрузить документы комнаты, выполнить операцию, сохранить при успехе.
fn with_docs<S, F>(
    store: &mut S,
    room_id: &RoomId,
    operation: F,
) -> Result<CommandOutcome, EngineError>
where
    S: GameStorage,
    F: FnOnce(&mut RoomDocs) -> Result<CommandOutcome, EngineError>,
{
    let mut docs = store
        .load(room_id)
        .ok_or_else(|| EngineError::RoomNotFound(room_id.clone()))?;

    match operation(&mut docs) {
        Ok(outcome) => {
            // Вне раздачи колода больше не нужна. Карманные карты
            // остаются: их читает show-hand после завершения.
            if !matches!(docs.game.state, GameState::InHand { .. }) {
                docs.deck = crate::domain::Deck::empty();
            }
            store.save(&docs);
            Ok(outcome)
        }
        Err(err) => {
            if err.is_defect() {
                error!("дефект при выполнении команды в комнате {room_id}: {err}");
            }
            Err(err)
        }
    }
}
