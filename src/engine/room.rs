//! Операции над комнатой вне раздачи: создание, посадка, настройки.

use serde::{Deserialize, Serialize};

use crate::domain::{
    Chips, DealtHand, Game, GameOptions, GameState, Player, PlayerId, RoomId, SeatIndex, MAX_SEATS,
};

use super::errors::EngineError;

/// Создать комнату: хост сразу добавляется как первый игрок.
pub fn create_game(
    room_id: RoomId,
    host_id: PlayerId,
    host_name: String,
    options: GameOptions,
) -> Result<Game, EngineError> {
    let mut game = Game::new(room_id, host_id, options);
    add_player(&mut game, host_id, host_name)?;
    Ok(game)
}

/// Добавить игрока со стартовым стеком из настроек комнаты.
/// Имя должно быть уникальным в пределах комнаты.
pub fn add_player(game: &mut Game, id: PlayerId, name: String) -> Result<(), EngineError> {
    if game.players.values().any(|p| p.name == name) {
        return Err(EngineError::DuplicateName(name));
    }
    let chips = game.options.default_chips;
    game.players.insert(id, Player::new(id, name, chips));
    Ok(())
}

/// Посадить игрока на свободное место. Если он уже сидел —
/// старое место освобождается.
pub fn seat_player(game: &mut Game, id: PlayerId, seat: SeatIndex) -> Result<(), EngineError> {
    if seat as usize >= MAX_SEATS {
        return Err(EngineError::InvalidSeat(seat));
    }
    if game.seats[seat as usize].is_some() {
        return Err(EngineError::SeatTaken(seat));
    }

    let Game { players, seats, .. } = game;
    let player = players.get_mut(&id).ok_or(EngineError::PlayerNotFound(id))?;
    if let Some(old) = player.seat.take() {
        seats[old as usize] = None;
    }
    player.seat = Some(seat);
    seats[seat as usize] = Some(id);
    Ok(())
}

/// Выставить игроку стек (хостовый инструмент кэш-игры).
/// Отложенный выигрыш при этом сгорает — новый стек задан явно.
pub fn set_chips(game: &mut Game, id: PlayerId, amount: Chips) -> Result<(), EngineError> {
    let player = game
        .players
        .get_mut(&id)
        .ok_or(EngineError::PlayerNotFound(id))?;
    player.chips = amount;
    player.chips_won = None;
    Ok(())
}

/// Передать права хоста другому игроку.
pub fn set_host(game: &mut Game, id: PlayerId) -> Result<(), EngineError> {
    if !game.players.contains_key(&id) {
        return Err(EngineError::PlayerNotFound(id));
    }
    game.host = id;
    Ok(())
}

/// Частичное обновление настроек комнаты (между раздачами значения
/// подхватываются следующим деалом).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptionsUpdate {
    pub default_chips: Option<Chips>,
    pub small_blind: Option<Chips>,
    pub big_blind: Option<Chips>,
}

pub fn update_options(game: &mut Game, update: OptionsUpdate) {
    if let Some(v) = update.default_chips {
        game.options.default_chips = v;
    }
    if let Some(v) = update.small_blind {
        game.options.small_blind = v;
    }
    if let Some(v) = update.big_blind {
        game.options.big_blind = v;
    }
}

/// Добровольно показать свои карты после завершения раздачи.
pub fn show_hand(
    game: &mut Game,
    id: PlayerId,
    private_hands: &[DealtHand],
) -> Result<(), EngineError> {
    if !matches!(game.state, GameState::FinishedHand { .. }) {
        return Err(EngineError::WrongPhase);
    }
    let hole = private_hands
        .iter()
        .find(|h| h.player_id == id)
        .ok_or(EngineError::NoHandToShow)?;
    let player = game
        .players
        .get_mut(&id)
        .ok_or(EngineError::PlayerNotFound(id))?;
    player.shown_hand = Some(hole.cards);
    Ok(())
}
