use crate::domain::{Chips, Game, GameOptions, GameState, HandState, Player, PlayerId, SeatIndex};

use super::errors::EngineError;

/// Проверка, что сейчас ход именно этого игрока.
/// Возвращает его место — оно нужно всем действиям.
pub fn ensure_players_turn(game: &Game, player_id: PlayerId) -> Result<SeatIndex, EngineError> {
    let GameState::InHand { hand, .. } = &game.state else {
        return Err(EngineError::WrongPhase);
    };
    let seat = hand.active_seat;
    let seated = game
        .seats
        .get(seat as usize)
        .copied()
        .flatten()
        .ok_or(EngineError::Internal("активное место пусто"))?;
    if seated != player_id {
        return Err(EngineError::NotPlayersTurn(player_id));
    }
    Ok(seat)
}

/// Минимальный рейз: текущая ставка стола, а пока ставок не было —
/// большой блайнд.
pub fn minimum_raise(options: &GameOptions, hand: &HandState) -> Chips {
    if hand.bet.is_zero() {
        options.big_blind
    } else {
        hand.bet
    }
}

/// Рейз не меньше минимального.
pub fn ensure_valid_raise(game: &Game, amount: Chips) -> Result<(), EngineError> {
    let GameState::InHand { hand, .. } = &game.state else {
        return Err(EngineError::WrongPhase);
    };
    let min = minimum_raise(&game.options, hand);
    if amount < min {
        return Err(EngineError::RaiseTooSmall { min });
    }
    Ok(())
}

/// Check легален, только когда игроку нечего уравнивать
/// (в том числе когда ставки вообще нет).
pub fn ensure_can_check(hand: &HandState, player: &Player) -> Result<(), EngineError> {
    if hand.bet == player.bet {
        Ok(())
    } else {
        Err(EngineError::CannotCheck)
    }
}
