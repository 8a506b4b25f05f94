use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::{PlayerId, SeatIndex};

/// Состояние игрока в комнате.
///
/// Флаги независимы друг от друга, поэтому здесь именно набор bool,
/// а не один enum-статус: игрок может, например, быть standing и при
/// этом ещё не сфолдить в текущей раздаче.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    /// Отображаемое имя (уникально в пределах комнаты).
    pub name: String,
    /// Текущий стек.
    pub chips: Chips,
    /// Ставка в текущем раунде торговли.
    pub bet: Chips,
    /// Сфолдил в текущей раздаче.
    pub folded: bool,
    /// Поставил весь стек и больше не действует в этой раздаче.
    pub all_in: bool,
    /// Получил карты в текущей раздаче.
    pub dealt_in: bool,
    /// Временно отошёл от стола: пропускает раздачи, пока не вернётся.
    pub standing: bool,
    /// Место за столом. None, пока игрок не сел.
    pub seat: Option<SeatIndex>,
    /// Выигрыш последней раздачи. Зачисляется в стек при следующем деале.
    pub chips_won: Option<Chips>,
    /// Показанные карты. None, пока игрок (или шоудаун) их не вскрыл.
    pub shown_hand: Option<[Card; 2]>,
}

impl Player {
    pub fn new(id: PlayerId, name: String, chips: Chips) -> Self {
        Self {
            id,
            name,
            chips,
            bet: Chips::ZERO,
            folded: false,
            all_in: false,
            dealt_in: false,
            standing: false,
            seat: None,
            chips_won: None,
            shown_hand: None,
        }
    }

    /// Может ли игрок действовать в текущем раунде.
    pub fn is_active(&self) -> bool {
        self.dealt_in && !self.folded && !self.standing && !self.all_in
    }

    /// Претендует ли игрок на банк (включая all-in).
    pub fn is_contender(&self) -> bool {
        self.dealt_in && !self.folded && !self.standing
    }
}

/// Приватные карманные карты игрока. Хранятся отдельным документом:
/// в публичное состояние комнаты не попадают до вскрытия.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DealtHand {
    pub player_id: PlayerId,
    pub cards: [Card; 2],
}
