use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::{PlayerId, SeatIndex};

/// Улица раздачи (раунд торговли).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Street {
    PreFlop,
    Flop,
    Turn,
    River,
}

/// Действие игрока, как оно попадает в историю раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HandAction {
    SmallBlind,
    BigBlind,
    Raise(Chips),
    Call,
    Check,
    Fold,
    Stand,
}

/// Тип события в раздаче.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HandEventKind {
    /// Новая раздача началась.
    HandStarted,

    /// Кнопка/блайнды. Суммы — фактически поставленные (могут быть
    /// меньше номинала, если стека не хватило).
    BlindsPosted {
        dealer: SeatIndex,
        small_blind: Option<(SeatIndex, Chips)>,
        big_blind: (SeatIndex, Chips),
    },

    /// Действие игрока.
    PlayerActed {
        player_id: PlayerId,
        seat: SeatIndex,
        action: HandAction,
        new_stack: Chips,
    },

    /// Открыты общие карты (весь борд на текущий момент).
    BoardDealt {
        street: Street,
        cards: Vec<Card>,
    },

    /// Шоудаун: игрок вскрыл карты.
    ShowdownReveal {
        player_id: PlayerId,
        score: u32,
    },

    /// Выплата из банков.
    PotAwarded {
        player_id: PlayerId,
        amount: Chips,
    },

    /// Раздача завершена.
    HandFinished,
}

/// Событие в раздаче с порядковым номером.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandEvent {
    pub index: u32,
    pub kind: HandEventKind,
}

/// Полная история раздачи. Замораживается вместе с раздачей
/// в состоянии FinishedHand.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandHistory {
    pub events: Vec<HandEvent>,
}

impl HandHistory {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, kind: HandEventKind) {
        let idx = self.events.len() as u32;
        self.events.push(HandEvent { index: idx, kind });
    }
}
