use thiserror::Error;

use crate::domain::{Chips, PlayerId, RoomId, SeatIndex};

/// Ошибки движка.
///
/// Делятся на две группы:
///   - нелегальные действия (не тот ход, не та фаза, нарушение правил
///     ставок) — отклоняются до любых изменений состояния;
///   - нарушения инвариантов — дефекты вызывающей логики, после них
///     текущую транзакцию нужно откатить (см. `is_defect`).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Комната {0} не найдена")]
    RoomNotFound(RoomId),

    #[error("Игрок {0} не найден в комнате")]
    PlayerNotFound(PlayerId),

    #[error("Игрок с именем '{0}' уже есть в комнате")]
    DuplicateName(String),

    #[error("Место {0} не существует")]
    InvalidSeat(SeatIndex),

    #[error("Место {0} уже занято")]
    SeatTaken(SeatIndex),

    #[error("Сейчас не ход игрока {0}")]
    NotPlayersTurn(PlayerId),

    #[error("Операция недоступна в текущей фазе игры")]
    WrongPhase,

    #[error("Раздача уже идёт")]
    HandInProgress,

    #[error("Недостаточно игроков для раздачи")]
    NotEnoughPlayers,

    #[error("Check невозможен: нужно уравнять ставку")]
    CannotCheck,

    #[error("Рейз меньше минимального ({min})")]
    RaiseTooSmall { min: Chips },

    #[error("Таймаут устарел: ход уже сделан")]
    StaleTimeout,

    #[error("Таймаут ещё не истёк")]
    TimeoutNotExpired,

    #[error("Нечего показывать: у игрока нет розданной руки")]
    NoHandToShow,

    // --- нарушения инвариантов ---
    #[error("Ставка активного игрока не совпадает с уровнем банка: {got} != {expected}")]
    BetMismatch { expected: Chips, got: Chips },

    #[error("Не удалось распределить все банки между претендентами")]
    UnallocatedPots,

    #[error("Пустой список рук на шоудауне")]
    EmptyShowdown,

    #[error("Внутренняя ошибка: {0}")]
    Internal(&'static str),
}

impl EngineError {
    /// Дефект вызывающей последовательности, а не ошибка игрока.
    /// Транзакция с таким результатом не должна быть зафиксирована.
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            EngineError::BetMismatch { .. }
                | EngineError::UnallocatedPots
                | EngineError::EmptyShowdown
                | EngineError::Internal(_)
        )
    }
}
