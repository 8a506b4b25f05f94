use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::{HandHistory, Street};
use crate::domain::player::Player;
use crate::domain::{PlayerId, RoomId, SeatIndex};

/// Фиксированное число мест за столом.
pub const MAX_SEATS: usize = 10;

/// Места за столом: индекс массива = SeatIndex, None — место свободно.
pub type Seats = [Option<PlayerId>; MAX_SEATS];

/// Настройки комнаты.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameOptions {
    /// Стартовый стек нового игрока.
    pub default_chips: Chips,
    pub small_blind: Chips,
    pub big_blind: Chips,
}

/// Банк (или сайд-пот) раздачи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pot {
    /// Сколько фишек лежит в банке.
    pub chips: Chips,
    /// Кто может претендовать на этот банк. Сфолдившие сюда не попадают,
    /// даже если их фишки в банке.
    pub players: Vec<PlayerId>,
    /// Кап уровня: сколько каждый участник внёс именно в этот банк.
    pub max_bet: Chips,
}

/// Взведённый таймер хода: кто должен сходить и до какого момента.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnTimeout {
    pub player_id: PlayerId,
    /// Абсолютный дедлайн, мс от эпохи.
    pub expiry_ms: u64,
}

/// Состояние активной раздачи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandState {
    /// Общие карты (0–5).
    pub community: Vec<Card>,
    /// Текущая ставка стола, до которой нужно дотянуться.
    pub bet: Chips,
    /// Чьё место сейчас ходит.
    pub active_seat: SeatIndex,
    /// Место, на котором круг закрывается, если дойдёт без рейза.
    pub round_end_seat: SeatIndex,
    pub dealer_seat: SeatIndex,
    pub big_blind_seat: SeatIndex,
    /// Нет в хедз-апе: дилер ходит первым с позиции малого блайнда.
    pub small_blind_seat: Option<SeatIndex>,
    /// Накопленные банки (пополняются при закрытии каждого круга).
    pub pots: Vec<Pot>,
    /// История событий раздачи.
    pub history: HandHistory,
}

impl HandState {
    /// Улица определяется числом открытых общих карт.
    pub fn round(&self) -> Street {
        match self.community.len() {
            0 => Street::PreFlop,
            3 => Street::Flop,
            4 => Street::Turn,
            5 => Street::River,
            _ => Street::PreFlop,
        }
    }
}

/// Фаза жизненного цикла комнаты. Каждый вариант несёт ровно те поля,
/// которые в этой фазе осмыслены — никаких "а есть ли тут currentHand".
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameState {
    /// Раздач ещё не было.
    NotStarted,
    /// Идёт раздача, таймер хода взведён.
    InHand { hand: HandState, timeout: TurnTimeout },
    /// Раздача закончена: банки розданы, состояние заморожено до
    /// следующего деала.
    FinishedHand { hand: HandState },
}

/// Полное публичное состояние комнаты.
///
/// Приватные данные (карманные карты, колода) живут в отдельных
/// документах и сюда не попадают.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Game {
    pub room_id: RoomId,
    /// Игрок-хост (создатель комнаты или назначенный).
    pub host: PlayerId,
    pub options: GameOptions,
    pub players: HashMap<PlayerId, Player>,
    /// Места за столом: None — место свободно.
    pub seats: Seats,
    pub state: GameState,
}

impl Game {
    pub fn new(room_id: RoomId, host: PlayerId, options: GameOptions) -> Self {
        Self {
            room_id,
            host,
            options,
            players: HashMap::new(),
            seats: [None; MAX_SEATS],
            state: GameState::NotStarted,
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn player_at_seat(&self, seat: SeatIndex) -> Option<&Player> {
        self.seats
            .get(seat as usize)
            .copied()
            .flatten()
            .and_then(|id| self.players.get(&id))
    }

    pub fn seated_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }
}
