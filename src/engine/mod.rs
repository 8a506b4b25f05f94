//! Конечный автомат раздачи: ставки, переход улиц, банки, шоудаун.
//!
//! Основные операции:
//!   - `room::create_game` / `room::add_player` / `room::seat_player` – лобби;
//!   - `game_loop::start_hand` – запустить раздачу (блайнды, карты, дилер);
//!   - `game_loop::{raise, call, check, fold, toggle_standing, kick_player,
//!     process_timeout}` – действия игроков;
//!   - `pots::{build_pots_for_round, split_pots}` – чистая арифметика банков.
//!
//! Все функции синхронные и работают над уже загруженным состоянием;
//! сериализацию конкурирующих действий обеспечивает внешняя
//! транзакционная граница (см. api).

pub mod errors;
pub mod game_loop;
pub mod positions;
pub mod pots;
pub mod room;
pub mod validation;

pub use errors::EngineError;
pub use game_loop::{HandStart, HandStatus, TURN_TIMEOUT_MS};

/// RNG интерфейс для engine. Реализации — в infra.
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}

/// Часы для дедлайнов хода. Реализации — в infra.
pub trait TimeSource {
    fn now_ms(&self) -> u64;
}
