//! Доменная модель: карты, фишки, колода, игроки, комната и раздача.

pub mod card;
pub mod chips;
pub mod deck;
pub mod game;
pub mod hand;
pub mod player;

/// Идентификатор игрока внутри комнаты.
pub type PlayerId = u64;

/// Индекс места за столом (0..MAX_SEATS-1).
pub type SeatIndex = u8;

/// Внешний идентификатор комнаты.
pub type RoomId = String;

// Удобные реэкспорты, чтобы в других модулях писать crate::domain::Card и т.п.
pub use card::*;
pub use chips::*;
pub use deck::*;
pub use game::*;
pub use hand::*;
pub use player::*;
