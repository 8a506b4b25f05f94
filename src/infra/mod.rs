//! Инфраструктура: RNG, часы, генерация идентификаторов, хранилище.
//!
//! Всё, что ядро потребляет как внешние способности (см. engine:
//! `RandomSource`, `TimeSource`), реализовано здесь.

pub mod clock;
pub mod ids;
pub mod persistence;
pub mod rng;

pub use clock::{FixedClock, SystemClock};
pub use ids::IdGenerator;
pub use persistence::{GameStorage, InMemoryGameStorage, RoomDocs};
pub use rng::{DeterministicRng, SystemRng};
