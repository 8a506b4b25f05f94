use std::sync::atomic::{AtomicU64, Ordering};

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::domain::{PlayerId, RoomId};

/// Генерация идентификаторов игроков на монотонном счётчике.
///
/// Счётчик живёт на процесс: уникальность в пределах комнаты этого
/// достаточно, а внешней системе идентификации тут не место.
#[derive(Debug)]
pub struct IdGenerator {
    player_counter: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            player_counter: AtomicU64::new(1),
        }
    }

    #[inline]
    pub fn next_player_id(&self) -> PlayerId {
        self.player_counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Короткий человекочитаемый идентификатор комнаты.
pub fn random_room_id() -> RoomId {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}
