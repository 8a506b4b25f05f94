use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{DealtHand, Deck, Game, RoomId};

/// Полный набор документов одной комнаты.
///
/// Публичное состояние, колода раздачи и приватные карманные карты
/// хранятся раздельно (клиентам уходит только публичная часть),
/// но загружаются и сохраняются как единое целое — одна операция
/// ядра фиксируется атомарно либо не фиксируется вовсе.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomDocs {
    pub game: Game,
    /// Колода текущей раздачи. Вне раздачи — пустая.
    pub deck: Deck,
    /// Приватные карманные карты текущей раздачи.
    pub hands: Vec<DealtHand>,
}

impl RoomDocs {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            deck: Deck::empty(),
            hands: Vec::new(),
        }
    }
}

/// Абстракция хранилища комнат.
///
/// В проде за этим интерфейсом живёт транзакционная база; для
/// движка важно одно: `save` применяет весь снимок атомарно.
pub trait GameStorage {
    fn load(&self, room_id: &RoomId) -> Option<RoomDocs>;
    fn save(&mut self, docs: &RoomDocs);
    fn remove(&mut self, room_id: &RoomId);
}

/// Простая in-memory реализация для тестов и локального запуска.
#[derive(Debug, Default)]
pub struct InMemoryGameStorage {
    rooms: HashMap<RoomId, RoomDocs>,
}

impl InMemoryGameStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStorage for InMemoryGameStorage {
    fn load(&self, room_id: &RoomId) -> Option<RoomDocs> {
        self.rooms.get(room_id).cloned()
    }

    fn save(&mut self, docs: &RoomDocs) {
        self.rooms.insert(docs.game.room_id.clone(), docs.clone());
    }

    fn remove(&mut self, room_id: &RoomId) {
        self.rooms.remove(room_id);
    }
}
