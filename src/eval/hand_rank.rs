use serde::{Deserialize, Serialize};

/// Категория покерной руки. Меньший номер = сильнее (как и у счёта).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum HandCategory {
    StraightFlush = 1,
    FourOfAKind = 2,
    FullHouse = 3,
    Flush = 4,
    Straight = 5,
    ThreeOfAKind = 6,
    TwoPair = 7,
    OnePair = 8,
    HighCard = 9,
    /// Вход не из 5–7 карт. Легальный результат, не ошибка:
    /// заведомо хуже любой настоящей руки.
    Invalid = 10,
}

/// Размер полосы одной категории: 5 "степеней свободы" по 14 значений.
pub const CATEGORY_BAND: u32 = 14u32.pow(5);

/// Счёт руки: полоса категории + кикеры.
///
/// Кодирование: `категория * 14^5 + Σ (15 − rank) * 14^позиция`,
/// где ранги идут в порядке убывания значимости для категории
/// (каре: ранг каре, потом кикер; две пары: старшая, младшая, кикер...).
/// Более сильная рука даёт строго меньшее число, масти на счёт
/// не влияют вовсе.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandScore(pub u32);

impl HandScore {
    /// Сентинел для неоцениваемого входа: хуже любого валидного счёта.
    pub const INVALID: HandScore = HandScore(u32::MAX);

    /// Собрать счёт из категории и 5 решающих рангов (по убыванию
    /// значимости). Ранг туза в "колесе" передаётся как 1.
    pub fn from_category_and_ranks(category: HandCategory, ranks: [u8; 5]) -> Self {
        if category == HandCategory::Invalid {
            return Self::INVALID;
        }

        let mut value = (category as u32) * CATEGORY_BAND;
        for (idx, &rank) in ranks.iter().enumerate() {
            // (15 - rank): старший ранг даёт меньший вклад.
            value += (15 - rank as u32) * 14u32.pow(4 - idx as u32);
        }
        HandScore(value)
    }

    /// Вытащить категорию обратно из счёта.
    pub fn category(&self) -> HandCategory {
        match self.0 / CATEGORY_BAND {
            1 => HandCategory::StraightFlush,
            2 => HandCategory::FourOfAKind,
            3 => HandCategory::FullHouse,
            4 => HandCategory::Flush,
            5 => HandCategory::Straight,
            6 => HandCategory::ThreeOfAKind,
            7 => HandCategory::TwoPair,
            8 => HandCategory::OnePair,
            9 => HandCategory::HighCard,
            _ => HandCategory::Invalid,
        }
    }
}

/// Человекочитаемое описание категории.
pub fn describe_category(category: HandCategory) -> &'static str {
    match category {
        HandCategory::StraightFlush => "Straight flush",
        HandCategory::FourOfAKind => "Four of a kind",
        HandCategory::FullHouse => "Full house",
        HandCategory::Flush => "Flush",
        HandCategory::Straight => "Straight",
        HandCategory::ThreeOfAKind => "Three of a kind",
        HandCategory::TwoPair => "Two pair",
        HandCategory::OnePair => "One pair",
        HandCategory::HighCard => "High card",
        HandCategory::Invalid => "Invalid",
    }
}
