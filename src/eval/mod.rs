//! Оценка покерной руки.
//!
//! `evaluate` перебирает все 5-карточные комбинации из 5–7 карт и
//! возвращает категорию и счёт лучшей. Счёт тотально упорядочен:
//! МЕНЬШЕ = СИЛЬНЕЕ, у победителя минимальный счёт среди претендентов.

pub mod evaluator;
pub mod hand_rank;
pub mod lookup_tables;

pub use evaluator::{evaluate, evaluate_best_hand};
pub use hand_rank::{HandCategory, HandScore};
