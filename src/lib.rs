//! Движок покерной комнаты (Texas Hold'em).
//!
//! Три слоя, от листьев к корню:
//!   - `eval`   – чистая оценка руки: лучшая 5-карточная комбинация из 5–7 карт;
//!   - `engine::pots` – раскладка ставок по банкам (main/side pots) и делёж;
//!   - `engine` – конечный автомат раздачи: блайнды, ходы, улицы, шоудаун.
//!
//! Снаружи всё это обёрнуто в `api` (одна команда = одна операция игрока)
//! и `infra` (хранилище, RNG, часы). Ядро не знает про сеть и авторизацию:
//! оно получает уже загруженное состояние и возвращает новое.

pub mod api;
pub mod domain;
pub mod engine;
pub mod eval;
pub mod infra;
