use std::collections::HashMap;

use crate::domain::{Player, PlayerId, SeatIndex, Seats, MAX_SEATS};

/// Активен ли игрок на месте: роздан, не сфолдил, не отошёл, не в all-in.
pub fn is_seat_active(seats: &Seats, players: &HashMap<PlayerId, Player>, seat: SeatIndex) -> bool {
    seats
        .get(seat as usize)
        .copied()
        .flatten()
        .and_then(|id| players.get(&id))
        .map(Player::is_active)
        .unwrap_or(false)
}

/// Следующее активное место строго после `start` (по кругу).
/// Само `start` проверяется последним: если активен только он,
/// вернётся он же.
pub fn next_active_seat(
    seats: &Seats,
    players: &HashMap<PlayerId, Player>,
    start: SeatIndex,
) -> Option<SeatIndex> {
    for offset in 1..=MAX_SEATS {
        let seat = ((start as usize + offset) % MAX_SEATS) as SeatIndex;
        if is_seat_active(seats, players, seat) {
            return Some(seat);
        }
    }
    None
}

/// То же, но `start` проверяется первым.
pub fn next_active_seat_inclusive(
    seats: &Seats,
    players: &HashMap<PlayerId, Player>,
    start: SeatIndex,
) -> Option<SeatIndex> {
    for offset in 0..MAX_SEATS {
        let seat = ((start as usize + offset) % MAX_SEATS) as SeatIndex;
        if is_seat_active(seats, players, seat) {
            return Some(seat);
        }
    }
    None
}

/// Сколько игроков ещё может действовать в этом круге.
pub fn count_active(seats: &Seats, players: &HashMap<PlayerId, Player>) -> usize {
    (0..MAX_SEATS as SeatIndex)
        .filter(|&s| is_seat_active(seats, players, s))
        .count()
}

/// Претенденты на банк (включая all-in), в порядке мест.
pub fn contender_ids(seats: &Seats, players: &HashMap<PlayerId, Player>) -> Vec<PlayerId> {
    seats
        .iter()
        .filter_map(|s| *s)
        .filter(|id| {
            players
                .get(id)
                .map(Player::is_contender)
                .unwrap_or(false)
        })
        .collect()
}

/// Сколько игроков претендует на банк.
pub fn count_contenders(seats: &Seats, players: &HashMap<PlayerId, Player>) -> usize {
    contender_ids(seats, players).len()
}
