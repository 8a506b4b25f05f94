use crate::domain::card::{Card, Rank, Suit};

use super::hand_rank::{HandCategory, HandScore};
use super::lookup_tables::{detect_straight, rank_to_bit, RankMask};

/// Оценить 5–7 карт: лучшая 5-карточная комбинация и её счёт.
///
/// Вход не из 5–7 карт (или с дублями — отдать их сюда нельзя по
/// построению колоды) НЕ ошибка: возвращаем `(Invalid, сентинел)`,
/// который хуже любой настоящей руки.
///
/// Перебор всех C(n,5) подмножеств обязателен: сила руки не
/// раскладывается инкрементально — локально сильная пара карт может
/// проиграть другой 5-карточной комбинации из тех же семи.
pub fn evaluate(cards: &[Card]) -> (HandCategory, HandScore) {
    let n = cards.len();
    if !(5..=7).contains(&n) {
        return (HandCategory::Invalid, HandScore::INVALID);
    }

    let mut best: Option<(HandCategory, HandScore)> = None;

    for a in 0..(n - 4) {
        for b in (a + 1)..(n - 3) {
            for c in (b + 1)..(n - 2) {
                for d in (c + 1)..(n - 1) {
                    for e in (d + 1)..n {
                        let five = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        let result = classify_five(&five);
                        if best.map_or(true, |(_, score)| result.1 < score) {
                            best = Some(result);
                        }
                    }
                }
            }
        }
    }

    best.expect("хотя бы одна 5-карточная комбинация обязана существовать")
}

/// Удобная обёртка: рука игрока = карманные карты + борд.
pub fn evaluate_best_hand(hole: &[Card], board: &[Card]) -> (HandCategory, HandScore) {
    let mut all_cards = Vec::with_capacity(hole.len() + board.len());
    all_cards.extend_from_slice(hole);
    all_cards.extend_from_slice(board);
    evaluate(&all_cards)
}

/// Оценка строго 5-карточной комбинации.
fn classify_five(cards: &[Card; 5]) -> (HandCategory, HandScore) {
    // Подсчёт мастей.
    let mut suit_counts = [0u8; 4]; // 0:clubs,1:diamonds,2:hearts,3:spades

    // Подсчёт рангов.
    let mut rank_counts = [0u8; 15]; // индексы 0..14, но используем 2..14
    let mut rank_mask: RankMask = 0;

    for card in cards.iter() {
        let suit_idx = match card.suit {
            Suit::Clubs => 0,
            Suit::Diamonds => 1,
            Suit::Hearts => 2,
            Suit::Spades => 3,
        };
        suit_counts[suit_idx] += 1;

        rank_counts[card.rank as usize] += 1;
        rank_mask |= rank_to_bit(card.rank);
    }

    let is_flush = suit_counts.iter().any(|&c| c == 5);
    // При дублях рангов в маске меньше 5 бит, стрит не сложится.
    let straight_high = detect_straight(rank_mask);

    // Список (rank, count), сначала по количеству (desc), затем по рангу (desc).
    let mut rc_list: Vec<(u8, u8)> = Vec::with_capacity(5);
    for r_val in (2usize..=14usize).rev() {
        let count = rank_counts[r_val];
        if count > 0 {
            rc_list.push((r_val as u8, count));
        }
    }
    rc_list.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

    // pattern: [4,1], [3,2], [3,1,1], [2,2,1], [2,1,1,1], [1,1,1,1,1]
    let pattern: Vec<u8> = rc_list.iter().map(|rc| rc.1).collect();

    if is_flush {
        if let Some(high) = straight_high {
            let ranks = straight_rank_array(high);
            return scored(HandCategory::StraightFlush, ranks);
        }
    }

    if pattern == [4, 1] {
        let quad = rc_list[0].0;
        let kicker = rc_list[1].0;
        return scored(HandCategory::FourOfAKind, [quad, quad, quad, quad, kicker]);
    }

    if pattern == [3, 2] {
        let trips = rc_list[0].0;
        let pair = rc_list[1].0;
        return scored(HandCategory::FullHouse, [trips, trips, trips, pair, pair]);
    }

    if is_flush {
        return scored(HandCategory::Flush, top_five_ranks(&rc_list));
    }

    if let Some(high) = straight_high {
        return scored(HandCategory::Straight, straight_rank_array(high));
    }

    if pattern == [3, 1, 1] {
        let trips = rc_list[0].0;
        return scored(
            HandCategory::ThreeOfAKind,
            [trips, trips, trips, rc_list[1].0, rc_list[2].0],
        );
    }

    if pattern == [2, 2, 1] {
        let hi_pair = rc_list[0].0;
        let lo_pair = rc_list[1].0;
        let kicker = rc_list[2].0;
        return scored(
            HandCategory::TwoPair,
            [hi_pair, hi_pair, lo_pair, lo_pair, kicker],
        );
    }

    if pattern == [2, 1, 1, 1] {
        let pair = rc_list[0].0;
        return scored(
            HandCategory::OnePair,
            [pair, pair, rc_list[1].0, rc_list[2].0, rc_list[3].0],
        );
    }

    scored(HandCategory::HighCard, top_five_ranks(&rc_list))
}

fn scored(category: HandCategory, ranks: [u8; 5]) -> (HandCategory, HandScore) {
    (category, HandScore::from_category_and_ranks(category, ranks))
}

/// 5 рангов по убыванию (для flush / high card rc_list уже отсортирован).
fn top_five_ranks(rc_list: &[(u8, u8)]) -> [u8; 5] {
    let mut ranks = [0u8; 5];
    for (i, rc) in rc_list.iter().take(5).enumerate() {
        ranks[i] = rc.0;
    }
    ranks
}

/// Массив рангов стрита по его старшей карте.
/// Для wheel туз учитывается как 1, поэтому A2345 слабее 23456.
fn straight_rank_array(high: Rank) -> [u8; 5] {
    if high == Rank::Five {
        // wheel: 5-4-3-2-A(=1)
        return [5, 4, 3, 2, 1];
    }
    let h = high as u8;
    [h, h - 1, h - 2, h - 3, h - 4]
}
