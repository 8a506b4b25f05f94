//! Арифметика банков: раскладка ставок раунда по уровням (main/side pots)
//! и делёж готовых банков по результатам шоудауна.
//!
//! Обе функции чистые: вход — снимки состояния, выход — новые значения.

use std::collections::{BTreeMap, HashMap};

use crate::domain::{Chips, Player, PlayerId, Pot};
use crate::eval::HandScore;

use super::errors::EngineError;

/// Рабочая копия ставки одного участника раздачи.
struct Entry {
    id: PlayerId,
    bet: Chips,
    folded: bool,
    all_in: bool,
    standing: bool,
}

/// Разложить ставки текущего круга по банкам.
///
/// Алгоритм:
///   1. all-in игроки задают пороги уровней (по возрастанию остатка
///      ставки); каждый уровень забирает ровно свой кап у всех, кто ещё
///      ставил не меньше. Одинаковые пороги дают один уровень, пустые
///      не создаются.
///   2. Остатки активных (не all-in) игроков образуют один финальный
///      некапованный банк; их остатки обязаны совпадать — иначе это
///      дефект логики ставок, и мы падаем громко, а не раскладываем
///      фишки наугад.
///   3. Ставки сфолдивших/вставших сметаются по уже созданным уровням:
///      их фишки финансируют банки, но членства (права на выигрыш)
///      не дают.
pub fn build_pots_for_round(dealt_in: &[&Player]) -> Result<Vec<Pot>, EngineError> {
    let mut entries: Vec<Entry> = dealt_in
        .iter()
        .map(|p| Entry {
            id: p.id,
            bet: p.bet,
            folded: p.folded,
            all_in: p.all_in,
            standing: p.standing,
        })
        .collect();
    entries.sort_by_key(|e| e.bet);

    let mut pots: Vec<Pot> = Vec::new();

    // 1. Уровни all-in порогов.
    let allin_order: Vec<usize> = (0..entries.len()).filter(|&i| entries[i].all_in).collect();
    for &i in &allin_order {
        let cap = entries[i].bet;
        if cap.is_zero() {
            // Порог уже покрыт предыдущим уровнем (равные all-in)
            // либо all-in со ставкой 0 (прошлые улицы).
            continue;
        }
        let mut pot = Pot {
            chips: Chips::ZERO,
            players: Vec::new(),
            max_bet: cap,
        };
        for e in entries.iter_mut() {
            if e.folded || e.standing {
                continue;
            }
            if e.bet >= cap {
                e.bet -= cap;
                pot.chips += cap;
                pot.players.push(e.id);
            }
        }
        pots.push(pot);
    }

    // 2. Финальный банк активных.
    let normal: Vec<usize> = (0..entries.len())
        .filter(|&i| {
            let e = &entries[i];
            !e.folded && !e.all_in && !e.standing
        })
        .collect();
    if !normal.is_empty() {
        let cap = entries[normal[0]].bet;
        let mut pot = Pot {
            chips: Chips::ZERO,
            players: Vec::new(),
            max_bet: cap,
        };
        for &i in &normal {
            let e = &mut entries[i];
            if e.bet != cap {
                return Err(EngineError::BetMismatch {
                    expected: cap,
                    got: e.bet,
                });
            }
            pot.chips += cap;
            e.bet = Chips::ZERO;
            pot.players.push(e.id);
        }
        if !pot.chips.is_zero() {
            pots.push(pot);
        }
    }

    // 3. Сметаем ставки сфолдивших/вставших по уровням.
    for e in entries.iter_mut() {
        if !(e.folded || e.standing) || e.bet.is_zero() {
            continue;
        }
        for pot in pots.iter_mut() {
            let take = e.bet.min(pot.max_bet);
            pot.chips += take;
            e.bet -= take;
            if e.bet.is_zero() {
                break;
            }
        }
        if !e.bet.is_zero() {
            return Err(EngineError::Internal(
                "ставка сфолдившего игрока не поместилась в банки",
            ));
        }
    }

    Ok(pots)
}

/// Разделить банки между претендентами по их счетам.
///
/// Каждый банк делится независимо: претенденты этого банка с минимальным
/// счётом делят его поровну; неделимый остаток расходится по одной фишке
/// в порядке списка (какому из равных достанется лишняя — произвол,
/// гарантируется только сохранение суммы).
///
/// Каждый игрок из входного списка получает явную запись (возможно 0).
pub fn split_pots(
    scores: &[(PlayerId, HandScore)],
    pots: &[Pot],
) -> Result<HashMap<PlayerId, Chips>, EngineError> {
    if scores.is_empty() {
        return Err(EngineError::EmptyShowdown);
    }

    // счёт → игроки с этим счётом, в порядке входного списка
    let mut by_score: BTreeMap<HandScore, Vec<PlayerId>> = BTreeMap::new();
    for (id, score) in scores {
        by_score.entry(*score).or_default().push(*id);
    }

    let mut remaining: Vec<Pot> = pots.to_vec();
    let mut allocation: HashMap<PlayerId, Chips> =
        scores.iter().map(|(id, _)| (*id, Chips::ZERO)).collect();

    // От лучшего счёта к худшему, пока банки не кончатся.
    for tied in by_score.values() {
        if remaining.is_empty() {
            break;
        }

        for pot in remaining.iter_mut() {
            let members: Vec<PlayerId> = tied
                .iter()
                .copied()
                .filter(|id| pot.players.contains(id))
                .collect();
            if members.is_empty() {
                continue;
            }

            while !pot.chips.is_zero() {
                let to_each = Chips((pot.chips.0 / members.len() as u64).max(1));
                for id in &members {
                    if pot.chips >= to_each {
                        *allocation
                            .get_mut(id)
                            .expect("претендент банка есть в списке счетов") += to_each;
                        pot.chips -= to_each;
                    } else {
                        break;
                    }
                }
            }
        }

        remaining.retain(|pot| !pot.chips.is_zero());
    }

    if !remaining.is_empty() {
        // Банк, на который никто из оценённых не претендует, —
        // рассинхрон банков и счетов.
        return Err(EngineError::UnallocatedPots);
    }

    Ok(allocation)
}
