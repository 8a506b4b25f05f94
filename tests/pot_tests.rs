//! Тесты банков: раскладка ставок по уровням (main/side pots),
//! судьба ставок сфолдивших, делёж с тай-брейками и неделимым остатком.

use std::collections::HashMap;

use poker_room::domain::{Chips, Player, PlayerId, Pot};
use poker_room::engine::errors::EngineError;
use poker_room::engine::pots::{build_pots_for_round, split_pots};
use poker_room::eval::HandScore;

/// Утилита: участник раздачи с нужной ставкой и флагами.
fn entrant(id: PlayerId, bet: u64) -> Player {
    let mut p = Player::new(id, format!("p{id}"), Chips(1000));
    p.dealt_in = true;
    p.bet = Chips(bet);
    p
}

fn all_in(mut p: Player) -> Player {
    p.all_in = true;
    p
}

fn folded(mut p: Player) -> Player {
    p.folded = true;
    p
}

/// Утилита: (сумма, кап, отсортированные участники) банка.
fn pot_info(pot: &Pot) -> (u64, u64, Vec<PlayerId>) {
    let mut players = pot.players.clone();
    players.sort_unstable();
    (pot.chips.0, pot.max_bet.0, players)
}

fn total(pots: &[Pot]) -> u64 {
    pots.iter().map(|p| p.chips.0).sum()
}

//
// ====================== BUILD: УРОВНИ ======================
//

/// Обычный круг без all-in: один банк со всеми участниками.
#[test]
fn build_single_pot_for_plain_bets() {
    let players = [entrant(1, 20), entrant(2, 20), entrant(3, 20)];
    let refs: Vec<&Player> = players.iter().collect();

    let pots = build_pots_for_round(&refs).unwrap();
    assert_eq!(pots.len(), 1);
    assert_eq!(pot_info(&pots[0]), (60, 20, vec![1, 2, 3]));
}

/// All-in на 19 против двух ставок по 20: нижний уровень на троих
/// и остаток на двоих.
#[test]
fn build_side_pot_above_short_all_in() {
    let players = [all_in(entrant(1, 19)), entrant(2, 20), entrant(3, 20)];
    let refs: Vec<&Player> = players.iter().collect();

    let pots = build_pots_for_round(&refs).unwrap();
    assert_eq!(pots.len(), 2);
    assert_eq!(pot_info(&pots[0]), (57, 19, vec![1, 2, 3]));
    assert_eq!(pot_info(&pots[1]), (2, 1, vec![2, 3]));
    assert_eq!(total(&pots), 59);
}

/// Ставка сфолдившего финансирует банк, но членства не даёт.
#[test]
fn build_sweeps_folded_bet_without_membership() {
    let players = [folded(entrant(1, 19)), entrant(2, 20), entrant(3, 20)];
    let refs: Vec<&Player> = players.iter().collect();

    let pots = build_pots_for_round(&refs).unwrap();
    assert_eq!(pots.len(), 1);
    assert_eq!(pot_info(&pots[0]), (59, 20, vec![2, 3]));
}

/// Смешанный случай: два фолда, два all-in на разных уровнях,
/// две живые ставки сверху.
#[test]
fn build_layers_mixed_all_ins_and_folds() {
    let players = [
        folded(entrant(1, 19)),
        all_in(entrant(2, 20)),
        entrant(3, 21),
        entrant(4, 21),
        all_in(entrant(5, 18)),
        folded(entrant(6, 19)),
    ];
    let refs: Vec<&Player> = players.iter().collect();

    let pots = build_pots_for_round(&refs).unwrap();
    assert_eq!(pots.len(), 3);

    assert_eq!(pot_info(&pots[0]), (108, 18, vec![2, 3, 4, 5]));
    assert_eq!(pot_info(&pots[1]), (8, 2, vec![2, 3, 4]));
    assert_eq!(pot_info(&pots[2]), (2, 1, vec![3, 4]));

    let wagered: u64 = players.iter().map(|p| p.bet.0).sum();
    assert_eq!(total(&pots), wagered, "фишки не теряются и не плодятся");
}

/// Равные all-in пороги дают ОДИН уровень, пустые банки не создаются.
#[test]
fn build_merges_equal_all_in_thresholds() {
    let players = [
        all_in(entrant(1, 1000)),
        all_in(entrant(2, 1000)),
        entrant(3, 1020),
    ];
    let refs: Vec<&Player> = players.iter().collect();

    let pots = build_pots_for_round(&refs).unwrap();
    assert_eq!(pots.len(), 2);
    assert_eq!(pot_info(&pots[0]), (3000, 1000, vec![1, 2, 3]));
    assert_eq!(pot_info(&pots[1]), (20, 20, vec![3]));
    assert_eq!(total(&pots), 3020);
}

/// Круг, где все прочекали: банков не появляется вовсе.
#[test]
fn build_skips_empty_round() {
    let players = [entrant(1, 0), entrant(2, 0)];
    let refs: Vec<&Player> = players.iter().collect();

    let pots = build_pots_for_round(&refs).unwrap();
    assert!(pots.is_empty());
}

/// Несовпадающие живые ставки — дефект логики ставок, падаем громко.
#[test]
fn build_fails_loudly_on_mismatched_active_bets() {
    let players = [entrant(1, 20), entrant(2, 21)];
    let refs: Vec<&Player> = players.iter().collect();

    let err = build_pots_for_round(&refs).unwrap_err();
    assert!(matches!(err, EngineError::BetMismatch { .. }));
    assert!(err.is_defect());
}

//
// ====================== SPLIT: ДЕЛЁЖ ======================
//

fn pot(chips: u64, max_bet: u64, players: &[PlayerId]) -> Pot {
    Pot {
        chips: Chips(chips),
        max_bet: Chips(max_bet),
        players: players.to_vec(),
    }
}

/// Единственный лучший счёт забирает банк; остальные получают явный 0.
#[test]
fn split_single_winner_takes_all() {
    let scores = vec![
        (1, HandScore(500)),
        (2, HandScore(100)),
        (3, HandScore(900)),
    ];
    let pots = [pot(300, 100, &[1, 2, 3])];

    let allocation = split_pots(&scores, &pots).unwrap();
    assert_eq!(allocation[&2], Chips(300));
    assert_eq!(allocation[&1], Chips(0));
    assert_eq!(allocation[&3], Chips(0));
    assert_eq!(allocation.len(), 3, "каждому — явная запись");
}

/// Ничья: банк делится поровну, неделимая фишка достаётся одному из
/// победителей (какому именно — не проверяем, только сохранение суммы).
#[test]
fn split_tie_divides_evenly_with_remainder() {
    let scores = vec![(1, HandScore(100)), (2, HandScore(100)), (3, HandScore(400))];
    let pots = [pot(101, 50, &[1, 2, 3])];

    let allocation = split_pots(&scores, &pots).unwrap();
    let a = allocation[&1].0;
    let b = allocation[&2].0;
    assert_eq!(allocation[&3], Chips(0));
    assert_eq!(a + b, 101);
    assert!(a >= 50 && b >= 50, "делёж поровну с точностью до фишки");
}

/// Сайд-поты делятся независимо: короткий стек выигрывает только
/// свой уровень, излишек уходит следующему по силе.
#[test]
fn split_layered_pots_independently() {
    let scores = vec![
        (1, HandScore(100)), // короткий all-in, лучшая рука
        (2, HandScore(200)),
        (3, HandScore(300)),
    ];
    let pots = [pot(300, 100, &[1, 2, 3]), pot(200, 100, &[2, 3])];

    let allocation = split_pots(&scores, &pots).unwrap();
    assert_eq!(allocation[&1], Chips(300));
    assert_eq!(allocation[&2], Chips(200));
    assert_eq!(allocation[&3], Chips(0));
}

/// Сумма выплат всегда равна сумме банков.
#[test]
fn split_conserves_chips() {
    let scores = vec![
        (1, HandScore(7)),
        (2, HandScore(7)),
        (3, HandScore(7)),
        (4, HandScore(9)),
    ];
    let pots = [
        pot(100, 25, &[1, 2, 3, 4]),
        pot(77, 11, &[2, 3, 4]),
        pot(5, 5, &[4]),
    ];

    let allocation = split_pots(&scores, &pots).unwrap();
    let paid: u64 = allocation.values().map(|c| c.0).sum();
    assert_eq!(paid, total(&pots));
}

/// Пустой список рук — дефект.
#[test]
fn split_rejects_empty_scores() {
    let pots = [pot(100, 100, &[1])];
    let err = split_pots(&[], &pots).unwrap_err();
    assert_eq!(err, EngineError::EmptyShowdown);
}

/// Банк, на который никто из оценённых не претендует, — рассинхрон.
#[test]
fn split_rejects_unallocatable_pot() {
    let scores = vec![(1, HandScore(100))];
    let pots = [pot(100, 100, &[1]), pot(50, 50, &[99])];

    let err = split_pots(&scores, &pots).unwrap_err();
    assert_eq!(err, EngineError::UnallocatedPots);
}

/// Победа фолдом моделируется синтетическим нулевым счётом:
/// единственный претендент забирает все банки, где он участник.
#[test]
fn split_win_by_fold_single_contender() {
    let scores = vec![(7, HandScore(0))];
    let pots = [pot(150, 100, &[7]), pot(40, 20, &[7])];

    let allocation = split_pots(&scores, &pots).unwrap();
    assert_eq!(allocation[&7], Chips(190));
}

//
// ====================== СКВОЗНОЕ СВОЙСТВО ======================
//

/// build → split: полный оборот фишек без утечек на составном сценарии.
#[test]
fn build_then_split_conserves_total() {
    let players = [
        all_in(entrant(1, 35)),
        entrant(2, 60),
        folded(entrant(3, 10)),
        entrant(4, 60),
    ];
    let refs: Vec<&Player> = players.iter().collect();
    let pots = build_pots_for_round(&refs).unwrap();

    let wagered: u64 = players.iter().map(|p| p.bet.0).sum();
    assert_eq!(total(&pots), wagered);

    let scores = vec![(1, HandScore(10)), (2, HandScore(20)), (4, HandScore(20))];
    let allocation = split_pots(&scores, &pots).unwrap();
    let paid: u64 = allocation.values().map(|c| c.0).sum();
    assert_eq!(paid, wagered);

    // Короткий all-in с лучшей рукой берёт только нижний уровень.
    assert_eq!(allocation[&1], Chips(35 * 3 + 10));
    let side: HashMap<PlayerId, Chips> = allocation;
    assert_eq!(side[&2].0 + side[&4].0, 25 * 2);
}