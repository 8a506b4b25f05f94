//! Тесты конечного автомата раздачи: деал, блайнды, очередь хода,
//! закрытие кругов, stand, таймауты.

use poker_room::domain::{
    Chips, Game, GameOptions, GameState, HandState, Player, PlayerId, TurnTimeout,
};
use poker_room::engine::{game_loop, room, EngineError, HandStatus, RandomSource};
use poker_room::infra::FixedClock;

/// Детерминированный RNG: shuffle ничего не делает, колода остаётся
/// в стандартном порядке (раздача идёт с конца: As, Ks, Qs, ...).
#[derive(Default)]
struct DummyRng;

impl RandomSource for DummyRng {
    fn shuffle<T>(&mut self, _slice: &mut [T]) {}
}

/// Комната: игрок i (1-based) сидит на месте i-1 со стеком stacks[i-1].
/// Блайнды 50/100.
fn make_room(stacks: &[u64]) -> Game {
    let options = GameOptions {
        default_chips: Chips(1000),
        small_blind: Chips(50),
        big_blind: Chips(100),
    };
    let mut game = room::create_game("room".to_string(), 1, "p1".to_string(), options)
        .expect("создание комнаты");
    for i in 1..stacks.len() {
        room::add_player(&mut game, (i + 1) as PlayerId, format!("p{}", i + 1)).unwrap();
    }
    for (i, &stack) in stacks.iter().enumerate() {
        room::seat_player(&mut game, (i + 1) as PlayerId, i as u8).unwrap();
        room::set_chips(&mut game, (i + 1) as PlayerId, Chips(stack)).unwrap();
    }
    game
}

fn hand(game: &Game) -> &HandState {
    match &game.state {
        GameState::InHand { hand, .. } => hand,
        GameState::FinishedHand { hand } => hand,
        GameState::NotStarted => panic!("раздачи не было"),
    }
}

fn armed_timeout(game: &Game) -> TurnTimeout {
    match &game.state {
        GameState::InHand { timeout, .. } => *timeout,
        _ => panic!("таймер есть только в раздаче"),
    }
}

fn player(game: &Game, id: PlayerId) -> &Player {
    game.players.get(&id).expect("игрок существует")
}

//
// ====================== ДЕАЛ И БЛАЙНДЫ ======================
//

/// Три игрока: кнопка после места 0, малый/большой блайнды распределены,
/// первым ходит игрок за большим блайндом.
#[test]
fn start_hand_deals_and_posts_blinds() {
    let mut game = make_room(&[1000, 1000, 1000]);
    let clock = FixedClock::at(0);
    let start = game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap();

    assert_eq!(start.hands.len(), 3);
    assert_eq!(start.deck.len(), 52 - 6);

    let h = hand(&game);
    assert_eq!(h.dealer_seat, 1);
    assert_eq!(h.small_blind_seat, Some(2));
    assert_eq!(h.big_blind_seat, 0);
    assert_eq!(h.active_seat, 1, "первым ходит место за BB");
    assert_eq!(h.round_end_seat, 1);
    assert_eq!(h.bet, Chips(100));
    assert!(h.pots.is_empty());
    assert!(h.community.is_empty());

    assert_eq!(player(&game, 3).bet, Chips(50), "малый блайнд");
    assert_eq!(player(&game, 3).chips, Chips(950));
    assert_eq!(player(&game, 1).bet, Chips(100), "большой блайнд");
    assert_eq!(player(&game, 1).chips, Chips(900));
    assert!(game.players.values().all(|p| p.dealt_in));

    let t = armed_timeout(&game);
    assert_eq!(t.player_id, 2);
    assert_eq!(t.expiry_ms, game_loop::TURN_TIMEOUT_MS);
}

/// Хедз-ап: отдельного малого блайнда нет, дилер ходит первым,
/// большой блайнд — у второго игрока.
#[test]
fn heads_up_deal_has_no_small_blind_seat() {
    let mut game = make_room(&[1000, 1000]);
    let clock = FixedClock::at(0);
    game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap();

    let h = hand(&game);
    assert_eq!(h.dealer_seat, 1);
    assert_eq!(h.small_blind_seat, None);
    assert_eq!(h.big_blind_seat, 0);
    assert_eq!(h.active_seat, 1, "дилер действует первым");

    assert_eq!(player(&game, 1).bet, Chips(100));
    assert_eq!(player(&game, 2).bet, Chips(0), "дилер ничего не постит");
}

/// Меньше двух игроков с фишками — раздачи не будет.
#[test]
fn start_hand_requires_two_players() {
    let mut game = make_room(&[1000]);
    let clock = FixedClock::at(0);
    let err = game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap_err();
    assert_eq!(err, EngineError::NotEnoughPlayers);

    let mut game = make_room(&[1000, 0]);
    let err = game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap_err();
    assert_eq!(err, EngineError::NotEnoughPlayers);
}

/// Вторую раздачу поверх идущей не начать.
#[test]
fn start_hand_rejects_when_hand_in_progress() {
    let mut game = make_room(&[1000, 1000]);
    let clock = FixedClock::at(0);
    game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap();
    let err = game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap_err();
    assert_eq!(err, EngineError::HandInProgress);
}

//
// ====================== ЛЕГАЛЬНОСТЬ ДЕЙСТВИЙ ======================
//

#[test]
fn actions_out_of_turn_are_rejected() {
    let mut game = make_room(&[1000, 1000, 1000]);
    let clock = FixedClock::at(0);
    let start = game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap();
    let mut deck = start.deck;

    // Ходит игрок 2 (место 1); игрок 1 лезть не должен.
    let err = game_loop::call(&mut game, 1, &mut deck, &start.hands, &clock).unwrap_err();
    assert_eq!(err, EngineError::NotPlayersTurn(1));
}

#[test]
fn raise_below_minimum_is_rejected() {
    let mut game = make_room(&[1000, 1000, 1000]);
    let clock = FixedClock::at(0);
    let start = game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap();
    let mut deck = start.deck;

    let err = game_loop::raise(&mut game, 2, Chips(50), &mut deck, &start.hands, &clock)
        .unwrap_err();
    assert_eq!(err, EngineError::RaiseTooSmall { min: Chips(100) });
}

#[test]
fn check_with_outstanding_bet_is_rejected() {
    let mut game = make_room(&[1000, 1000, 1000]);
    let clock = FixedClock::at(0);
    let start = game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap();
    let mut deck = start.deck;

    let err = game_loop::check(&mut game, 2, &mut deck, &start.hands, &clock).unwrap_err();
    assert_eq!(err, EngineError::CannotCheck);
}

#[test]
fn actions_outside_hand_are_rejected() {
    let mut game = make_room(&[1000, 1000]);
    let clock = FixedClock::at(0);
    let mut deck = poker_room::domain::Deck::empty();
    let err = game_loop::call(&mut game, 1, &mut deck, &[], &clock).unwrap_err();
    assert_eq!(err, EngineError::WrongPhase);
}

//
// ====================== КРУГ ТОРГОВЛИ ======================
//

/// Полный префлоп: колл — колл — чек закрывает круг, открывается флоп,
/// ставки уходят в банк.
#[test]
fn preflop_round_closes_into_flop() {
    let mut game = make_room(&[1000, 1000, 1000]);
    let clock = FixedClock::at(0);
    let start = game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap();
    let mut deck = start.deck;
    let hands = start.hands;

    assert_eq!(
        game_loop::call(&mut game, 2, &mut deck, &hands, &clock).unwrap(),
        HandStatus::Ongoing
    );
    assert_eq!(hand(&game).active_seat, 2);

    game_loop::call(&mut game, 3, &mut deck, &hands, &clock).unwrap();
    assert_eq!(hand(&game).active_seat, 0);

    // BB уравнен — он закрывает круг чеком.
    game_loop::check(&mut game, 1, &mut deck, &hands, &clock).unwrap();

    let h = hand(&game);
    assert_eq!(h.community.len(), 3, "открыт флоп");
    assert_eq!(h.bet, Chips(0));
    assert_eq!(h.pots.len(), 1);
    assert_eq!(h.pots[0].chips, Chips(300));
    assert_eq!(h.active_seat, 2, "первый активный после кнопки");
    assert_eq!(h.round_end_seat, 2);
    assert!(game.players.values().all(|p| p.bet.is_zero()));
}

/// Рейз делает рейзера точкой закрытия круга.
#[test]
fn raise_resets_round_end_to_raiser() {
    let mut game = make_room(&[1000, 1000, 1000]);
    let clock = FixedClock::at(0);
    let start = game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap();
    let mut deck = start.deck;

    game_loop::raise(&mut game, 2, Chips(100), &mut deck, &start.hands, &clock).unwrap();

    let h = hand(&game);
    assert_eq!(h.bet, Chips(200));
    assert_eq!(h.round_end_seat, 1, "рейзер закрывает круг");
    assert_eq!(h.active_seat, 2);
    assert_eq!(player(&game, 2).bet, Chips(200));
    assert_eq!(player(&game, 2).chips, Chips(800));

    // Остальные коллируют — круг закрывается на рейзере.
    game_loop::call(&mut game, 3, &mut deck, &start.hands, &clock).unwrap();
    game_loop::call(&mut game, 1, &mut deck, &start.hands, &clock).unwrap();
    let h = hand(&game);
    assert_eq!(h.community.len(), 3);
    assert_eq!(h.pots[0].chips, Chips(600));
}

/// Колл в all-in ровно на закрывающем месте: точка закрытия
/// сдвигается на следующее активное место.
#[test]
fn all_in_call_at_round_end_moves_round_end() {
    let mut game = make_room(&[1000, 80, 1000]);
    let clock = FixedClock::at(0);
    let start = game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap();
    let mut deck = start.deck;

    // Игрок 2 (80 фишек, закрывающее место) коллирует в all-in.
    let status = game_loop::call(&mut game, 2, &mut deck, &start.hands, &clock).unwrap();
    assert_eq!(status, HandStatus::Ongoing);
    assert!(player(&game, 2).all_in);
    assert_eq!(player(&game, 2).bet, Chips(80));

    let h = hand(&game);
    assert_eq!(h.round_end_seat, 2, "закрывающее место сдвинулось");
    assert_eq!(h.active_seat, 2);

    // Круг всё же закрывается после ответов остальных.
    game_loop::call(&mut game, 3, &mut deck, &start.hands, &clock).unwrap();
    game_loop::check(&mut game, 1, &mut deck, &start.hands, &clock).unwrap();

    let h = hand(&game);
    assert_eq!(h.community.len(), 3);
    // Нижний уровень 80×3, остаток 20×2 сверху.
    assert_eq!(h.pots.len(), 2);
    assert_eq!(h.pots[0].chips, Chips(240));
    assert_eq!(h.pots[1].chips, Chips(40));
}

//
// ====================== ФОЛД ======================
//

/// Все сфолдили — раздача заканчивается немедленно, банк уходит
/// оставшемуся, карты никому не показываются.
#[test]
fn folding_down_to_one_player_ends_hand() {
    let mut game = make_room(&[1000, 1000, 1000]);
    let clock = FixedClock::at(0);
    let start = game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap();
    let mut deck = start.deck;

    let status = game_loop::fold(&mut game, 2, &mut deck, &start.hands, &clock).unwrap();
    assert_eq!(status, HandStatus::Ongoing);
    assert_eq!(hand(&game).round_end_seat, 2, "сфолдил закрывающий");

    let status = game_loop::fold(&mut game, 3, &mut deck, &start.hands, &clock).unwrap();
    assert_eq!(status, HandStatus::Finished);

    assert!(matches!(game.state, GameState::FinishedHand { .. }));
    assert!(hand(&game).community.is_empty(), "карты больше не открывались");
    assert_eq!(player(&game, 1).chips_won, Some(Chips(150)), "блайнды достались BB");
    assert!(game.players.values().all(|p| p.shown_hand.is_none()));
}

/// Выигрыш зачисляется в стек следующим деалом, кнопка едет дальше.
#[test]
fn next_hand_settles_winnings_and_rotates_dealer() {
    let mut game = make_room(&[1000, 1000, 1000]);
    let clock = FixedClock::at(0);
    let start = game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap();
    let mut deck = start.deck;
    game_loop::fold(&mut game, 2, &mut deck, &start.hands, &clock).unwrap();
    game_loop::fold(&mut game, 3, &mut deck, &start.hands, &clock).unwrap();

    game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap();

    let h = hand(&game);
    assert_eq!(h.dealer_seat, 2, "кнопка сдвинулась");
    assert_eq!(h.small_blind_seat, Some(0));
    assert_eq!(h.big_blind_seat, 1);

    // Игрок 1: 900 + 150 выигрыша − 50 нового SB.
    assert_eq!(player(&game, 1).chips, Chips(1000));
    assert_eq!(player(&game, 1).bet, Chips(50));
    assert_eq!(player(&game, 1).chips_won, None);
    assert!(game.players.values().all(|p| !p.folded && !p.all_in));
}

//
// ====================== STAND ======================
//

/// Встать не в свой ход: игрока пропускают, его ставка уходит в банк
/// без права на выигрыш; закрывающее место сдвигается, если встал он.
#[test]
fn standing_out_of_turn_skips_player() {
    let mut game = make_room(&[1000, 1000, 1000, 1000]);
    let clock = FixedClock::at(0);
    let start = game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap();
    let mut deck = start.deck;

    // Раздача на четверых: дилер 1, SB 2, BB 3, первый ход и закрытие — 0.
    assert_eq!(hand(&game).active_seat, 0);
    assert_eq!(hand(&game).round_end_seat, 0);

    game_loop::call(&mut game, 1, &mut deck, &start.hands, &clock).unwrap();
    assert_eq!(hand(&game).active_seat, 1);

    // Игрок 1 (место 0, закрывающий) встаёт не в свой ход.
    let status =
        game_loop::toggle_standing(&mut game, 1, &mut deck, &start.hands, &clock).unwrap();
    assert_eq!(status, HandStatus::Ongoing);
    assert!(player(&game, 1).standing);
    assert!(!player(&game, 1).dealt_in);
    assert_eq!(hand(&game).round_end_seat, 1, "точка закрытия сдвинулась");

    game_loop::call(&mut game, 2, &mut deck, &start.hands, &clock).unwrap();
    game_loop::call(&mut game, 3, &mut deck, &start.hands, &clock).unwrap();
    game_loop::check(&mut game, 4, &mut deck, &start.hands, &clock).unwrap();

    let h = hand(&game);
    assert_eq!(h.community.len(), 3, "круг закрылся без вставшего");
    assert_eq!(h.pots.len(), 1);
    assert_eq!(h.pots[0].chips, Chips(400), "его колл остался в банке");
    assert!(!h.pots[0].players.contains(&1), "но права на банк нет");
}

/// Встать в свой ход — это фолд с точки зрения очереди.
#[test]
fn standing_in_turn_advances_like_fold() {
    let mut game = make_room(&[1000, 1000, 1000]);
    let clock = FixedClock::at(0);
    let start = game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap();
    let mut deck = start.deck;

    let status =
        game_loop::toggle_standing(&mut game, 2, &mut deck, &start.hands, &clock).unwrap();
    assert_eq!(status, HandStatus::Ongoing);
    assert!(!player(&game, 2).dealt_in);

    let h = hand(&game);
    assert_eq!(h.active_seat, 2);
    assert_eq!(h.round_end_seat, 2, "встал закрывающий — точка сдвинулась");
}

/// Если после вставшего остаётся один активный, раздача сворачивается.
#[test]
fn standing_down_to_one_player_ends_hand() {
    let mut game = make_room(&[1000, 1000]);
    let clock = FixedClock::at(0);
    let start = game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap();
    let mut deck = start.deck;

    let status =
        game_loop::toggle_standing(&mut game, 2, &mut deck, &start.hands, &clock).unwrap();
    assert_eq!(status, HandStatus::Finished);
    assert_eq!(player(&game, 1).chips_won, Some(Chips(100)), "BB вернулся");
    assert!(player(&game, 1).shown_hand.is_none());
}

/// Вернувшийся из standing игрок попадает в следующий деал.
#[test]
fn sitting_back_down_joins_next_deal() {
    let mut game = make_room(&[1000, 1000, 1000]);
    let clock = FixedClock::at(0);

    // Встал вне раздачи.
    let mut deck = poker_room::domain::Deck::empty();
    game_loop::toggle_standing(&mut game, 3, &mut deck, &[], &clock).unwrap();

    let start = game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap();
    assert_eq!(start.hands.len(), 2, "вставшему карты не раздают");
    assert!(!player(&game, 3).dealt_in);

    // Доигрываем хедз-ап фолдом и возвращаем игрока.
    let mut deck = start.deck;
    game_loop::fold(&mut game, 2, &mut deck, &start.hands, &clock).unwrap();

    game_loop::toggle_standing(&mut game, 3, &mut deck, &[], &clock).unwrap();
    let start = game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap();
    assert_eq!(start.hands.len(), 3);
    assert!(player(&game, 3).dealt_in);
}

//
// ====================== KICK ======================
//

/// Кик освобождает место и удаляет игрока; раздача продолжается без него.
#[test]
fn kick_player_frees_seat_mid_hand() {
    let mut game = make_room(&[1000, 1000, 1000]);
    let clock = FixedClock::at(0);
    let start = game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap();
    let mut deck = start.deck;

    let status = game_loop::kick_player(&mut game, 3, &mut deck, &start.hands, &clock).unwrap();
    assert_eq!(status, HandStatus::Ongoing);
    assert!(!game.players.contains_key(&3));
    assert_eq!(game.seats[2], None);

    // Оставшиеся доигрывают круг.
    game_loop::call(&mut game, 2, &mut deck, &start.hands, &clock).unwrap();
    game_loop::check(&mut game, 1, &mut deck, &start.hands, &clock).unwrap();
    assert_eq!(hand(&game).community.len(), 3);
}

//
// ====================== ТАЙМАУТЫ ======================
//

/// Устаревшее или преждевременное срабатывание отбрасывается,
/// настоящее — исполняет fold при неуравненной ставке.
#[test]
fn timeout_is_validated_then_folds() {
    let mut game = make_room(&[1000, 1000, 1000]);
    let mut clock = FixedClock::at(0);
    let start = game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap();
    let mut deck = start.deck;

    let armed = armed_timeout(&game);
    assert_eq!(armed.player_id, 2);

    // Чужой дедлайн — устаревшее срабатывание.
    let forged = TurnTimeout {
        player_id: 2,
        expiry_ms: armed.expiry_ms + 1,
    };
    let err =
        game_loop::process_timeout(&mut game, forged, &mut deck, &start.hands, &clock).unwrap_err();
    assert_eq!(err, EngineError::StaleTimeout);

    // Дедлайн ещё не наступил.
    let err =
        game_loop::process_timeout(&mut game, armed, &mut deck, &start.hands, &clock).unwrap_err();
    assert_eq!(err, EngineError::TimeoutNotExpired);

    // Наступил: у игрока неуравненная ставка — авто-fold.
    clock.set(armed.expiry_ms);
    let status =
        game_loop::process_timeout(&mut game, armed, &mut deck, &start.hands, &clock).unwrap();
    assert_eq!(status, HandStatus::Ongoing);
    assert!(player(&game, 2).folded);
    assert_eq!(hand(&game).active_seat, 2);
}

/// Таймаут, пришедший после того как игрок успел сходить, — устаревший.
#[test]
fn timeout_after_action_is_stale() {
    let mut game = make_room(&[1000, 1000, 1000]);
    let mut clock = FixedClock::at(0);
    let start = game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap();
    let mut deck = start.deck;

    let old = armed_timeout(&game);
    clock.advance(1_000);
    game_loop::call(&mut game, 2, &mut deck, &start.hands, &clock).unwrap();

    clock.set(old.expiry_ms + 1);
    let err =
        game_loop::process_timeout(&mut game, old, &mut deck, &start.hands, &clock).unwrap_err();
    assert_eq!(err, EngineError::StaleTimeout);
}

/// Когда check легален, таймаут чекает, а не фолдит.
#[test]
fn timeout_checks_when_check_is_legal() {
    let mut game = make_room(&[1000, 1000]);
    let mut clock = FixedClock::at(0);
    let start = game_loop::start_hand(&mut game, &mut DummyRng, &clock).unwrap();
    let mut deck = start.deck;

    // Доводим до флопа: дилер коллирует, BB чекает.
    game_loop::call(&mut game, 2, &mut deck, &start.hands, &clock).unwrap();
    game_loop::check(&mut game, 1, &mut deck, &start.hands, &clock).unwrap();
    assert_eq!(hand(&game).community.len(), 3);

    let armed = armed_timeout(&game);
    clock.set(armed.expiry_ms);
    let status =
        game_loop::process_timeout(&mut game, armed, &mut deck, &start.hands, &clock).unwrap();
    assert_eq!(status, HandStatus::Ongoing);
    assert!(!player(&game, armed.player_id).folded, "это был check");
}
