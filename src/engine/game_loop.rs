//! Жизненный цикл раздачи: деал, блайнды, действия игроков, закрытие
//! кругов, шоудаун.
//!
//! Все функции принимают уже загруженное состояние и меняют его на
//! месте; фиксация/откат — забота вызывающего слоя (api). Ошибки
//! нелегальных действий возвращаются ДО каких-либо изменений.

use std::collections::HashMap;
use std::mem;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Chips, DealtHand, Deck, Game, GameState, HandAction, HandEventKind, HandHistory, HandState,
    Player, PlayerId, SeatIndex, Seats, Street, TurnTimeout, MAX_SEATS,
};
use crate::eval::{evaluate_best_hand, HandScore};

use super::errors::EngineError;
use super::positions::{
    contender_ids, count_active, count_contenders, next_active_seat, next_active_seat_inclusive,
};
use super::validation;
use super::{pots, RandomSource, TimeSource};

/// Сколько даётся на ход.
pub const TURN_TIMEOUT_MS: u64 = 30_000;

/// Статус раздачи после применения действия.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandStatus {
    Ongoing,
    Finished,
}

/// Результат старта раздачи: приватные документы на сохранение.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandStart {
    pub deck: Deck,
    pub hands: Vec<DealtHand>,
}

/// Запустить новую раздачу.
///
/// Рассчитывается за прошлую раздачу (выигрыши в стек, сброс флагов),
/// тасует свежую колоду, раздаёт по 2 карты каждому сидящему с
/// положительным стеком, двигает кнопку, постит блайнды и взводит
/// таймер первого хода.
pub fn start_hand<R: RandomSource, C: TimeSource>(
    game: &mut Game,
    rng: &mut R,
    clock: &C,
) -> Result<HandStart, EngineError> {
    let prev_dealer = match &game.state {
        GameState::InHand { .. } => return Err(EngineError::HandInProgress),
        GameState::FinishedHand { hand } => Some(hand.dealer_seat),
        GameState::NotStarted => None,
    };

    // Валидация до изменений: хватает ли игроков на раздачу
    // (с учётом ещё не зачисленных выигрышей).
    let eligible = game
        .seats
        .iter()
        .filter_map(|s| *s)
        .filter(|id| {
            game.players
                .get(id)
                .map(|p| {
                    let stack = p.chips + p.chips_won.unwrap_or(Chips::ZERO);
                    !p.standing && !stack.is_zero()
                })
                .unwrap_or(false)
        })
        .count();
    if eligible < 2 {
        return Err(EngineError::NotEnoughPlayers);
    }

    // Рассчитываемся за прошлую раздачу.
    if matches!(game.state, GameState::FinishedHand { .. }) {
        for player in game.players.values_mut() {
            if player.seat.is_none() {
                continue;
            }
            if let Some(won) = player.chips_won.take() {
                player.chips += won;
            }
            player.folded = false;
            player.all_in = false;
            player.dealt_in = false;
            player.shown_hand = None;
        }
    }

    let mut deck = Deck::standard_52();
    rng.shuffle(&mut deck.cards);

    let Game {
        players,
        seats,
        options,
        state,
        ..
    } = game;

    // Раздаём по 2 карты, по местам.
    let mut dealt: Vec<DealtHand> = Vec::new();
    for seat in 0..MAX_SEATS {
        let Some(pid) = seats[seat] else { continue };
        let Some(player) = players.get_mut(&pid) else {
            continue;
        };
        if player.chips.is_zero() || player.standing {
            continue;
        }
        player.dealt_in = true;
        let c1 = deck
            .draw_one()
            .ok_or(EngineError::Internal("колода закончилась при раздаче"))?;
        let c2 = deck
            .draw_one()
            .ok_or(EngineError::Internal("колода закончилась при раздаче"))?;
        dealt.push(DealtHand {
            player_id: pid,
            cards: [c1, c2],
        });
    }

    // Кнопка и блайнды.
    let dealer = next_active_seat(seats, players, prev_dealer.unwrap_or(0))
        .ok_or(EngineError::NotEnoughPlayers)?;
    let active_count = count_active(seats, players);
    let small_blind_seat = if active_count > 2 {
        next_active_seat(seats, players, dealer)
    } else {
        // Хедз-ап: отдельного малого блайнда нет, дилер ходит первым.
        None
    };
    let big_blind_seat = next_active_seat(seats, players, small_blind_seat.unwrap_or(dealer))
        .ok_or(EngineError::Internal("не нашли место большого блайнда"))?;
    let round_end_seat = next_active_seat(seats, players, big_blind_seat)
        .ok_or(EngineError::Internal("не нашли закрывающее место"))?;

    let mut hand = HandState {
        community: Vec::new(),
        bet: Chips::ZERO,
        active_seat: small_blind_seat.unwrap_or(big_blind_seat),
        round_end_seat,
        dealer_seat: dealer,
        big_blind_seat,
        small_blind_seat,
        pots: Vec::new(),
        history: HandHistory::new(),
    };
    hand.history.push(HandEventKind::HandStarted);

    // Блайнды — принудительные ставки: кап по стеку может дать all-in.
    let mut sb_posted = None;
    if let Some(sb_seat) = small_blind_seat {
        bet_increase(&mut hand, players, seats, options.small_blind)?;
        sb_posted = Some((sb_seat, bet_of(players, seats, sb_seat)?));
        advance_seat(&mut hand, seats, players);
    }
    bet_increase(&mut hand, players, seats, options.big_blind)?;
    let bb_posted = bet_of(players, seats, big_blind_seat)?;
    advance_seat(&mut hand, seats, players);

    hand.history.push(HandEventKind::BlindsPosted {
        dealer,
        small_blind: sb_posted,
        big_blind: (big_blind_seat, bb_posted),
    });

    let timeout = make_timeout(&hand, seats, clock)?;
    *state = GameState::InHand { hand, timeout };

    Ok(HandStart { deck, hands: dealt })
}

/// Рейз: поднять свою ставку до "ставка стола + amount".
///
/// Рейзер становится точкой закрытия круга — всем остальным активным
/// придётся ответить на новую ставку.
pub fn raise<C: TimeSource>(
    game: &mut Game,
    player_id: PlayerId,
    amount: Chips,
    deck: &mut Deck,
    private_hands: &[DealtHand],
    clock: &C,
) -> Result<HandStatus, EngineError> {
    let seat = validation::ensure_players_turn(game, player_id)?;
    validation::ensure_valid_raise(game, amount)?;

    let close = {
        let Game {
            players,
            seats,
            state,
            ..
        } = &mut *game;
        let GameState::InHand { hand, timeout } = state else {
            return Err(EngineError::WrongPhase);
        };

        let current = players
            .get(&player_id)
            .ok_or(EngineError::PlayerNotFound(player_id))?
            .bet;
        let increase = (hand.bet + amount).saturating_sub(current);
        bet_increase(hand, players, seats, increase)?;
        push_action(hand, players, player_id, seat, HandAction::Raise(amount));

        let mut close = false;
        match next_active_seat_inclusive(seats, players, seat) {
            Some(s) => hand.round_end_seat = s,
            // Рейз в all-in, когда и остальные в all-in: действовать некому.
            None => close = true,
        }
        if !close {
            advance_seat(hand, seats, players);
            if hand.active_seat == seat {
                // Ход вернулся к рейзеру: отвечать больше некому.
                close = true;
            } else {
                *timeout = make_timeout(hand, seats, clock)?;
            }
        }
        close
    };

    if close {
        close_round(game, deck, private_hands, clock)
    } else {
        Ok(HandStatus::Ongoing)
    }
}

/// Колл: дотянуть свою ставку до ставки стола (кап по стеку).
pub fn call<C: TimeSource>(
    game: &mut Game,
    player_id: PlayerId,
    deck: &mut Deck,
    private_hands: &[DealtHand],
    clock: &C,
) -> Result<HandStatus, EngineError> {
    let seat = validation::ensure_players_turn(game, player_id)?;

    let close = {
        let Game {
            players,
            seats,
            state,
            ..
        } = &mut *game;
        let GameState::InHand { hand, timeout } = state else {
            return Err(EngineError::WrongPhase);
        };

        let current = players
            .get(&player_id)
            .ok_or(EngineError::PlayerNotFound(player_id))?
            .bet;
        let to_call = hand.bet.saturating_sub(current);
        bet_increase(hand, players, seats, to_call)?;
        push_action(hand, players, player_id, seat, HandAction::Call);

        let caller_all_in = players
            .get(&player_id)
            .map(|p| p.all_in)
            .unwrap_or(false);

        advance_seat(hand, seats, players);
        let mut close = hand.active_seat == hand.round_end_seat;

        // Колл дал all-in ровно на закрывающем месте: точка закрытия
        // обязана оставаться активным местом.
        if !close && caller_all_in && hand.round_end_seat == seat {
            match next_active_seat(seats, players, seat) {
                Some(s) => hand.round_end_seat = s,
                None => close = true,
            }
        }
        // Активных не осталось вовсе — действовать некому.
        if !close && count_active(seats, players) == 0 {
            close = true;
        }

        if !close {
            *timeout = make_timeout(hand, seats, clock)?;
        }
        close
    };

    if close {
        close_round(game, deck, private_hands, clock)
    } else {
        Ok(HandStatus::Ongoing)
    }
}

/// Check: легален, только когда уравнивать нечего.
pub fn check<C: TimeSource>(
    game: &mut Game,
    player_id: PlayerId,
    deck: &mut Deck,
    private_hands: &[DealtHand],
    clock: &C,
) -> Result<HandStatus, EngineError> {
    let seat = validation::ensure_players_turn(game, player_id)?;

    let close = {
        let Game {
            players,
            seats,
            state,
            ..
        } = &mut *game;
        let GameState::InHand { hand, timeout } = state else {
            return Err(EngineError::WrongPhase);
        };

        let player = players
            .get(&player_id)
            .ok_or(EngineError::PlayerNotFound(player_id))?;
        validation::ensure_can_check(hand, player)?;
        push_action(hand, players, player_id, seat, HandAction::Check);

        advance_seat(hand, seats, players);
        let close = hand.active_seat == hand.round_end_seat;
        if !close {
            *timeout = make_timeout(hand, seats, clock)?;
        }
        close
    };

    if close {
        close_round(game, deck, private_hands, clock)
    } else {
        Ok(HandStatus::Ongoing)
    }
}

/// Фолд.
///
/// Если претендентов на банк осталось не больше одного, раздача
/// заканчивается немедленно (карты больше не открываются). Если
/// сфолдил закрывающий — точка закрытия сдвигается вперёд.
pub fn fold<C: TimeSource>(
    game: &mut Game,
    player_id: PlayerId,
    deck: &mut Deck,
    private_hands: &[DealtHand],
    clock: &C,
) -> Result<HandStatus, EngineError> {
    let seat = validation::ensure_players_turn(game, player_id)?;

    let close = {
        let Game {
            players,
            seats,
            state,
            ..
        } = &mut *game;
        let GameState::InHand { hand, timeout } = state else {
            return Err(EngineError::WrongPhase);
        };

        players
            .get_mut(&player_id)
            .ok_or(EngineError::PlayerNotFound(player_id))?
            .folded = true;
        push_action(hand, players, player_id, seat, HandAction::Fold);

        if count_contenders(seats, players) <= 1 {
            true // победа фолдом
        } else {
            let curr = hand.active_seat;
            advance_seat(hand, seats, players);
            let next = hand.active_seat;
            if count_active(seats, players) == 0 {
                true // остались только all-in — докатываем борд
            } else if curr == hand.round_end_seat {
                hand.round_end_seat = next;
                *timeout = make_timeout(hand, seats, clock)?;
                false
            } else if next == hand.round_end_seat {
                true
            } else {
                *timeout = make_timeout(hand, seats, clock)?;
                false
            }
        }
    };

    if close {
        close_round(game, deck, private_hands, clock)
    } else {
        Ok(HandStatus::Ongoing)
    }
}

/// Встать из-за стола / вернуться.
///
/// Легально в любой момент, в том числе не в свой ход. Вставший
/// пропускает следующие деалы; если это случилось посреди раздачи —
/// для закрытия круга он учитывается как сфолдивший, а его dealt_in
/// снимается, чтобы он выпал из претендентов.
pub fn toggle_standing<C: TimeSource>(
    game: &mut Game,
    player_id: PlayerId,
    deck: &mut Deck,
    private_hands: &[DealtHand],
    clock: &C,
) -> Result<HandStatus, EngineError> {
    let player = game
        .players
        .get_mut(&player_id)
        .ok_or(EngineError::PlayerNotFound(player_id))?;
    player.standing = !player.standing;
    let now_standing = player.standing;
    let seat = player.seat;

    let in_hand = matches!(game.state, GameState::InHand { .. });
    let Some(seat) = seat else {
        return Ok(HandStatus::Ongoing);
    };
    if !in_hand || !now_standing {
        return Ok(HandStatus::Ongoing);
    }

    let close = {
        let Game {
            players,
            seats,
            state,
            ..
        } = &mut *game;
        let GameState::InHand { hand, timeout } = state else {
            return Err(EngineError::WrongPhase);
        };
        push_action(hand, players, player_id, seat, HandAction::Stand);

        if count_active(seats, players) <= 1 {
            true
        } else {
            let curr = hand.active_seat;
            if seat == curr {
                // Встал в свой ход — по кругу это эквивалент фолда.
                advance_seat(hand, seats, players);
                let next = hand.active_seat;
                if curr == hand.round_end_seat {
                    hand.round_end_seat = next;
                    *timeout = make_timeout(hand, seats, clock)?;
                    false
                } else if next == hand.round_end_seat {
                    true
                } else {
                    *timeout = make_timeout(hand, seats, clock)?;
                    false
                }
            } else if seat == hand.round_end_seat {
                // Встал не в свой ход, но был закрывающим: точка закрытия
                // должна оставаться активным местом.
                match next_active_seat(seats, players, seat) {
                    Some(s) => {
                        hand.round_end_seat = s;
                        false
                    }
                    None => true,
                }
            } else {
                false
            }
        }
    };

    let status = if close {
        close_round(game, deck, private_hands, clock)?
    } else {
        HandStatus::Ongoing
    };

    // Снимаем с раздачи: следующий деал (и счёт претендентов) его пропустит.
    if let Some(p) = game.players.get_mut(&player_id) {
        p.dealt_in = false;
    }

    Ok(status)
}

/// Выгнать игрока: встать (если ещё не стоит), освободить место,
/// удалить из комнаты.
pub fn kick_player<C: TimeSource>(
    game: &mut Game,
    player_id: PlayerId,
    deck: &mut Deck,
    private_hands: &[DealtHand],
    clock: &C,
) -> Result<HandStatus, EngineError> {
    let standing = game
        .players
        .get(&player_id)
        .ok_or(EngineError::PlayerNotFound(player_id))?
        .standing;

    let mut status = HandStatus::Ongoing;
    if !standing {
        status = toggle_standing(game, player_id, deck, private_hands, clock)?;
    }

    if let Some(player) = game.players.get(&player_id) {
        if let Some(seat) = player.seat {
            game.seats[seat as usize] = None;
        }
    }
    game.players.remove(&player_id);
    Ok(status)
}

/// Сработавший таймер хода: check, если он легален, иначе fold.
///
/// `observed` — дедлайн, который увидел планировщик. Если игрок уже
/// успел сходить (таймер перевзведён) или дедлайн ещё не наступил,
/// срабатывание отбрасывается без изменений состояния.
pub fn process_timeout<C: TimeSource>(
    game: &mut Game,
    observed: TurnTimeout,
    deck: &mut Deck,
    private_hands: &[DealtHand],
    clock: &C,
) -> Result<HandStatus, EngineError> {
    let (armed, can_check, player_id) = {
        let GameState::InHand { hand, timeout } = &game.state else {
            return Err(EngineError::WrongPhase);
        };
        let player_id = game
            .seats
            .get(hand.active_seat as usize)
            .copied()
            .flatten()
            .ok_or(EngineError::Internal("активное место пусто"))?;
        let player = game
            .players
            .get(&player_id)
            .ok_or(EngineError::Internal("активный игрок отсутствует"))?;
        (*timeout, hand.bet == player.bet, player_id)
    };

    if armed != observed || armed.player_id != player_id {
        return Err(EngineError::StaleTimeout);
    }
    if clock.now_ms() < armed.expiry_ms {
        return Err(EngineError::TimeoutNotExpired);
    }

    if can_check {
        check(game, player_id, deck, private_hands, clock)
    } else {
        fold(game, player_id, deck, private_hands, clock)
    }
}

// ------------------------- внутренняя кухня -------------------------

/// Поднять ставку активного игрока на `increase` (кап по стеку).
/// Ставку стола подтягивает до максимума. Место НЕ двигает.
fn bet_increase(
    hand: &mut HandState,
    players: &mut HashMap<PlayerId, Player>,
    seats: &Seats,
    increase: Chips,
) -> Result<(), EngineError> {
    let pid = seats
        .get(hand.active_seat as usize)
        .copied()
        .flatten()
        .ok_or(EngineError::Internal("активное место пусто"))?;
    let player = players
        .get_mut(&pid)
        .ok_or(EngineError::Internal("активный игрок отсутствует"))?;

    let verified = increase.min(player.chips);
    if verified == player.chips {
        player.all_in = true;
    }
    player.chips -= verified;
    player.bet += verified;

    if player.bet > hand.bet {
        hand.bet = player.bet;
    }
    Ok(())
}

/// Передать ход следующему активному месту. Если таких нет —
/// место не меняется (круг вот-вот закроется).
fn advance_seat(hand: &mut HandState, seats: &Seats, players: &HashMap<PlayerId, Player>) {
    if let Some(next) = next_active_seat(seats, players, hand.active_seat) {
        hand.active_seat = next;
    }
}

/// Взвести таймер на игрока активного места.
fn make_timeout<C: TimeSource>(
    hand: &HandState,
    seats: &Seats,
    clock: &C,
) -> Result<TurnTimeout, EngineError> {
    let player_id = seats
        .get(hand.active_seat as usize)
        .copied()
        .flatten()
        .ok_or(EngineError::Internal("активное место пусто"))?;
    Ok(TurnTimeout {
        player_id,
        expiry_ms: clock.now_ms() + TURN_TIMEOUT_MS,
    })
}

fn bet_of(
    players: &HashMap<PlayerId, Player>,
    seats: &Seats,
    seat: SeatIndex,
) -> Result<Chips, EngineError> {
    let pid = seats
        .get(seat as usize)
        .copied()
        .flatten()
        .ok_or(EngineError::Internal("место пусто"))?;
    Ok(players
        .get(&pid)
        .ok_or(EngineError::Internal("игрок отсутствует"))?
        .bet)
}

fn push_action(
    hand: &mut HandState,
    players: &HashMap<PlayerId, Player>,
    player_id: PlayerId,
    seat: SeatIndex,
    action: HandAction,
) {
    let new_stack = players
        .get(&player_id)
        .map(|p| p.chips)
        .unwrap_or(Chips::ZERO);
    hand.history.push(HandEventKind::PlayerActed {
        player_id,
        seat,
        action,
        new_stack,
    });
}

/// Закрыть круг торговли.
///
/// Собирает банки из ставок круга, обнуляет ставки и либо открывает
/// следующую улицу, либо (ривер / действовать больше некому) докатывает
/// борд и завершает раздачу шоудауном или победой фолдом.
fn close_round<C: TimeSource>(
    game: &mut Game,
    deck: &mut Deck,
    private_hands: &[DealtHand],
    clock: &C,
) -> Result<HandStatus, EngineError> {
    let finished = {
        let Game {
            players,
            seats,
            state,
            ..
        } = &mut *game;
        let GameState::InHand { hand, timeout } = state else {
            return Err(EngineError::Internal("закрытие круга вне раздачи"));
        };
        let round = hand.round();

        // Банки из ставок текущего круга.
        let mut new_pots = {
            let dealt: Vec<&Player> = seats
                .iter()
                .filter_map(|s| *s)
                .filter_map(|id| players.get(&id))
                .filter(|p| p.dealt_in)
                .collect();
            pots::build_pots_for_round(&dealt)?
        };
        hand.pots.append(&mut new_pots);
        for p in players.values_mut() {
            p.bet = Chips::ZERO;
        }

        let active = count_active(seats, players);
        let contenders = contender_ids(seats, players);

        if round == Street::River || active <= 1 {
            // Ушедший в all-in до ривера всё равно увидит полный борд —
            // если есть с кем сравниваться.
            if round != Street::River && contenders.len() != 1 {
                while hand.community.len() < 5 {
                    let card = deck
                        .draw_one()
                        .ok_or(EngineError::Internal("колода закончилась при докате борда"))?;
                    hand.community.push(card);
                }
                hand.history.push(HandEventKind::BoardDealt {
                    street: Street::River,
                    cards: hand.community.clone(),
                });
            }
            end_hand(hand, players, private_hands, &contenders)?;
            true
        } else {
            let count = match round {
                Street::PreFlop => 3,
                Street::Flop | Street::Turn => 1,
                Street::River => 0,
            };
            for _ in 0..count {
                let card = deck
                    .draw_one()
                    .ok_or(EngineError::Internal("колода закончилась на новой улице"))?;
                hand.community.push(card);
            }
            debug!(
                "новая улица {:?}, на борде {} карт",
                hand.round(),
                hand.community.len()
            );
            hand.history.push(HandEventKind::BoardDealt {
                street: hand.round(),
                cards: hand.community.clone(),
            });

            hand.bet = Chips::ZERO;
            hand.active_seat = next_active_seat(seats, players, hand.dealer_seat)
                .ok_or(EngineError::Internal("нет активных мест на новой улице"))?;
            hand.round_end_seat = hand.active_seat;
            *timeout = make_timeout(hand, seats, clock)?;
            false
        }
    };

    if finished {
        // Замораживаем раздачу; таймер при этом снимается.
        let state = mem::replace(&mut game.state, GameState::NotStarted);
        if let GameState::InHand { hand, .. } = state {
            game.state = GameState::FinishedHand { hand };
        }
        Ok(HandStatus::Finished)
    } else {
        Ok(HandStatus::Ongoing)
    }
}

/// Завершить раздачу: шоудаун или победа фолдом.
fn end_hand(
    hand: &mut HandState,
    players: &mut HashMap<PlayerId, Player>,
    private_hands: &[DealtHand],
    contenders: &[PlayerId],
) -> Result<(), EngineError> {
    let scores: Vec<(PlayerId, HandScore)> = if contenders.len() == 1 {
        // Победа фолдом: сравнивать не с кем, карты не вскрываются.
        vec![(contenders[0], HandScore(0))]
    } else {
        let mut scores = Vec::with_capacity(contenders.len());
        for &id in contenders {
            let hole = private_hands
                .iter()
                .find(|h| h.player_id == id)
                .ok_or(EngineError::Internal("нет приватных карт участника шоудауна"))?;
            let (_category, score) = evaluate_best_hand(&hole.cards, &hand.community);
            scores.push((id, score));
        }
        scores
    };

    let allocation = pots::split_pots(&scores, &hand.pots)?;
    for (id, _) in &scores {
        let chips = allocation.get(id).copied().unwrap_or(Chips::ZERO);
        let player = players
            .get_mut(id)
            .ok_or(EngineError::Internal("претендент отсутствует в комнате"))?;
        player.chips_won = Some(chips);
        if !chips.is_zero() {
            hand.history.push(HandEventKind::PotAwarded {
                player_id: *id,
                amount: chips,
            });
        }
    }

    // Вскрытие: в каждом банке показываются все, кто делит лучший счёт.
    if contenders.len() > 1 {
        let score_of: HashMap<PlayerId, HandScore> = scores.iter().copied().collect();
        for pot in &hand.pots {
            let best = pot
                .players
                .iter()
                .filter_map(|id| score_of.get(id))
                .min()
                .copied();
            let Some(best) = best else { continue };
            for id in &pot.players {
                if score_of.get(id) != Some(&best) {
                    continue;
                }
                let Some(hole) = private_hands.iter().find(|h| h.player_id == *id) else {
                    continue;
                };
                let player = players
                    .get_mut(id)
                    .ok_or(EngineError::Internal("претендент отсутствует в комнате"))?;
                if player.shown_hand.is_none() {
                    player.shown_hand = Some(hole.cards);
                    hand.history.push(HandEventKind::ShowdownReveal {
                        player_id: *id,
                        score: best.0,
                    });
                }
            }
        }
    }

    hand.history.push(HandEventKind::HandFinished);
    Ok(())
}
