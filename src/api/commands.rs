use serde::{Deserialize, Serialize};

use crate::domain::{Chips, GameOptions, PlayerId, RoomId, SeatIndex, TurnTimeout};
use crate::engine::room::OptionsUpdate;

/// Команда верхнего уровня: одна команда = одна операция игрока.
///
/// Проверка формы запроса и авторизация — забота внешнего слоя;
/// здесь только правила игры.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Command {
    /// Создать комнату. Хост сразу добавляется игроком.
    CreateGame(CreateGameCommand),

    /// Добавить игрока в комнату (ещё без места).
    AddPlayer(AddPlayerCommand),

    /// Посадить игрока на место.
    SeatPlayer(SeatPlayerCommand),

    /// Запустить новую раздачу.
    StartHand(StartHandCommand),

    /// Действия в раздаче.
    Raise(RaiseCommand),
    Call(PlayerActionCommand),
    Check(PlayerActionCommand),
    Fold(PlayerActionCommand),

    /// Встать из-за стола / вернуться.
    ToggleStanding(PlayerActionCommand),

    /// Показать свои карты после раздачи.
    ShowHand(PlayerActionCommand),

    /// Хостовые операции.
    SetChips(SetChipsCommand),
    SetHost(SetHostCommand),
    UpdateOptions(UpdateOptionsCommand),
    KickPlayer(PlayerActionCommand),

    /// Срабатывание таймера хода (внешний планировщик).
    ProcessTimeout(ProcessTimeoutCommand),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateGameCommand {
    pub host_name: String,
    pub options: GameOptions,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AddPlayerCommand {
    pub room_id: RoomId,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeatPlayerCommand {
    pub room_id: RoomId,
    pub player_id: PlayerId,
    pub seat: SeatIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StartHandCommand {
    pub room_id: RoomId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RaiseCommand {
    pub room_id: RoomId,
    pub player_id: PlayerId,
    /// Надбавка к текущей ставке стола.
    pub amount: Chips,
}

/// Общая форма для действий, которым нужен только игрок.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerActionCommand {
    pub room_id: RoomId,
    pub player_id: PlayerId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SetChipsCommand {
    pub room_id: RoomId,
    pub player_id: PlayerId,
    pub amount: Chips,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SetHostCommand {
    pub room_id: RoomId,
    pub player_id: PlayerId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateOptionsCommand {
    pub room_id: RoomId,
    pub update: OptionsUpdate,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProcessTimeoutCommand {
    pub room_id: RoomId,
    /// Дедлайн, который увидел планировщик. Несовпадение с текущим —
    /// признак устаревшего срабатывания.
    pub observed: TurnTimeout,
}
