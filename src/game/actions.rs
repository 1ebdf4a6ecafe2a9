//! 動作定義與 0..67 索引編碼
//!
//! 內部邏輯只處理 `Action`；整數索引只在介面邊界轉換。

use super::cards::{Card, Color};
use super::constants::{
    ACTION_DISCARD_START, ACTION_MASK_SIZE, ACTION_PASS, ACTION_PLAY_START, ACTION_STEAL_START,
    ACTION_TAKE_START, ACTION_USE_JOKER, NUM_COLORS, NUM_PLAYERS,
};

/// 相對座位（從行動者往右數；出牌順序往左，右手即上家）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelSeat {
    Right,       // +1
    SecondRight, // +2
}

impl RelSeat {
    pub fn offset(self) -> usize {
        match self {
            RelSeat::Right => 1,
            RelSeat::SecondRight => 2,
        }
    }

    /// 從行動者座位解析出絕對座位
    pub fn resolve(self, actor: usize) -> usize {
        (actor + NUM_PLAYERS - self.offset()) % NUM_PLAYERS
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    TakeSeal(Color),
    Pass,
    Steal { color: Color, target: RelSeat },
    PlayCard(Card),
    Discard(Color),
    UseJoker,
}

impl Action {
    pub fn from_index(index: usize) -> Option<Action> {
        match index {
            i if i < ACTION_PASS => Color::from_index(i - ACTION_TAKE_START).map(Action::TakeSeal),
            ACTION_PASS => Some(Action::Pass),
            i if i < ACTION_PLAY_START => {
                let offset = i - ACTION_STEAL_START;
                let color = Color::from_index(offset / 2)?;
                let target = if offset % 2 == 0 {
                    RelSeat::Right
                } else {
                    RelSeat::SecondRight
                };
                Some(Action::Steal { color, target })
            }
            i if i < ACTION_DISCARD_START => Card::from_id(i - ACTION_PLAY_START).map(Action::PlayCard),
            i if i < ACTION_USE_JOKER => {
                Color::from_index(i - ACTION_DISCARD_START).map(Action::Discard)
            }
            ACTION_USE_JOKER => Some(Action::UseJoker),
            _ => None,
        }
    }

    pub fn to_index(&self) -> usize {
        match *self {
            Action::TakeSeal(color) => ACTION_TAKE_START + color.to_index(),
            Action::Pass => ACTION_PASS,
            Action::Steal { color, target } => {
                ACTION_STEAL_START + color.to_index() * 2 + (target.offset() - 1)
            }
            Action::PlayCard(card) => ACTION_PLAY_START + card.id(),
            Action::Discard(color) => ACTION_DISCARD_START + color.to_index(),
            Action::UseJoker => ACTION_USE_JOKER,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::TakeSeal(color) => write!(f, "take {}", color.name()),
            Action::Pass => write!(f, "pass"),
            Action::Steal { color, target } => {
                write!(f, "steal {} from +{}", color.name(), target.offset())
            }
            Action::PlayCard(card) => write!(f, "play {}", card),
            Action::Discard(color) => write!(f, "discard {}", color.name()),
            Action::UseJoker => write!(f, "use joker"),
        }
    }
}

const _: () = assert!(ACTION_STEAL_START + NUM_COLORS * 2 == ACTION_PLAY_START);
const _: () = assert!(ACTION_USE_JOKER + 1 == ACTION_MASK_SIZE);
