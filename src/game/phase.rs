//! 回合階段

use super::cards::{Card, Color};

/// 剛結算、等待贏家選擇移除哪枚封印的一墩
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingDiscard {
    pub winner: usize,
    pub lead_color: Color,
    pub win_card: Card,
}

/// 遊戲階段
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Bidding,
    Playing,
    Discarding(PendingDiscard),
}

impl Phase {
    /// 轉換為整數 ID (用於 observation one-hot)
    pub fn to_index(&self) -> usize {
        match self {
            Phase::Bidding => 0,
            Phase::Playing => 1,
            Phase::Discarding(_) => 2,
        }
    }

    pub fn pending(&self) -> Option<&PendingDiscard> {
        match self {
            Phase::Discarding(pending) => Some(pending),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Bidding => "BIDDING",
            Phase::Playing => "PLAYING",
            Phase::Discarding(_) => "DISCARDING",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
