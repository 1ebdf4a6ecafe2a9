//! 座位狀態

use super::cards::{Card, Color};
use super::constants::{NUM_COLORS, TOTAL_CARDS};

/// 每花色封印數量
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SealCounts([u8; NUM_COLORS]);

impl SealCounts {
    pub fn new(counts: [u8; NUM_COLORS]) -> Self {
        Self(counts)
    }

    pub fn get(&self, color: Color) -> u8 {
        self.0[color.to_index()]
    }

    pub fn add(&mut self, color: Color) {
        self.0[color.to_index()] += 1;
    }

    /// 移除一枚；沒有可移除時回傳 false
    pub fn remove(&mut self, color: Color) -> bool {
        let slot = &mut self.0[color.to_index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    pub fn total(&self) -> u32 {
        self.0.iter().map(|&c| c as u32).sum()
    }

    pub fn as_array(&self) -> [u8; NUM_COLORS] {
        self.0
    }
}

/// 單一座位的回合狀態
#[derive(Clone, Debug)]
pub struct Player {
    pub hand: Vec<Card>,
    pub seals: SealCounts,
    /// 本局取得過的封印總數（拿取或偷取），不遞減
    pub initial_seals: SealCounts,
    pub joker_seals: u8,
    pub black_seals: u8,
    pub has_passed_bidding: bool,
    pub played_cards_mask: [bool; TOTAL_CARDS],
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            hand: Vec::new(),
            seals: SealCounts::default(),
            initial_seals: SealCounts::default(),
            joker_seals: 0,
            black_seals: 0,
            has_passed_bidding: false,
            played_cards_mask: [false; TOTAL_CARDS],
        }
    }

    /// 發新手牌並清空本局紀錄
    pub fn reset(&mut self, mut hand: Vec<Card>) {
        hand.sort_by_key(|c| c.id());
        *self = Self {
            hand,
            ..Self::new()
        };
    }

    pub fn holds(&self, card_id: usize) -> bool {
        self.hand.iter().any(|c| c.id() == card_id)
    }

    /// 從手牌移除指定 id 的牌
    pub fn take_card(&mut self, card_id: usize) -> Option<Card> {
        let pos = self.hand.iter().position(|c| c.id() == card_id)?;
        let card = self.hand.remove(pos);
        self.played_cards_mask[card_id] = true;
        Some(card)
    }

    /// 獲得一枚封印（拿取或偷取）
    pub fn gain_seal(&mut self, color: Color) {
        self.seals.add(color);
        self.initial_seals.add(color);
    }

    pub fn hand_color_counts(&self) -> [u8; NUM_COLORS] {
        let mut counts = [0u8; NUM_COLORS];
        for card in &self.hand {
            counts[card.color.to_index()] += 1;
        }
        counts
    }
}
