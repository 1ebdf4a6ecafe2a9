//! 卡牌與花色定義

use super::constants::{CARDS_PER_COLOR, NUM_COLORS, TOTAL_CARDS};

/// 花色（Red 為王牌）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    Red, // 王牌
    Blue,
    Yellow,
    Green,
    Purple,
}

impl Color {
    pub const TRUMP: Color = Color::Red;

    /// 轉換為整數 ID (用於 observation / action 編碼)
    pub fn to_index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Blue => 1,
            Color::Yellow => 2,
            Color::Green => 3,
            Color::Purple => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Color> {
        match index {
            0 => Some(Color::Red),
            1 => Some(Color::Blue),
            2 => Some(Color::Yellow),
            3 => Some(Color::Green),
            4 => Some(Color::Purple),
            _ => None,
        }
    }

    /// 所有花色，依索引排序
    pub fn all() -> &'static [Color; NUM_COLORS] {
        &[
            Color::Red,
            Color::Blue,
            Color::Yellow,
            Color::Green,
            Color::Purple,
        ]
    }

    pub fn is_trump(self) -> bool {
        self == Color::TRUMP
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "Red",
            Color::Blue => "Blue",
            Color::Yellow => "Yellow",
            Color::Green => "Green",
            Color::Purple => "Purple",
        }
    }
}

/// 一張牌；整副牌每種 (color, value) 恰好一張
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Card {
    pub color: Color,
    pub value: u8, // 1..=9
}

impl Card {
    pub fn new(color: Color, value: u8) -> Self {
        debug_assert!((1..=CARDS_PER_COLOR as u8).contains(&value));
        Self { color, value }
    }

    /// id = color * 9 + (value - 1)，範圍 0..45
    pub fn id(&self) -> usize {
        self.color.to_index() * CARDS_PER_COLOR + (self.value as usize - 1)
    }

    pub fn from_id(id: usize) -> Option<Card> {
        if id >= TOTAL_CARDS {
            return None;
        }
        let color = Color::from_index(id / CARDS_PER_COLOR)?;
        Some(Card {
            color,
            value: (id % CARDS_PER_COLOR) as u8 + 1,
        })
    }

    pub fn is_trump(&self) -> bool {
        self.color.is_trump()
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.color.name(), self.value)
    }
}

/// 創建完整 45 張牌組（依 id 排序）
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(TOTAL_CARDS);
    for &color in Color::all() {
        for value in 1..=CARDS_PER_COLOR as u8 {
            deck.push(Card::new(color, value));
        }
    }
    deck
}

// ============================================================================
// 單元測試
// ============================================================================
