//! 墩的結算與封印移除規則

use super::cards::{Card, Color};
use super::player::Player;

/// 一墩結算結果
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrickOutcome {
    pub winner: usize,
    pub win_card: Card,
    pub lead_color: Color,
}

/// 封印移除結果
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SealRemoval {
    Seal(Color),
    Joker,
    /// 無可移除，得一枚黑封印
    Penalty,
}

/// 結算一墩：王牌壓過一切，同花色（首出花色）比點數
///
/// 空墩回傳 None。
pub fn resolve_trick(trick: &[(usize, Card)]) -> Option<TrickOutcome> {
    let &(first_seat, lead) = trick.first()?;
    let lead_color = lead.color;
    let mut best = lead;
    let mut winner = first_seat;

    for &(seat, card) in &trick[1..] {
        if beats(card, best, lead_color) {
            best = card;
            winner = seat;
        }
    }

    Some(TrickOutcome {
        winner,
        win_card: best,
        lead_color,
    })
}

/// `candidate` 是否壓過目前最大的 `best`
pub fn beats(candidate: Card, best: Card, lead_color: Color) -> bool {
    if candidate.is_trump() {
        !best.is_trump() || candidate.value > best.value
    } else if candidate.color == lead_color && !best.is_trump() {
        candidate.value > best.value
    } else {
        false
    }
}

/// 跟牌規則：有首出花色就必須跟
pub fn can_follow(hand: &[Card], lead_color: Option<Color>, card: &Card) -> bool {
    match lead_color {
        None => true,
        Some(lead) => card.color == lead || !hand.iter().any(|c| c.color == lead),
    }
}

/// 可移除的封印花色（不含 Joker）
///
/// 王牌贏：王牌或首出花色；其他：只有贏牌花色。只回傳持有的花色。
pub fn legal_discard_colors(player: &Player, outcome: &TrickOutcome) -> Vec<Color> {
    let candidates = if outcome.win_card.is_trump() && !outcome.lead_color.is_trump() {
        vec![Color::TRUMP, outcome.lead_color]
    } else {
        vec![outcome.win_card.color]
    };
    candidates
        .into_iter()
        .filter(|&c| player.seals.get(c) > 0)
        .collect()
}

/// 贏家是否需要自己決定（進入 DISCARDING）
pub fn needs_decision(player: &Player, outcome: &TrickOutcome) -> bool {
    if player.joker_seals > 0 {
        return true;
    }
    outcome.win_card.is_trump()
        && !outcome.lead_color.is_trump()
        && player.seals.get(Color::TRUMP) > 0
        && player.seals.get(outcome.lead_color) > 0
}

/// 自動決定要移除的封印：王牌贏時優先首出花色，再王牌
pub fn auto_discard(player: &Player, outcome: &TrickOutcome) -> SealRemoval {
    let preference = if outcome.win_card.is_trump() {
        vec![outcome.lead_color, Color::TRUMP]
    } else {
        vec![outcome.win_card.color]
    };
    preference
        .into_iter()
        .find(|&c| player.seals.get(c) > 0)
        .map(SealRemoval::Seal)
        .unwrap_or(SealRemoval::Penalty)
}

// ============================================================================
// 單元測試
// ============================================================================
