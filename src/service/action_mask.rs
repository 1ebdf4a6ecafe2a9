//! Action Mask 構建
//!
//! `is_legal` 是唯一的合法性判定；狀態機與遮罩都用它。

use crate::proto::Tensor;

use super::state::EnvState;
use crate::game::{can_follow, legal_discard_colors, Action, Phase, ACTION_MASK_SIZE, NUM_PLAYERS};

/// 指定座位在目前狀態下能否執行 `action`
///
/// 叫牌與出牌只看該座位自身的狀態；棄封印階段只有待決贏家有合法動作。
/// 越界座位沒有任何合法動作。
pub fn is_legal(state: &EnvState, seat: usize, action: &Action) -> bool {
    if state.done || seat >= NUM_PLAYERS {
        return false;
    }
    let player = &state.players[seat];

    match (state.phase, *action) {
        (Phase::Bidding, Action::TakeSeal(color)) => state.pool_seals.get(color) > 0,
        (Phase::Bidding, Action::Pass) => true,
        (Phase::Bidding, Action::Steal { color, target }) => {
            let victim = &state.players[target.resolve(seat)];
            state.pool_seals.get(color) == 0 && victim.seals.get(color) > 0
        }

        (Phase::Playing, Action::PlayCard(card)) => {
            player.holds(card.id()) && can_follow(&player.hand, state.lead_color(), &card)
        }

        (Phase::Discarding(pending), Action::Discard(color)) => {
            pending.winner == seat
                && legal_discard_colors(player, &pending.outcome()).contains(&color)
        }
        (Phase::Discarding(pending), Action::UseJoker) => {
            pending.winner == seat && player.joker_seals > 0
        }

        _ => false,
    }
}

/// 指定座位的 67 維合法動作遮罩
pub fn legal_actions(state: &EnvState, seat: usize) -> [bool; ACTION_MASK_SIZE] {
    let mut mask = [false; ACTION_MASK_SIZE];
    for (index, slot) in mask.iter_mut().enumerate() {
        if let Some(action) = Action::from_index(index) {
            *slot = is_legal(state, seat, &action);
        }
    }
    mask
}

/// 從遊戲狀態構建 action mask tensor（1.0 = 合法）
pub fn action_mask_from_state(state: &EnvState, seat: usize) -> Tensor {
    let data = legal_actions(state, seat)
        .iter()
        .map(|&legal| if legal { 1.0 } else { 0.0 })
        .collect();

    Tensor {
        data,
        shape: vec![ACTION_MASK_SIZE as i32],
    }
}

// ============================================================================
// 單元測試
// ============================================================================
