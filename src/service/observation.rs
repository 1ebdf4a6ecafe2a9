//! Observation 構建
//!
//! 以觀察者為中心的 373 維向量，依序包含：
//! - 自己手牌 (45)
//! - 封印池 (5)
//! - 各座位目前封印 + Joker (3 * 6)
//! - 各座位累計封印 + 黑封印 (3 * 6)
//! - 本局已出牌 (45)
//! - 當前墩，列為相對座位 (3 * 45)
//! - 階段 one-hot (3)
//! - 墩內位置 one-hot (3)
//! - 手牌花色計數 (5)
//! - 墩數進度 (1)
//! - 待棄封印的贏牌花色 one-hot (5)
//! - 兩位對手已出牌 (2 * 45)
//!
//! 座位區塊一律為 [自己, 下家, 下下家]。正規化常數是對外契約的一部分。

use crate::proto::Tensor;

use super::state::EnvState;
use crate::game::{
    HAND_COLOR_NORM, NUM_COLORS, NUM_PLAYERS, OBS_SIZE, PHASE_FEATURES, SEAL_NORM, TOTAL_CARDS,
    TRICK_POSITION_FEATURES, TRICK_PROGRESS_NORM,
};

/// 從 `viewer` 看出去的座位順序
fn relative_seats(viewer: usize) -> [usize; NUM_PLAYERS] {
    std::array::from_fn(|i| (viewer + i) % NUM_PLAYERS)
}

fn push_flags(data: &mut Vec<f32>, flags: &[bool]) {
    data.extend(flags.iter().map(|&f| if f { 1.0 } else { 0.0 }));
}

fn push_one_hot(data: &mut Vec<f32>, size: usize, hot: Option<usize>) {
    data.extend((0..size).map(|i| if Some(i) == hot { 1.0 } else { 0.0 }));
}

/// 以 `viewer` 為中心構建 observation；呼叫端保證 `viewer < NUM_PLAYERS`
pub(crate) fn observation_for(state: &EnvState, viewer: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(OBS_SIZE);
    let seats = relative_seats(viewer);
    let me = &state.players[viewer];

    // ============================================================================
    // Own hand (45)
    // ============================================================================
    let mut hand = [false; TOTAL_CARDS];
    for card in &me.hand {
        hand[card.id()] = true;
    }
    push_flags(&mut data, &hand);

    // ============================================================================
    // Pool seals (5)
    // ============================================================================
    data.extend(
        state
            .pool_seals
            .as_array()
            .iter()
            .map(|&c| c as f32 / SEAL_NORM),
    );

    // ============================================================================
    // Per-seat current seals + joker (18)
    // ============================================================================
    for &seat in &seats {
        let player = &state.players[seat];
        data.extend(player.seals.as_array().iter().map(|&c| c as f32 / SEAL_NORM));
        data.push(player.joker_seals as f32 / SEAL_NORM);
    }

    // ============================================================================
    // Per-seat initial seals + black seals (18)
    // ============================================================================
    for &seat in &seats {
        let player = &state.players[seat];
        data.extend(
            player
                .initial_seals
                .as_array()
                .iter()
                .map(|&c| c as f32 / SEAL_NORM),
        );
        data.push(player.black_seals as f32 / SEAL_NORM);
    }

    // ============================================================================
    // Round history (45)
    // ============================================================================
    push_flags(&mut data, &state.round_history_mask);

    // ============================================================================
    // Current trick, row = relative seat (135)
    // ============================================================================
    let mut trick = [[false; TOTAL_CARDS]; NUM_PLAYERS];
    for &(seat, card) in &state.current_trick {
        let rel = (seat + NUM_PLAYERS - viewer) % NUM_PLAYERS;
        trick[rel][card.id()] = true;
    }
    for row in &trick {
        push_flags(&mut data, row);
    }

    // ============================================================================
    // Phase (3) + trick position (3)
    // ============================================================================
    push_one_hot(&mut data, PHASE_FEATURES, Some(state.phase.to_index()));
    // 棄封印時墩內已有三張，位置全為 0
    push_one_hot(
        &mut data,
        TRICK_POSITION_FEATURES,
        Some(state.current_trick.len()),
    );

    // ============================================================================
    // Hand color counts (5) + progress (1)
    // ============================================================================
    data.extend(
        me.hand_color_counts()
            .iter()
            .map(|&c| c as f32 / HAND_COLOR_NORM),
    );
    data.push(state.tricks_played as f32 / TRICK_PROGRESS_NORM);

    // ============================================================================
    // Pending discard winning color (5)
    // ============================================================================
    let pending_color = state
        .phase
        .pending()
        .map(|p| p.win_card.color.to_index());
    push_one_hot(&mut data, NUM_COLORS, pending_color);

    // ============================================================================
    // Opponent played-card memory (90)
    // ============================================================================
    for &seat in &seats[1..] {
        push_flags(&mut data, &state.players[seat].played_cards_mask);
    }

    debug_assert_eq!(data.len(), OBS_SIZE, "observation size mismatch");
    data
}

/// 從遊戲狀態構建 observation tensor
pub(crate) fn observation_from_state(state: &EnvState, viewer: usize) -> Tensor {
    Tensor {
        data: observation_for(state, viewer),
        shape: vec![OBS_SIZE as i32],
    }
}

// ============================================================================
// 單元測試
// ============================================================================
