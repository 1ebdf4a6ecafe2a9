//! 環境錯誤
//!
//! 任何錯誤回傳時，環境狀態保持不變。

use thiserror::Error;

use crate::game::{Action, Phase};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    #[error("action index {0} out of range (expected 0..{max})", max = crate::game::ACTION_MASK_SIZE)]
    ActionOutOfRange(usize),

    #[error("illegal action `{action}` for seat {seat} in phase {phase}")]
    IllegalAction {
        action: Action,
        seat: usize,
        phase: Phase,
    },

    #[error("seat {0} out of range (expected 0..{max})", max = crate::game::NUM_PLAYERS)]
    SeatOutOfRange(usize),

    #[error("round is over; call reset before stepping again")]
    RoundOver,
}
