//! 遊戲核心模組
//!
//! 包含 Wizard Extreme 的規則定義：
//! - `constants`: 遊戲常量、observation / action 佈局
//! - `cards`: 花色與卡牌定義
//! - `player`: 座位狀態（手牌、封印）
//! - `actions`: 動作與索引編碼
//! - `phase`: 叫牌 / 出牌 / 棄封印 階段
//! - `trick`: 墩的結算與封印移除規則
//! - `scoring`: 局末計分
//!
//! 這裡只有純資料與演算法；狀態機在 `service::state`。

pub mod constants;
pub mod cards;
pub mod player;
pub mod actions;
pub mod phase;
pub mod trick;
pub mod scoring;

pub use constants::*;
pub use cards::{Card, Color, full_deck};
pub use player::{Player, SealCounts};
pub use actions::{Action, RelSeat};
pub use phase::{Phase, PendingDiscard};
pub use trick::{
    auto_discard, beats, can_follow, legal_discard_colors, needs_decision, resolve_trick,
    SealRemoval, TrickOutcome,
};
pub use scoring::{round_score, round_scores};
