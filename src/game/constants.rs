//! 遊戲常量定義

// ============================================================================
// 遊戲規則常量
// ============================================================================

pub const NUM_PLAYERS: usize = 3;         // 座位數
pub const NUM_COLORS: usize = 5;          // 花色數（0 = 王牌）
pub const CARDS_PER_COLOR: usize = 9;     // 每花色 1..=9
pub const TOTAL_CARDS: usize = NUM_COLORS * CARDS_PER_COLOR; // 45
pub const HAND_SIZE: usize = TOTAL_CARDS / NUM_PLAYERS;      // 每人 15 張
pub const TRICKS_PER_ROUND: usize = 15;   // 每局墩數
pub const ROUNDS_PER_MATCH: usize = 3;    // 每場比賽局數（輪流先手）

pub const TRUMP_POOL_SEALS: u8 = 5;       // 王牌封印初始數量
pub const OTHER_POOL_SEALS: u8 = 3;       // 其他花色封印初始數量
pub const JOKER_POOL_SIZE: u8 = 4;        // Joker 封印池

// ============================================================================
// 獎勵與計分
// ============================================================================

pub const DISCARD_REWARD: f32 = 2.0;      // 成功移除封印
pub const PENALTY_REWARD: f32 = -3.0;     // 無封印可移除，得黑封印

pub const LEFTOVER_SEAL_COST: i32 = 3;
pub const BLACK_SEAL_COST: i32 = 3;
pub const JOKER_SEAL_COST: i32 = 4;

// ============================================================================
// Observation 常量
// ============================================================================

/// 觀測向量版本；佈局或正規化常數改動時遞增
pub const OBS_ENCODING_VERSION: u32 = 1;

pub const SEAL_NORM: f32 = 5.0;
pub const HAND_COLOR_NORM: f32 = 15.0;
pub const TRICK_PROGRESS_NORM: f32 = TRICKS_PER_ROUND as f32;

pub const HAND_FEATURES: usize = TOTAL_CARDS;                         // 45
pub const POOL_FEATURES: usize = NUM_COLORS;                          // 5
pub const SEAT_SEAL_FEATURES: usize = NUM_PLAYERS * (NUM_COLORS + 1); // 18: seals + joker
pub const SEAT_HISTORY_FEATURES: usize = NUM_PLAYERS * (NUM_COLORS + 1); // 18: initial + black
pub const HISTORY_FEATURES: usize = TOTAL_CARDS;                      // 45
pub const TRICK_FEATURES: usize = NUM_PLAYERS * TOTAL_CARDS;          // 135
pub const PHASE_FEATURES: usize = 3;
pub const TRICK_POSITION_FEATURES: usize = NUM_PLAYERS;               // 3
pub const HAND_COLOR_FEATURES: usize = NUM_COLORS;                    // 5
pub const PROGRESS_FEATURES: usize = 1;
pub const PENDING_COLOR_FEATURES: usize = NUM_COLORS;                 // 5
pub const OPPONENT_MEMORY_FEATURES: usize = (NUM_PLAYERS - 1) * TOTAL_CARDS; // 90

pub const OBS_SIZE: usize = HAND_FEATURES
    + POOL_FEATURES
    + SEAT_SEAL_FEATURES
    + SEAT_HISTORY_FEATURES
    + HISTORY_FEATURES
    + TRICK_FEATURES
    + PHASE_FEATURES
    + TRICK_POSITION_FEATURES
    + HAND_COLOR_FEATURES
    + PROGRESS_FEATURES
    + PENDING_COLOR_FEATURES
    + OPPONENT_MEMORY_FEATURES; // 373

// 各區塊起點
pub const OBS_POOL_START: usize = HAND_FEATURES;
pub const OBS_SEALS_START: usize = OBS_POOL_START + POOL_FEATURES;
pub const OBS_INITIAL_START: usize = OBS_SEALS_START + SEAT_SEAL_FEATURES;
pub const OBS_HISTORY_START: usize = OBS_INITIAL_START + SEAT_HISTORY_FEATURES;
pub const OBS_TRICK_START: usize = OBS_HISTORY_START + HISTORY_FEATURES;
pub const OBS_PHASE_START: usize = OBS_TRICK_START + TRICK_FEATURES;
pub const OBS_POSITION_START: usize = OBS_PHASE_START + PHASE_FEATURES;
pub const OBS_HAND_COLOR_START: usize = OBS_POSITION_START + TRICK_POSITION_FEATURES;
pub const OBS_PROGRESS_INDEX: usize = OBS_HAND_COLOR_START + HAND_COLOR_FEATURES;
pub const OBS_PENDING_START: usize = OBS_PROGRESS_INDEX + PROGRESS_FEATURES;
pub const OBS_MEMORY_START: usize = OBS_PENDING_START + PENDING_COLOR_FEATURES;

// ============================================================================
// Action 常量
// ============================================================================

// Action layout:
// [0..5]:   Take pool seal (5)
// [5]:      Pass (1)
// [6..16]:  Steal, 6 + color * 2 + (rel - 1) (10)
// [16..61]: Play card id (45)
// [61..66]: Discard seal color (5)
// [66]:     Use joker (1)
pub const ACTION_TAKE_START: usize = 0;
pub const ACTION_PASS: usize = 5;
pub const ACTION_STEAL_START: usize = 6;
pub const ACTION_PLAY_START: usize = 16;
pub const ACTION_DISCARD_START: usize = 61;
pub const ACTION_USE_JOKER: usize = 66;

pub const ACTION_MASK_SIZE: usize = ACTION_USE_JOKER + 1; // 67
