//! 局末計分

use super::constants::{BLACK_SEAL_COST, JOKER_SEAL_COST, LEFTOVER_SEAL_COST, NUM_PLAYERS};
use super::player::Player;

/// score = -(剩餘封印 * 3 + 黑封印 * 3 + Joker 封印 * 4)
pub fn round_score(player: &Player) -> i32 {
    let leftover = player.seals.total() as i32;
    -(leftover * LEFTOVER_SEAL_COST
        + player.black_seals as i32 * BLACK_SEAL_COST
        + player.joker_seals as i32 * JOKER_SEAL_COST)
}

pub fn round_scores(players: &[Player; NUM_PLAYERS]) -> [i32; NUM_PLAYERS] {
    std::array::from_fn(|seat| round_score(&players[seat]))
}
