//! 遊戲狀態管理
//!
//! `EnvState` 是一局的完整聚合：三個座位、封印池、Joker 池、當前墩與階段。
//! 所有規則都經過 `apply_action`；非法動作回傳錯誤且不改變狀態。

use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use tracing::debug;

use super::action_mask::is_legal;
use super::error::EnvError;
use crate::game::{
    auto_discard, full_deck, needs_decision, resolve_trick, Action, Card, Color, PendingDiscard,
    Phase, Player, SealCounts, SealRemoval, TrickOutcome, DISCARD_REWARD, HAND_SIZE,
    JOKER_POOL_SIZE, NUM_COLORS, NUM_PLAYERS, OTHER_POOL_SEALS, PENALTY_REWARD, TOTAL_CARDS,
    TRICKS_PER_ROUND, TRUMP_POOL_SEALS,
};

/// 封印池初始數量：王牌 5，其他各 3
pub fn initial_pool() -> SealCounts {
    let mut counts = [OTHER_POOL_SEALS; NUM_COLORS];
    counts[Color::TRUMP.to_index()] = TRUMP_POOL_SEALS;
    SealCounts::new(counts)
}

/// 單一動作造成的結果
#[derive(Clone, Debug, PartialEq)]
pub struct ActionEffect {
    pub actor: usize,
    pub rewards: [f32; NUM_PLAYERS],
    /// 本動作結束的一墩與其封印處理
    pub resolved: Option<(TrickOutcome, SealRemoval)>,
}

impl ActionEffect {
    fn new(actor: usize) -> Self {
        Self {
            actor,
            rewards: [0.0; NUM_PLAYERS],
            resolved: None,
        }
    }
}

/// 遊戲環境狀態
#[derive(Clone)]
pub struct EnvState {
    pub rng: StdRng,

    // 座位
    pub players: [Player; NUM_PLAYERS],

    // 封印
    pub pool_seals: SealCounts,
    pub joker_pool: u8,
    pub discarded_seals: SealCounts, // 已成功移除的封印（守恆檢查用）
    pub discarded_jokers: u8,

    // 出牌
    pub round_history_mask: [bool; TOTAL_CARDS],
    pub current_trick: Vec<(usize, Card)>,
    pub tricks_played: usize,

    // 進度
    pub phase: Phase,
    pub starting_player_offset: usize,
    pub current_player_idx: usize,
    pub done: bool,

    // 統計
    pub episode_step: u32,
}

impl EnvState {
    /// 以固定種子創建並發第一局（座位 0 先手）
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            rng: StdRng::seed_from_u64(seed),
            players: std::array::from_fn(|_| Player::new()),
            pool_seals: initial_pool(),
            joker_pool: JOKER_POOL_SIZE,
            discarded_seals: SealCounts::default(),
            discarded_jokers: 0,
            round_history_mask: [false; TOTAL_CARDS],
            current_trick: Vec::with_capacity(NUM_PLAYERS),
            tricks_played: 0,
            phase: Phase::Bidding,
            starting_player_offset: 0,
            current_player_idx: 0,
            done: false,
            episode_step: 0,
        };
        state.deal(0);
        state
    }

    /// 洗牌、發牌並重置本局所有紀錄
    pub fn deal(&mut self, starting_player_offset: usize) {
        let mut deck = full_deck();
        deck.shuffle(&mut self.rng);

        for (seat, hand) in deck.chunks(HAND_SIZE).enumerate() {
            self.players[seat].reset(hand.to_vec());
        }

        self.pool_seals = initial_pool();
        self.joker_pool = JOKER_POOL_SIZE;
        self.discarded_seals = SealCounts::default();
        self.discarded_jokers = 0;
        self.round_history_mask = [false; TOTAL_CARDS];
        self.current_trick.clear();
        self.tricks_played = 0;
        self.phase = Phase::Bidding;
        self.starting_player_offset = starting_player_offset % NUM_PLAYERS;
        self.current_player_idx = self.starting_player_offset;
        self.done = false;
        self.episode_step = 0;

        debug!(start = self.starting_player_offset, "dealt new round");
    }

    /// 當前墩的首出花色
    pub fn lead_color(&self) -> Option<Color> {
        self.current_trick.first().map(|(_, card)| card.color)
    }

    /// 套用一個動作；非法時回傳錯誤且狀態不變
    pub fn apply_action(&mut self, action: Action) -> Result<ActionEffect, EnvError> {
        if self.done {
            return Err(EnvError::RoundOver);
        }

        let actor = self.current_player_idx;
        if !is_legal(self, actor, &action) {
            return Err(EnvError::IllegalAction {
                action,
                seat: actor,
                phase: self.phase,
            });
        }

        let mut effect = ActionEffect::new(actor);

        match (self.phase, action) {
            (Phase::Bidding, Action::TakeSeal(color)) => {
                self.pool_seals.remove(color);
                self.players[actor].gain_seal(color);
            }

            (Phase::Bidding, Action::Steal { color, target }) => {
                let victim = target.resolve(actor);
                self.players[victim].seals.remove(color);
                self.players[actor].gain_seal(color);

                // 被偷者獲得 Joker 封印（池子還有時）
                if self.joker_pool > 0 {
                    self.joker_pool -= 1;
                    self.players[victim].joker_seals += 1;
                }
                debug!(actor, victim, color = color.name(), "seal stolen");
            }

            (Phase::Bidding, Action::Pass) => {
                self.players[actor].has_passed_bidding = true;
                self.advance_bidding_turn();
            }

            (Phase::Playing, Action::PlayCard(card)) => {
                self.play_card(actor, card, &mut effect);
            }

            (Phase::Discarding(pending), Action::Discard(color)) => {
                self.finish_trick(pending.outcome(), SealRemoval::Seal(color), &mut effect);
            }

            (Phase::Discarding(pending), Action::UseJoker) => {
                self.finish_trick(pending.outcome(), SealRemoval::Joker, &mut effect);
            }

            // is_legal 已排除其餘組合
            _ => {
                return Err(EnvError::IllegalAction {
                    action,
                    seat: actor,
                    phase: self.phase,
                })
            }
        }

        if self.tricks_played == TRICKS_PER_ROUND && self.current_trick.is_empty() {
            self.done = true;
            debug!("round finished");
        }

        Ok(effect)
    }

    /// Pass 後輪到下一個尚未 pass 的座位；全部 pass 則進入出牌
    fn advance_bidding_turn(&mut self) {
        if self.players.iter().all(|p| p.has_passed_bidding) {
            self.phase = Phase::Playing;
            self.current_player_idx = self.starting_player_offset;
            debug!(leader = self.current_player_idx, "bidding closed");
            return;
        }

        let mut next = (self.current_player_idx + 1) % NUM_PLAYERS;
        while self.players[next].has_passed_bidding {
            next = (next + 1) % NUM_PLAYERS;
        }
        self.current_player_idx = next;
    }

    fn play_card(&mut self, seat: usize, card: Card, effect: &mut ActionEffect) {
        if self.players[seat].take_card(card.id()).is_none() {
            return;
        }
        self.round_history_mask[card.id()] = true;
        self.current_trick.push((seat, card));

        if self.current_trick.len() < NUM_PLAYERS {
            self.current_player_idx = (seat + 1) % NUM_PLAYERS;
            return;
        }

        let Some(outcome) = resolve_trick(&self.current_trick) else {
            return;
        };
        debug!(
            winner = outcome.winner,
            card = %outcome.win_card,
            lead = outcome.lead_color.name(),
            "trick resolved"
        );

        let winner = &self.players[outcome.winner];
        if needs_decision(winner, &outcome) {
            self.phase = Phase::Discarding(PendingDiscard {
                winner: outcome.winner,
                lead_color: outcome.lead_color,
                win_card: outcome.win_card,
            });
            self.current_player_idx = outcome.winner;
        } else {
            let removal = auto_discard(winner, &outcome);
            self.finish_trick(outcome, removal, effect);
        }
    }

    /// 處理贏家封印、清空當前墩並由贏家領出下一墩
    fn finish_trick(
        &mut self,
        outcome: TrickOutcome,
        removal: SealRemoval,
        effect: &mut ActionEffect,
    ) {
        let winner = &mut self.players[outcome.winner];

        let applied = match removal {
            SealRemoval::Seal(color) if winner.seals.get(color) > 0 => {
                winner.seals.remove(color);
                self.discarded_seals.add(color);
                removal
            }
            SealRemoval::Joker if winner.joker_seals > 0 => {
                winner.joker_seals -= 1;
                self.discarded_jokers += 1;
                removal
            }
            _ => {
                winner.black_seals += 1;
                SealRemoval::Penalty
            }
        };

        let reward = match applied {
            SealRemoval::Penalty => PENALTY_REWARD,
            _ => DISCARD_REWARD,
        };
        effect.rewards[outcome.winner] += reward;
        effect.resolved = Some((outcome, applied));
        debug!(winner = outcome.winner, ?applied, reward, "trick finalized");

        self.current_trick.clear();
        self.tricks_played += 1;
        self.current_player_idx = outcome.winner;
        self.phase = Phase::Playing;
    }
}

impl PendingDiscard {
    pub fn outcome(&self) -> TrickOutcome {
        TrickOutcome {
            winner: self.winner,
            win_card: self.win_card,
            lead_color: self.lead_color,
        }
    }
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::RelSeat;

    fn card(color: Color, value: u8) -> Card {
        Card::new(color, value)
    }

    /// 手動指定手牌，直接進入出牌階段
    pub(crate) fn playing_state(hands: [Vec<Card>; NUM_PLAYERS], leader: usize) -> EnvState {
        let mut state = EnvState::new(0);
        for (seat, hand) in hands.into_iter().enumerate() {
            state.players[seat].reset(hand);
        }
        state.phase = Phase::Playing;
        state.starting_player_offset = leader;
        state.current_player_idx = leader;
        state
    }

    #[test]
    fn test_new_deals_full_deck() {
        let state = EnvState::new(7);
        let mut seen = [false; TOTAL_CARDS];
        for player in &state.players {
            assert_eq!(player.hand.len(), HAND_SIZE);
            for card in &player.hand {
                assert!(!seen[card.id()]);
                seen[card.id()] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(state.phase, Phase::Bidding);
        assert_eq!(state.pool_seals.total(), 17);
        assert_eq!(state.joker_pool, 4);
    }

    #[test]
    fn test_same_seed_same_deal() {
        let a = EnvState::new(11);
        let b = EnvState::new(11);
        for seat in 0..NUM_PLAYERS {
            assert_eq!(a.players[seat].hand, b.players[seat].hand);
        }
    }

    #[test]
    fn test_take_seal_keeps_turn() {
        let mut state = EnvState::new(1);
        state.apply_action(Action::TakeSeal(Color::Red)).unwrap();

        assert_eq!(state.pool_seals.get(Color::Red), 4);
        assert_eq!(state.players[0].seals.get(Color::Red), 1);
        assert_eq!(state.players[0].initial_seals.get(Color::Red), 1);
        assert_eq!(state.current_player_idx, 0);
    }

    #[test]
    fn test_take_from_empty_pool_rejected() {
        let mut state = EnvState::new(1);
        state.pool_seals = SealCounts::new([0, 3, 3, 3, 3]);
        let err = state.apply_action(Action::TakeSeal(Color::Red)).unwrap_err();
        assert!(matches!(err, EnvError::IllegalAction { seat: 0, .. }));
        assert_eq!(state.players[0].seals.total(), 0);
    }

    #[test]
    fn test_steal_awards_joker_to_victim() {
        let mut state = EnvState::new(1);
        state.pool_seals = SealCounts::new([0, 3, 3, 3, 3]);
        state.players[2].seals.add(Color::Red);
        state.current_player_idx = 1;

        // 索引 7：座位 1 偷右手第二位（座位 2）的王牌封印
        let action = Action::from_index(7).unwrap();
        assert_eq!(
            action,
            Action::Steal {
                color: Color::Red,
                target: RelSeat::SecondRight
            }
        );
        state.apply_action(action).unwrap();

        assert_eq!(state.players[2].seals.get(Color::Red), 0);
        assert_eq!(state.players[1].seals.get(Color::Red), 1);
        assert_eq!(state.players[1].initial_seals.get(Color::Red), 1);
        assert_eq!(state.players[2].joker_seals, 1);
        assert_eq!(state.joker_pool, 3);
        assert_eq!(state.current_player_idx, 1);
    }

    #[test]
    fn test_steal_without_jokers_left() {
        let mut state = EnvState::new(1);
        state.pool_seals = SealCounts::new([3, 0, 3, 3, 3]);
        state.joker_pool = 0;
        state.players[2].seals.add(Color::Blue);

        state
            .apply_action(Action::Steal {
                color: Color::Blue,
                target: RelSeat::Right,
            })
            .unwrap();
        assert_eq!(state.players[2].joker_seals, 0);
        assert_eq!(state.players[2].seals.get(Color::Blue), 0);
        assert_eq!(state.players[0].seals.get(Color::Blue), 1);
    }

    #[test]
    fn test_steal_rejected_while_pool_has_supply() {
        let mut state = EnvState::new(1);
        state.players[2].seals.add(Color::Blue);
        let result = state.apply_action(Action::Steal {
            color: Color::Blue,
            target: RelSeat::Right,
        });
        assert!(result.is_err());
        assert_eq!(state.players[2].seals.get(Color::Blue), 1);
    }

    #[test]
    fn test_pass_rotation_skips_passed_seats() {
        let mut state = EnvState::new(1);
        state.deal(1);
        assert_eq!(state.current_player_idx, 1);

        state.apply_action(Action::Pass).unwrap();
        assert_eq!(state.current_player_idx, 2);
        state.apply_action(Action::Pass).unwrap();
        assert_eq!(state.current_player_idx, 0);
        state.apply_action(Action::TakeSeal(Color::Blue)).unwrap();
        assert_eq!(state.current_player_idx, 0);
        state.apply_action(Action::Pass).unwrap();

        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.current_player_idx, 1);
    }

    #[test]
    fn test_play_card_requires_follow_suit() {
        let mut state = playing_state(
            [
                vec![card(Color::Blue, 5)],
                vec![card(Color::Blue, 2), card(Color::Red, 9)],
                vec![card(Color::Green, 1)],
            ],
            0,
        );
        state.apply_action(Action::PlayCard(card(Color::Blue, 5))).unwrap();

        let err = state.apply_action(Action::PlayCard(card(Color::Red, 9)));
        assert!(err.is_err());
        assert_eq!(state.current_trick.len(), 1);
        assert_eq!(state.players[1].hand.len(), 2);
    }

    #[test]
    fn test_trick_auto_resolves_with_penalty() {
        let mut state = playing_state(
            [
                vec![card(Color::Red, 5), card(Color::Red, 6)],
                vec![card(Color::Blue, 9), card(Color::Blue, 8)],
                vec![card(Color::Blue, 3), card(Color::Blue, 4)],
            ],
            0,
        );

        state.apply_action(Action::PlayCard(card(Color::Red, 5))).unwrap();
        state.apply_action(Action::PlayCard(card(Color::Blue, 9))).unwrap();
        let effect = state.apply_action(Action::PlayCard(card(Color::Blue, 3))).unwrap();

        let (outcome, removal) = effect.resolved.unwrap();
        assert_eq!(outcome.winner, 0);
        assert_eq!(removal, SealRemoval::Penalty);
        assert_eq!(effect.rewards, [PENALTY_REWARD, 0.0, 0.0]);
        assert_eq!(state.players[0].black_seals, 1);
        assert_eq!(state.tricks_played, 1);
        assert!(state.current_trick.is_empty());
        assert_eq!(state.current_player_idx, 0);
    }

    #[test]
    fn test_ambiguous_trump_win_enters_discarding() {
        let mut state = playing_state(
            [
                vec![card(Color::Green, 5)],
                vec![card(Color::Red, 2)],
                vec![card(Color::Green, 9)],
            ],
            0,
        );
        state.players[1].seals.add(Color::Red);
        state.players[1].seals.add(Color::Green);
        state.tricks_played = 14;

        state.apply_action(Action::PlayCard(card(Color::Green, 5))).unwrap();
        state.apply_action(Action::PlayCard(card(Color::Red, 2))).unwrap();
        state.apply_action(Action::PlayCard(card(Color::Green, 9))).unwrap();

        assert!(matches!(state.phase, Phase::Discarding(p) if p.winner == 1));
        assert_eq!(state.current_player_idx, 1);
        assert_eq!(state.current_trick.len(), 3);

        // 非法花色被拒絕
        assert!(state.apply_action(Action::Discard(Color::Blue)).is_err());

        let effect = state.apply_action(Action::Discard(Color::Red)).unwrap();
        assert_eq!(effect.rewards[1], DISCARD_REWARD);
        assert_eq!(state.players[1].seals.get(Color::Red), 0);
        assert_eq!(state.players[1].seals.get(Color::Green), 1);
        assert_eq!(state.discarded_seals.get(Color::Red), 1);
        assert_eq!(state.phase, Phase::Playing);
        assert!(state.done);
    }

    #[test]
    fn test_joker_discard() {
        let mut state = playing_state(
            [
                vec![card(Color::Yellow, 9)],
                vec![card(Color::Yellow, 1)],
                vec![card(Color::Purple, 1)],
            ],
            0,
        );
        state.players[0].joker_seals = 1;
        state.joker_pool = 3;

        state.apply_action(Action::PlayCard(card(Color::Yellow, 9))).unwrap();
        state.apply_action(Action::PlayCard(card(Color::Yellow, 1))).unwrap();
        state.apply_action(Action::PlayCard(card(Color::Purple, 1))).unwrap();
        assert!(matches!(state.phase, Phase::Discarding(_)));

        let effect = state.apply_action(Action::UseJoker).unwrap();
        assert_eq!(effect.resolved.unwrap().1, SealRemoval::Joker);
        assert_eq!(state.players[0].joker_seals, 0);
        assert_eq!(state.discarded_jokers, 1);
    }

    #[test]
    fn test_round_over_rejects_actions() {
        let mut state = playing_state([vec![], vec![], vec![]], 0);
        state.done = true;
        assert_eq!(state.apply_action(Action::Pass), Err(EnvError::RoundOver));
    }
}
