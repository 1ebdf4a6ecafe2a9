//! 決策端介面
//!
//! 任何決策者（模型、腳本、人類輸入）只看 373 維 observation 與 67 維遮罩，
//! 回傳一個動作索引。維度檢查在這一層完成，引擎內部不做。

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::game::{
    Card, Color, ACTION_DISCARD_START, ACTION_MASK_SIZE, ACTION_PASS, ACTION_PLAY_START,
    ACTION_STEAL_START, ACTION_TAKE_START, ACTION_USE_JOKER, NUM_COLORS, OBS_PHASE_START,
    OBS_SEALS_START, OBS_SIZE, PHASE_FEATURES, SEAL_NORM, TOTAL_CARDS,
};

/// 非法 logit 的遮罩值
pub const MASKED_LOGIT: f32 = -1e15;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("{what} has length {actual}, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("policy chose illegal action {0}")]
    IllegalChoice(usize),
    #[error("no legal action available")]
    NoLegalAction,
}

/// 決策者
pub trait Policy: Send {
    fn name(&self) -> &'static str;

    /// 回傳的索引必須在 `legal_mask` 中為 true
    fn choose_action(&mut self, observation: &[f32], legal_mask: &[bool])
        -> Result<usize, PolicyError>;
}

/// observation / 遮罩長度不對時直接報錯，不截斷
pub fn check_dimensions(observation: &[f32], legal_mask: &[bool]) -> Result<(), PolicyError> {
    if observation.len() != OBS_SIZE {
        return Err(PolicyError::DimensionMismatch {
            what: "observation",
            expected: OBS_SIZE,
            actual: observation.len(),
        });
    }
    if legal_mask.len() != ACTION_MASK_SIZE {
        return Err(PolicyError::DimensionMismatch {
            what: "action mask",
            expected: ACTION_MASK_SIZE,
            actual: legal_mask.len(),
        });
    }
    Ok(())
}

pub fn legal_indices(legal_mask: &[bool]) -> Vec<usize> {
    legal_mask
        .iter()
        .enumerate()
        .filter(|(_, legal)| **legal)
        .map(|(i, _)| i)
        .collect()
}

/// 遮罩後的 softmax：非法 logit 設為 -1e15，減去最大值後取 exp
pub fn masked_softmax(logits: &[f32], legal_mask: &[bool]) -> Vec<f32> {
    let masked: Vec<f32> = logits
        .iter()
        .zip(legal_mask)
        .map(|(&logit, &legal)| if legal { logit } else { MASKED_LOGIT })
        .collect();

    let max = masked.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = masked.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// 依機率在合法動作中抽樣；累積誤差導致未命中時取最後一個合法動作
pub fn sample_action<R: Rng + ?Sized>(
    probs: &[f32],
    legal_mask: &[bool],
    rng: &mut R,
) -> Option<usize> {
    let legal = legal_indices(legal_mask);
    let last = *legal.last()?;
    if legal.len() == 1 {
        return Some(last);
    }

    let r: f32 = rng.gen();
    let mut cumulative = 0.0;
    for &action in &legal {
        cumulative += probs.get(action).copied().unwrap_or(0.0);
        if r < cumulative {
            return Some(action);
        }
    }
    Some(last)
}

/// 在合法動作中均勻抽樣
pub fn uniform_legal<R: Rng + ?Sized>(legal_mask: &[bool], rng: &mut R) -> Option<usize> {
    legal_indices(legal_mask).choose(rng).copied()
}

// ============================================================================
// RandomPolicy
// ============================================================================

pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose_action(
        &mut self,
        observation: &[f32],
        legal_mask: &[bool],
    ) -> Result<usize, PolicyError> {
        check_dimensions(observation, legal_mask)?;
        uniform_legal(legal_mask, &mut self.rng).ok_or(PolicyError::NoLegalAction)
    }
}

// ============================================================================
// GreedyPolicy
// ============================================================================

/// 只看 observation 與遮罩的腳本策略
///
/// - 叫牌：某花色的強牌（>= 7）比已持有封印多兩張以上就拿（或偷）該色封印，否則 pass
/// - 出牌：有欠封印的花色就出該色最大牌，否則丟最小牌（盡量不出王牌）
/// - 棄封印：先用 Joker
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyPolicy;

const STRONG_VALUE: u8 = 7;
const TAKE_MARGIN: i32 = 2;

/// observation 解碼後的自身視角
struct OwnView {
    hand: Vec<Card>,
    seals: [i32; NUM_COLORS],
}

impl OwnView {
    fn decode(observation: &[f32]) -> Self {
        let hand = observation[..TOTAL_CARDS]
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > 0.5)
            .filter_map(|(id, _)| Card::from_id(id))
            .collect();
        let seals = std::array::from_fn(|c| {
            (observation[OBS_SEALS_START + c] * SEAL_NORM).round() as i32
        });
        Self { hand, seals }
    }

    fn strong_cards(&self, color: Color) -> i32 {
        self.hand
            .iter()
            .filter(|c| c.color == color && c.value >= STRONG_VALUE)
            .count() as i32
    }

    /// 這張牌贏墩時能移除的封印
    fn owes(&self, card: &Card) -> bool {
        self.seals[card.color.to_index()] > 0
    }
}

fn phase_index(observation: &[f32]) -> usize {
    (0..PHASE_FEATURES)
        .find(|&i| observation[OBS_PHASE_START + i] > 0.5)
        .unwrap_or(0)
}

impl GreedyPolicy {
    fn bid(view: &OwnView, legal_mask: &[bool]) -> Option<usize> {
        let wanted = Color::all()
            .iter()
            .copied()
            .map(|color| {
                let margin = view.strong_cards(color) - view.seals[color.to_index()];
                (color, margin)
            })
            .filter(|&(_, margin)| margin >= TAKE_MARGIN)
            .max_by_key(|&(color, margin)| (margin, color.is_trump()));

        if let Some((color, _)) = wanted {
            let c = color.to_index();
            let take = ACTION_TAKE_START + c;
            if legal_mask[take] {
                return Some(take);
            }
            let steal = ACTION_STEAL_START + c * 2;
            if let Some(index) = (steal..steal + 2).find(|&i| legal_mask[i]) {
                return Some(index);
            }
        }
        legal_mask[ACTION_PASS].then_some(ACTION_PASS)
    }

    fn play(view: &OwnView, legal_mask: &[bool]) -> Option<usize> {
        let legal: Vec<Card> = (0..TOTAL_CARDS)
            .filter(|&id| legal_mask[ACTION_PLAY_START + id])
            .filter_map(Card::from_id)
            .collect();

        let chosen = match legal.iter().filter(|c| view.owes(c)).max_by_key(|c| c.value) {
            Some(card) => Some(card),
            None => legal.iter().min_by_key(|c| (c.is_trump(), c.value)),
        };
        chosen.map(|card| ACTION_PLAY_START + card.id())
    }

    fn discard(legal_mask: &[bool]) -> Option<usize> {
        if legal_mask[ACTION_USE_JOKER] {
            return Some(ACTION_USE_JOKER);
        }
        (ACTION_DISCARD_START..ACTION_USE_JOKER).find(|&i| legal_mask[i])
    }
}

impl Policy for GreedyPolicy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn choose_action(
        &mut self,
        observation: &[f32],
        legal_mask: &[bool],
    ) -> Result<usize, PolicyError> {
        check_dimensions(observation, legal_mask)?;
        let view = OwnView::decode(observation);

        let choice = match phase_index(observation) {
            0 => Self::bid(&view, legal_mask),
            1 => Self::play(&view, legal_mask),
            _ => Self::discard(legal_mask),
        };

        choice
            .or_else(|| legal_indices(legal_mask).first().copied())
            .ok_or(PolicyError::NoLegalAction)
    }
}

// ============================================================================
// LogitsPolicy
// ============================================================================

/// 包裝外部模型：observation -> 67 個 logit，遮罩後 softmax 抽樣
pub struct LogitsPolicy<F> {
    scorer: F,
    rng: StdRng,
}

impl<F> LogitsPolicy<F>
where
    F: FnMut(&[f32]) -> Result<Vec<f32>, String> + Send,
{
    pub fn new(scorer: F, seed: u64) -> Self {
        Self {
            scorer,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<F> Policy for LogitsPolicy<F>
where
    F: FnMut(&[f32]) -> Result<Vec<f32>, String> + Send,
{
    fn name(&self) -> &'static str {
        "logits"
    }

    fn choose_action(
        &mut self,
        observation: &[f32],
        legal_mask: &[bool],
    ) -> Result<usize, PolicyError> {
        check_dimensions(observation, legal_mask)?;

        let logits = (self.scorer)(observation).map_err(PolicyError::Inference)?;
        if logits.len() != ACTION_MASK_SIZE {
            return Err(PolicyError::DimensionMismatch {
                what: "logits",
                expected: ACTION_MASK_SIZE,
                actual: logits.len(),
            });
        }

        let probs = masked_softmax(&logits, legal_mask);
        sample_action(&probs, legal_mask, &mut self.rng).ok_or(PolicyError::NoLegalAction)
    }
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Phase;
    use crate::service::EnvState;

    fn mask_of(indices: &[usize]) -> Vec<bool> {
        let mut mask = vec![false; ACTION_MASK_SIZE];
        for &i in indices {
            mask[i] = true;
        }
        mask
    }

    #[test]
    fn test_check_dimensions_reports_lengths() {
        let err = check_dimensions(&[0.0; 10], &[true; ACTION_MASK_SIZE]).unwrap_err();
        assert_eq!(
            err,
            PolicyError::DimensionMismatch {
                what: "observation",
                expected: OBS_SIZE,
                actual: 10
            }
        );
        assert!(err.to_string().contains("373"));

        let err = check_dimensions(&[0.0; OBS_SIZE], &[true; 60]).unwrap_err();
        assert!(matches!(err, PolicyError::DimensionMismatch { actual: 60, .. }));
    }

    #[test]
    fn test_masked_softmax_zeroes_illegal() {
        let logits = vec![5.0; ACTION_MASK_SIZE];
        let mask = mask_of(&[3, 10]);
        let probs = masked_softmax(&logits, &mask);

        assert!((probs[3] - 0.5).abs() < 1e-6);
        assert!((probs[10] - 0.5).abs() < 1e-6);
        assert_eq!(probs[0], 0.0);
        assert!((probs.iter().sum::<f32>() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_masked_softmax_large_logits_stable() {
        let mut logits = vec![0.0; ACTION_MASK_SIZE];
        logits[1] = 1000.0;
        logits[2] = 999.0;
        let probs = masked_softmax(&logits, &mask_of(&[1, 2]));
        assert!(probs.iter().all(|p| p.is_finite()));
        assert!(probs[1] > probs[2]);
    }

    #[test]
    fn test_sample_action_only_legal() {
        let mut rng = StdRng::seed_from_u64(0);
        let mask = mask_of(&[7, 20, 66]);
        let probs = vec![1.0 / ACTION_MASK_SIZE as f32; ACTION_MASK_SIZE];
        for _ in 0..200 {
            let action = sample_action(&probs, &mask, &mut rng).unwrap();
            assert!(mask[action]);
        }
        assert_eq!(sample_action(&probs, &mask_of(&[]), &mut rng), None);
        // 機率全為 0 時退回最後一個合法動作
        assert_eq!(
            sample_action(&vec![0.0; ACTION_MASK_SIZE], &mask, &mut rng),
            Some(66)
        );
    }

    #[test]
    fn test_random_policy_is_seeded() {
        let state = EnvState::new(3);
        let obs = state.get_state(0).unwrap();
        let mask = state.get_legal_actions(0);

        let mut a = RandomPolicy::new(1);
        let mut b = RandomPolicy::new(1);
        for _ in 0..10 {
            let x = a.choose_action(&obs, &mask).unwrap();
            assert_eq!(x, b.choose_action(&obs, &mask).unwrap());
            assert!(mask[x]);
        }
    }

    #[test]
    fn test_logits_policy_prefers_high_logit() {
        let mut policy = LogitsPolicy::new(
            |_: &[f32]| -> Result<Vec<f32>, String> {
                let mut logits = vec![0.0; ACTION_MASK_SIZE];
                logits[ACTION_PASS] = 50.0;
                Ok(logits)
            },
            0,
        );
        let state = EnvState::new(3);
        let action = policy
            .choose_action(&state.get_state(0).unwrap(), &state.get_legal_actions(0))
            .unwrap();
        assert_eq!(action, ACTION_PASS);
    }

    #[test]
    fn test_logits_policy_errors() {
        let state = EnvState::new(3);
        let obs = state.get_state(0).unwrap();
        let mask = state.get_legal_actions(0);

        let mut failing = LogitsPolicy::new(
            |_: &[f32]| -> Result<Vec<f32>, String> { Err("model offline".to_string()) },
            0,
        );
        assert_eq!(
            failing.choose_action(&obs, &mask),
            Err(PolicyError::Inference("model offline".to_string()))
        );

        let mut short = LogitsPolicy::new(
            |_: &[f32]| -> Result<Vec<f32>, String> { Ok(vec![0.0; 12]) },
            0,
        );
        assert!(matches!(
            short.choose_action(&obs, &mask),
            Err(PolicyError::DimensionMismatch { what: "logits", .. })
        ));
    }

    #[test]
    fn test_greedy_takes_seal_for_strong_color() {
        let mut state = EnvState::new(3);
        state.players[0].reset(vec![
            Card::new(Color::Green, 7),
            Card::new(Color::Green, 8),
            Card::new(Color::Green, 9),
            Card::new(Color::Blue, 1),
        ]);
        let mut policy = GreedyPolicy;
        let action = policy
            .choose_action(&state.get_state(0).unwrap(), &state.get_legal_actions(0))
            .unwrap();
        assert_eq!(action, ACTION_TAKE_START + Color::Green.to_index());

        // 已拿兩枚後不再拿
        state.players[0].gain_seal(Color::Green);
        state.players[0].gain_seal(Color::Green);
        let action = policy
            .choose_action(&state.get_state(0).unwrap(), &state.get_legal_actions(0))
            .unwrap();
        assert_eq!(action, ACTION_PASS);
    }

    #[test]
    fn test_greedy_playing_and_discarding() {
        let mut state = EnvState::new(3);
        state.phase = Phase::Playing;
        state.players[0].reset(vec![
            Card::new(Color::Red, 2),
            Card::new(Color::Blue, 3),
            Card::new(Color::Blue, 9),
            Card::new(Color::Yellow, 1),
        ]);
        let mut policy = GreedyPolicy;

        // 沒有封印：丟最小的非王牌
        let action = policy
            .choose_action(&state.get_state(0).unwrap(), &state.get_legal_actions(0))
            .unwrap();
        assert_eq!(action, ACTION_PLAY_START + Card::new(Color::Yellow, 1).id());

        // 欠藍色封印：出藍 9
        state.players[0].seals.add(Color::Blue);
        let action = policy
            .choose_action(&state.get_state(0).unwrap(), &state.get_legal_actions(0))
            .unwrap();
        assert_eq!(action, ACTION_PLAY_START + Card::new(Color::Blue, 9).id());

        let mask = mask_of(&[ACTION_DISCARD_START, ACTION_USE_JOKER]);
        let mut obs = state.get_state(0).unwrap();
        obs[OBS_PHASE_START + 1] = 0.0;
        obs[OBS_PHASE_START + 2] = 1.0;
        assert_eq!(policy.choose_action(&obs, &mask), Ok(ACTION_USE_JOKER));
    }

    #[test]
    fn test_no_legal_action() {
        let obs = vec![0.0; OBS_SIZE];
        let mask = vec![false; ACTION_MASK_SIZE];
        assert_eq!(
            RandomPolicy::new(0).choose_action(&obs, &mask),
            Err(PolicyError::NoLegalAction)
        );
        assert_eq!(
            GreedyPolicy.choose_action(&obs, &mask),
            Err(PolicyError::NoLegalAction)
        );
    }
}
