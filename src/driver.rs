//! 對局驅動
//!
//! 一場比賽三局，第 k 局由座位 k 先手；每局分數累加為比賽總分。
//! 決策者出錯時（推論失敗、選了非法動作）改在合法動作中均勻抽樣，維度錯誤則直接回報。

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::game::{round_scores, NUM_PLAYERS, ROUNDS_PER_MATCH};
use crate::policy::{uniform_legal, Policy, PolicyError};
use crate::proto;
use crate::service::{EnvError, EnvState};

/// 單局步數上限；正常一局遠低於此
pub const MAX_ROUND_STEPS: usize = 2_000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DriverError {
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Env(#[from] EnvError),
    #[error("round did not finish within {0} steps")]
    StepLimit(usize),
}

pub type Seats = [Box<dyn Policy>; NUM_PLAYERS];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub seed: u64,
    pub round_scores: Vec<[i32; NUM_PLAYERS]>,
    pub totals: [i32; NUM_PLAYERS],
    pub winner: usize,
}

/// 向決策者要一個動作；失敗時退回均勻抽樣
pub fn choose_with_fallback(
    policy: &mut dyn Policy,
    observation: &[f32],
    legal_mask: &[bool],
    rng: &mut StdRng,
) -> Result<usize, DriverError> {
    let err = match policy.choose_action(observation, legal_mask) {
        Ok(action) if legal_mask.get(action).copied().unwrap_or(false) => return Ok(action),
        Ok(action) => PolicyError::IllegalChoice(action),
        Err(err @ PolicyError::DimensionMismatch { .. }) => return Err(err.into()),
        Err(err) => err,
    };

    warn!(policy = policy.name(), %err, "falling back to uniform legal action");
    uniform_legal(legal_mask, rng).ok_or(DriverError::Policy(PolicyError::NoLegalAction))
}

/// 軌跡紀錄位置
pub struct Recorder<'a> {
    pub match_seed: u64,
    pub round: usize,
    pub transitions: &'a mut Vec<proto::Transition>,
}

/// 以 `starting_player_offset` 重新發牌並打完一局，回傳局末分數
pub fn play_round(
    state: &mut EnvState,
    starting_player_offset: usize,
    seats: &mut Seats,
    rng: &mut StdRng,
    mut recorder: Option<&mut Recorder<'_>>,
) -> Result<[i32; NUM_PLAYERS], DriverError> {
    state.reset(starting_player_offset);

    let mut steps = 0;
    while !state.done {
        if steps >= MAX_ROUND_STEPS {
            return Err(DriverError::StepLimit(MAX_ROUND_STEPS));
        }
        steps += 1;

        let seat = state.current_player_idx;
        let observation = state.get_state(seat)?;
        let mask = state.get_legal_actions(seat);
        let action = choose_with_fallback(seats[seat].as_mut(), &observation, &mask, rng)?;

        let snapshot = match recorder {
            Some(_) => Some(state.proto_observation(seat)?),
            None => None,
        };
        let result = state.step(action)?;

        if let (Some(rec), Some(snapshot)) = (recorder.as_deref_mut(), snapshot) {
            rec.transitions.push(proto::Transition {
                observation: Some(snapshot),
                action: action as i32,
                reward: result.reward,
                done: result.done,
                info: Some(state.proto_info(Some(&result.info))),
                match_seed: rec.match_seed,
                round: rec.round as i32,
            });
        }
    }

    let scores = round_scores(&state.players);
    debug!(offset = starting_player_offset, steps, ?scores, "round complete");
    Ok(scores)
}

/// 總分最高者勝（分數皆 <= 0），同分取座位號小者
pub fn match_winner(totals: &[i32; NUM_PLAYERS]) -> usize {
    let mut best = 0;
    for seat in 1..NUM_PLAYERS {
        if totals[seat] > totals[best] {
            best = seat;
        }
    }
    best
}

/// 以固定種子打一場三局的比賽
pub fn run_match(
    seed: u64,
    seats: &mut Seats,
    mut trajectory: Option<&mut Vec<proto::Transition>>,
) -> Result<MatchResult, DriverError> {
    let mut state = EnvState::new(seed);
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let mut rounds = Vec::with_capacity(ROUNDS_PER_MATCH);
    let mut totals = [0; NUM_PLAYERS];

    for round in 0..ROUNDS_PER_MATCH {
        let scores = match trajectory.as_deref_mut() {
            Some(transitions) => {
                let mut recorder = Recorder {
                    match_seed: seed,
                    round,
                    transitions,
                };
                play_round(&mut state, round, seats, &mut rng, Some(&mut recorder))?
            }
            None => play_round(&mut state, round, seats, &mut rng, None)?,
        };

        for (total, score) in totals.iter_mut().zip(scores) {
            *total += score;
        }
        rounds.push(scores);
    }

    Ok(MatchResult {
        seed,
        round_scores: rounds,
        totals,
        winner: match_winner(&totals),
    })
}

// ============================================================================
// 單元測試
// ============================================================================
