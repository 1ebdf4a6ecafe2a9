//! 對外介面：reset / step / get_legal_actions / get_state

use tracing::warn;

use super::action_mask::{action_mask_from_state, legal_actions};
use super::error::EnvError;
use super::observation::{observation_for, observation_from_state};
use super::state::EnvState;
use crate::game::{
    round_scores, Action, ACTION_MASK_SIZE, NUM_PLAYERS, OBS_ENCODING_VERSION, OBS_SIZE,
};
use crate::proto;

/// step 附帶資訊
#[derive(Clone, Debug, PartialEq)]
pub struct StepInfo {
    pub rewards: [f32; NUM_PLAYERS],
    /// 只在局末提供
    pub scores: Option<[f32; NUM_PLAYERS]>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StepResult {
    /// 下一個行動座位的 observation
    pub observation: Vec<f32>,
    /// 行動座位本步獎勵
    pub reward: f32,
    pub done: bool,
    pub info: StepInfo,
}

fn check_seat(seat: usize) -> Result<(), EnvError> {
    if seat < NUM_PLAYERS {
        Ok(())
    } else {
        Err(EnvError::SeatOutOfRange(seat))
    }
}

impl EnvState {
    /// 重新洗牌開新局，回傳先手座位的 observation
    pub fn reset(&mut self, starting_player_offset: usize) -> Vec<f32> {
        self.deal(starting_player_offset);
        observation_for(self, self.current_player_idx)
    }

    /// 執行一個動作索引
    ///
    /// 越界、非法或局已結束時回傳錯誤，狀態不變。
    pub fn step(&mut self, action_index: usize) -> Result<StepResult, EnvError> {
        if self.done {
            return Err(EnvError::RoundOver);
        }
        let action = Action::from_index(action_index)
            .ok_or(EnvError::ActionOutOfRange(action_index))?;

        let effect = self.apply_action(action).inspect_err(|err| {
            warn!(action_index, %err, "action rejected");
        })?;
        self.episode_step += 1;

        let scores = self
            .done
            .then(|| round_scores(&self.players).map(|s| s as f32));

        Ok(StepResult {
            observation: observation_for(self, self.current_player_idx),
            reward: effect.rewards[effect.actor],
            done: self.done,
            info: StepInfo {
                rewards: effect.rewards,
                scores,
            },
        })
    }

    /// 越界座位的遮罩全為 false
    pub fn get_legal_actions(&self, seat: usize) -> [bool; ACTION_MASK_SIZE] {
        legal_actions(self, seat)
    }

    pub fn get_state(&self, seat: usize) -> Result<Vec<f32>, EnvError> {
        check_seat(seat)?;
        Ok(observation_for(self, seat))
    }

    /// 指定座位的 observation 與遮罩
    pub fn proto_observation(&self, seat: usize) -> Result<proto::Observation, EnvError> {
        check_seat(seat)?;
        Ok(proto::Observation {
            features: Some(observation_from_state(self, seat)),
            action_mask: Some(action_mask_from_state(self, seat)),
            seat: seat as i32,
        })
    }

    pub fn proto_info(&self, info: Option<&StepInfo>) -> proto::EnvInfo {
        proto::EnvInfo {
            rewards: info.map(|i| i.rewards.to_vec()).unwrap_or_default(),
            scores: info
                .and_then(|i| i.scores)
                .map(|s| s.to_vec())
                .unwrap_or_default(),
            phase: self.phase.to_index() as i32,
            tricks_played: self.tricks_played as i32,
            current_player: self.current_player_idx as i32,
            episode_step: self.episode_step as i32,
        }
    }
}

/// 觀測與動作空間規格
pub fn env_spec() -> proto::EnvSpec {
    proto::EnvSpec {
        observation: Some(proto::TensorSpec {
            shape: vec![OBS_SIZE as i32],
            dtype: "f32".to_string(),
        }),
        action_mask: Some(proto::TensorSpec {
            shape: vec![ACTION_MASK_SIZE as i32],
            dtype: "f32".to_string(),
        }),
        action_space: ACTION_MASK_SIZE as i32,
        version: OBS_ENCODING_VERSION,
    }
}
