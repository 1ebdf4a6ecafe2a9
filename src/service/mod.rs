//! 服務層模組
//!
//! 提供環境狀態機、觀測構建、動作遮罩與對外介面

pub mod action_mask;
pub mod env;
pub mod error;
pub mod observation;
pub mod state;

pub use action_mask::{action_mask_from_state, is_legal, legal_actions};
pub use env::{env_spec, StepInfo, StepResult};
pub use error::EnvError;
pub use state::{initial_pool, ActionEffect, EnvState};
