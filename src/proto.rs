//! 環境介面的 protobuf 訊息
//!
//! 手寫 `prost::Message` derive，欄位編號固定；新增欄位只能用新編號。

/// 扁平張量
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Tensor {
    #[prost(float, repeated, tag = "1")]
    pub data: Vec<f32>,
    #[prost(int32, repeated, tag = "2")]
    pub shape: Vec<i32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Observation {
    #[prost(message, optional, tag = "1")]
    pub features: Option<Tensor>,
    #[prost(message, optional, tag = "2")]
    pub action_mask: Option<Tensor>,
    /// 觀察者座位
    #[prost(int32, tag = "3")]
    pub seat: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EnvInfo {
    /// 每座位本步獎勵
    #[prost(float, repeated, tag = "1")]
    pub rewards: Vec<f32>,
    /// 局末分數；未結束時為空
    #[prost(float, repeated, tag = "2")]
    pub scores: Vec<f32>,
    /// 0 = bidding, 1 = playing, 2 = discarding
    #[prost(int32, tag = "3")]
    pub phase: i32,
    #[prost(int32, tag = "4")]
    pub tricks_played: i32,
    #[prost(int32, tag = "5")]
    pub current_player: i32,
    #[prost(int32, tag = "6")]
    pub episode_step: i32,
}

/// 一筆 (observation, action, reward) 紀錄
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Transition {
    #[prost(message, optional, tag = "1")]
    pub observation: Option<Observation>,
    #[prost(int32, tag = "2")]
    pub action: i32,
    #[prost(float, tag = "3")]
    pub reward: f32,
    #[prost(bool, tag = "4")]
    pub done: bool,
    #[prost(message, optional, tag = "5")]
    pub info: Option<EnvInfo>,
    /// 場次 seed，方便重播
    #[prost(uint64, tag = "6")]
    pub match_seed: u64,
    #[prost(int32, tag = "7")]
    pub round: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TensorSpec {
    #[prost(int32, repeated, tag = "1")]
    pub shape: Vec<i32>,
    #[prost(string, tag = "2")]
    pub dtype: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EnvSpec {
    #[prost(message, optional, tag = "1")]
    pub observation: Option<TensorSpec>,
    #[prost(message, optional, tag = "2")]
    pub action_mask: Option<TensorSpec>,
    #[prost(int32, tag = "3")]
    pub action_space: i32,
    #[prost(uint32, tag = "4")]
    pub version: u32,
}
