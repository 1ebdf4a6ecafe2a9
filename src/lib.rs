//! Wizard Extreme 三人吃墩遊戲環境
//!
//! - `game`: 規則資料與演算法
//! - `service`: 狀態機、observation、動作遮罩與對外介面
//! - `policy` / `driver`: 決策者介面與對局驅動
//! - `proto`: 對外的 protobuf 訊息

pub mod driver;
pub mod game;
pub mod policy;
pub mod proto;
pub mod service;
