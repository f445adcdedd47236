//! api: デモ用 REST API のクライアント
//!
//! - `model`: レスポンス JSON を受け取る型（User / Post / Comment）
//! - `client`: 4 つの GET を行う `DataClient`

pub mod client;
pub mod model;
