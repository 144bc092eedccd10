//! Impls - ports の実装
//!
//! # 本番用
//! - **HttpTaskApi**: reqwest によるリモート Task API クライアント
//! - **StaticTokenIdentity**: 設定で渡されたトークンを使う IdentityProvider
//!
//! # 開発・テスト用
//! - **InMemoryTaskApi**: 呼び出しを記録するインメモリの Task API
//! - **InMemoryIdentity**: 状態を差し替えられる IdentityProvider
//! - **CollectingAlertSink**: アラートを溜めるだけの AlertSink

pub mod http_task_api;
pub mod static_identity;
pub mod inmem_task_api;
pub mod inmem_identity;
pub mod alerts;

pub use self::http_task_api::HttpTaskApi;
pub use self::static_identity::StaticTokenIdentity;
pub use self::inmem_task_api::{ApiCall, InMemoryTaskApi};
pub use self::inmem_identity::InMemoryIdentity;
pub use self::alerts::CollectingAlertSink;
