//! tarefa-core
//!
//! タスク（tarefa）管理 API のクライアント側ビルディングブロック。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（Task, Session, TokenClaims, ViewState, errors）
//! - **ports**: 抽象化レイヤー（IdentityProvider, TaskApi, AlertSink, Clock）
//! - **app**: アプリケーションロジック（TaskViewer, TaskForm, View, AppBuilder）
//! - **impls**: 実装（HttpTaskApi, StaticTokenIdentity, InMemory 系のテスト用実装）
//! - **config**: ClientConfig と階層的な ConfigLoader

pub mod domain;
pub mod ports;
pub mod app;
pub mod impls;
pub mod config;

pub use app::{AppBuilder, TaskViewer, View};
pub use config::{ClientConfig, ConfigError, ConfigLoader};
