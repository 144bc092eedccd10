//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部の協調者（IdentityProvider、リモート Task API、
//! 利用者へのアラート表示、時計）へのインターフェースを提供し、
//! 実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - リモート API が source of truth（クライアントは一覧を一時的に持つだけ）
//! - トークンは不透明な資格情報として扱い、payload はロールの表示判定にだけ使う

pub mod identity_provider;
pub mod task_api;
pub mod alert;
pub mod clock;

// 主要な trait を再エクスポート
pub use self::identity_provider::IdentityProvider;
pub use self::task_api::TaskApi;
pub use self::alert::AlertSink;
pub use self::clock::{Clock, FixedClock, SystemClock};
