//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせてアプリケーションロジックを実装します。
//!
//! # 主要コンポーネント
//! - **AppBuilder**: TaskViewer の構築とワイヤリング
//! - **TaskViewer**: セッション・一覧・フォームの状態機械
//! - **TaskForm**: 作成フォームの入力値
//! - **View**: 描画結果（純粋関数 `render` で生成）

pub mod builder;
pub mod viewer;
pub mod form;
pub mod view;

// 主要な型を再エクスポート
pub use self::builder::{AppBuilder, BuildError};
pub use self::viewer::TaskViewer;
pub use self::form::TaskForm;
pub use self::view::{render, View};
