//! TaskApi port - リモート Task API（`/tarefa`）
//!
//! # エンドポイント
//! - `GET /tarefa` → Task の配列
//! - `POST /tarefa`（body: `{titulo, descricao, prioridade}`）→ 作成された Task
//! - `DELETE /tarefa/{id}` → ボディ不要
//!
//! すべてのリクエストに `Authorization: Bearer <token>` を付けます。
//! リトライ・タイムアウト・キャンセルはしません。

use async_trait::async_trait;

use crate::domain::{AccessToken, ApiError, NewTask, Task, TaskId};

/// TaskApi はリモートの Task コレクションへのアクセス
///
/// # Thread Safety
/// - `Send + Sync` を要求（`Arc<dyn TaskApi>` として共有する）
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// 一覧を取得
    async fn list(&self, token: &AccessToken) -> Result<Vec<Task>, ApiError>;

    /// Task を作成。レスポンスボディは到着したことだけが重要
    async fn create(&self, token: &AccessToken, task: &NewTask) -> Result<(), ApiError>;

    /// Task を削除
    ///
    /// トランスポートレベルで失敗しなければ成功扱い（HTTP ステータスは問わない）。
    async fn delete(&self, token: &AccessToken, id: &TaskId) -> Result<(), ApiError>;
}
