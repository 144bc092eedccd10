//! InMemoryTaskApi - 開発・テスト用の Task API
//!
//! # 学習ポイント
//! - tokio::sync::Mutex による async な排他制御
//! - 呼び出し履歴（ApiCall）を残して「何回・どのトークンで呼ばれたか」を検証する
//! - サーバー側の失敗（トランスポートエラー / 黙って削除しない）を再現できる

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{AccessToken, ApiError, NewTask, Task, TaskId};
use crate::ports::TaskApi;

/// ApiCall は InMemoryTaskApi が受けたリクエストの記録
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    List { authorization: String },
    Create { authorization: String, body: NewTask },
    Delete { authorization: String, id: TaskId },
}

#[derive(Debug, Default)]
struct State {
    tasks: Vec<Task>,
    next_id: i64,
    calls: Vec<ApiCall>,
    /// Some の間はすべての呼び出しがトランスポートエラーになる
    failure: Option<String>,
    /// Some の間は list だけがトランスポートエラーになる
    list_failure: Option<String>,
    /// true なら DELETE に応答するがサーバー側では削除しない
    ignore_deletes: bool,
}

/// InMemoryTaskApi はプロセス内で完結する Task API
///
/// # 使用例
/// ```ignore
/// let api = InMemoryTaskApi::new().with_owner("ana@example.com");
/// api.seed(vec![task]).await;
/// let calls = api.calls().await;
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskApi {
    state: Arc<Mutex<State>>,
    owner: String,
}

impl InMemoryTaskApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// 作成される Task の `email`
    pub fn with_owner(mut self, email: impl Into<String>) -> Self {
        self.owner = email.into();
        self
    }

    /// サーバー側に Task を置く（採番は最大 id の次から）
    pub async fn seed(&self, tasks: Vec<Task>) {
        let mut state = self.state.lock().await;
        for task in &tasks {
            if let TaskId::Number(n) = task.id {
                state.next_id = state.next_id.max(n);
            }
        }
        state.tasks.extend(tasks);
    }

    /// 以降の呼び出しをすべて失敗させる
    pub async fn fail_with(&self, message: impl Into<String>) {
        self.state.lock().await.failure = Some(message.into());
    }

    /// 以降の list だけを失敗させる
    pub async fn fail_lists_with(&self, message: impl Into<String>) {
        self.state.lock().await.list_failure = Some(message.into());
    }

    pub async fn recover(&self) {
        let mut state = self.state.lock().await;
        state.failure = None;
        state.list_failure = None;
    }

    /// DELETE を受け付けるが実際には削除しない
    pub async fn ignore_deletes(&self) {
        self.state.lock().await.ignore_deletes = true;
    }

    pub async fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().await.calls.clone()
    }

    pub async fn server_tasks(&self) -> Vec<Task> {
        self.state.lock().await.tasks.clone()
    }

    fn check_failure(state: &State) -> Result<(), ApiError> {
        match &state.failure {
            Some(msg) => Err(ApiError::Transport(msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TaskApi for InMemoryTaskApi {
    async fn list(&self, token: &AccessToken) -> Result<Vec<Task>, ApiError> {
        let mut state = self.state.lock().await;
        state.calls.push(ApiCall::List {
            authorization: token.bearer(),
        });
        Self::check_failure(&state)?;
        if let Some(msg) = &state.list_failure {
            return Err(ApiError::Transport(msg.clone()));
        }
        Ok(state.tasks.clone())
    }

    async fn create(&self, token: &AccessToken, task: &NewTask) -> Result<(), ApiError> {
        let mut state = self.state.lock().await;
        state.calls.push(ApiCall::Create {
            authorization: token.bearer(),
            body: task.clone(),
        });
        Self::check_failure(&state)?;

        state.next_id += 1;
        let id = TaskId::Number(state.next_id);
        state.tasks.push(Task {
            id,
            titulo: task.titulo.clone(),
            descricao: task.descricao.clone(),
            prioridade: task.prioridade,
            email: self.owner.clone(),
        });
        Ok(())
    }

    async fn delete(&self, token: &AccessToken, id: &TaskId) -> Result<(), ApiError> {
        let mut state = self.state.lock().await;
        state.calls.push(ApiCall::Delete {
            authorization: token.bearer(),
            id: id.clone(),
        });
        Self::check_failure(&state)?;

        if !state.ignore_deletes {
            state.tasks.retain(|t| &t.id != id);
        }
        Ok(())
    }
}
