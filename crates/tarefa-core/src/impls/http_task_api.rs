//! HttpTaskApi - reqwest によるリモート Task API クライアント
//!
//! # 学習ポイント
//! - `reqwest::Client` は内部でコネクションプールを持つので 1 つを使い回す
//! - ステータスの扱いは操作ごとに違う（list/create は非 2xx をエラー、
//!   delete はトランスポートエラーのみをエラーにする）

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response, Url};
use tracing::{debug, warn};

use crate::domain::{AccessToken, ApiError, NewTask, Task, TaskId};
use crate::ports::TaskApi;

/// HttpTaskApi は `{base_url}/tarefa` に対して HTTP リクエストを送る
///
/// # 使用例
/// ```ignore
/// let api = HttpTaskApi::new("http://localhost:8081")?;
/// let tasks = api.list(&token).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: Client,
    base_url: String,
}

impl HttpTaskApi {
    /// 新しい HttpTaskApi を作成
    ///
    /// 末尾の `/` は取り除きます。
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    /// 既存の `reqwest::Client` を使って作成
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/tarefa", self.base_url)
    }

    /// `{id}` は 1 つのパスセグメントとしてパーセントエンコードする
    fn item_url(&self, id: &TaskId) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.collection_url()).map_err(|e| ApiError::Transport(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Transport(format!("cannot use {} as a base URL", self.base_url)))?
            .push(&id.to_string());
        Ok(url)
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list(&self, token: &AccessToken) -> Result<Vec<Task>, ApiError> {
        let url = self.collection_url();
        debug!(%url, "GET tasks");

        let resp = self
            .client
            .get(&url)
            .header(AUTHORIZATION, token.bearer())
            .send()
            .await
            .map_err(transport)?;

        let resp = ensure_success(resp).await?;
        resp.json::<Vec<Task>>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn create(&self, token: &AccessToken, task: &NewTask) -> Result<(), ApiError> {
        let url = self.collection_url();
        debug!(%url, titulo = %task.titulo, "POST task");

        let body = serde_json::to_vec(task).map_err(|e| ApiError::Decode(e.to_string()))?;
        let resp = self
            .client
            .post(&url)
            .header(AUTHORIZATION, token.bearer())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(transport)?;

        // 作成された Task は使わないが、ボディは最後まで読む
        let resp = ensure_success(resp).await?;
        resp.bytes().await.map_err(transport)?;
        Ok(())
    }

    async fn delete(&self, token: &AccessToken, id: &TaskId) -> Result<(), ApiError> {
        let url = self.item_url(id)?;
        debug!(%url, "DELETE task");

        let resp = self
            .client
            .delete(url)
            .header(AUTHORIZATION, token.bearer())
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            warn!(%id, status = status.as_u16(), "DELETE returned a non-success status");
        }
        Ok(())
    }
}

fn transport(e: reqwest::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

async fn ensure_success(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}
