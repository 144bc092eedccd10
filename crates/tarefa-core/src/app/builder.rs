//! AppBuilder - TaskViewer の構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - 設定（ClientConfig）から本番用の ports を組み立てる

use std::sync::Arc;

use super::viewer::TaskViewer;
use crate::config::ClientConfig;
use crate::domain::{AccessToken, ApiError, DEFAULT_ROLES_CLAIM};
use crate::impls::{HttpTaskApi, StaticTokenIdentity};
use crate::ports::{AlertSink, Clock, IdentityProvider, SystemClock, TaskApi};

/// AppBuilder は TaskViewer を構築
///
/// # 使用例
/// ```ignore
/// let viewer = AppBuilder::new()
///     .identity(Arc::new(identity))
///     .task_api(Arc::new(api))
///     .alerts(Arc::new(alerts))
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - IdentityProvider / TaskApi / AlertSink は必須
/// - 不足があれば build() 時に BuildError を返す
/// - Clock は省略時 SystemClock、ロール claim は省略時 [`DEFAULT_ROLES_CLAIM`]
pub struct AppBuilder {
    identity: Option<Arc<dyn IdentityProvider>>,
    task_api: Option<Arc<dyn TaskApi>>,
    alerts: Option<Arc<dyn AlertSink>>,
    clock: Option<Arc<dyn Clock>>,
    roles_claim: String,
}

/// BuildError は TaskViewer 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing ports: {0:?}. These must be provided before build().")]
    MissingPorts(Vec<&'static str>),

    #[error("roles claim key must not be empty")]
    EmptyRolesClaim,

    #[error("cannot create HTTP client: {0}")]
    HttpClient(#[from] ApiError),
}

impl AppBuilder {
    /// 新しい AppBuilder を作成
    pub fn new() -> Self {
        Self {
            identity: None,
            task_api: None,
            alerts: None,
            clock: None,
            roles_claim: DEFAULT_ROLES_CLAIM.to_string(),
        }
    }

    /// 設定から本番用の IdentityProvider と TaskApi を組み立てる
    ///
    /// AlertSink は呼び出し側（UI）が渡します。
    pub fn from_config(config: &ClientConfig) -> Result<Self, BuildError> {
        let identity = StaticTokenIdentity::new(config.access_token.clone().map(AccessToken::new))
            .with_login_url(config.login_url.clone())
            .with_logout_url(config.logout_url.clone());
        let api = HttpTaskApi::new(config.api_base_url.clone())?;

        Ok(Self::new()
            .identity(Arc::new(identity))
            .task_api(Arc::new(api))
            .roles_claim(config.roles_claim.clone()))
    }

    pub fn identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn task_api(mut self, api: Arc<dyn TaskApi>) -> Self {
        self.task_api = Some(api);
        self
    }

    pub fn alerts(mut self, alerts: Arc<dyn AlertSink>) -> Self {
        self.alerts = Some(alerts);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn roles_claim(mut self, claim: impl Into<String>) -> Self {
        self.roles_claim = claim.into();
        self
    }

    /// AppBuilder を検証して TaskViewer を生成
    ///
    /// # 検証
    /// - 必須の ports がすべて設定されているか
    /// - ロール claim キーが空でないか
    pub fn build(self) -> Result<TaskViewer, BuildError> {
        let mut missing = Vec::new();
        if self.identity.is_none() {
            missing.push("identity");
        }
        if self.task_api.is_none() {
            missing.push("task_api");
        }
        if self.alerts.is_none() {
            missing.push("alerts");
        }

        match (self.identity, self.task_api, self.alerts) {
            (Some(identity), Some(api), Some(alerts)) => {
                if self.roles_claim.trim().is_empty() {
                    return Err(BuildError::EmptyRolesClaim);
                }
                let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
                Ok(TaskViewer::new(identity, api, alerts, clock, self.roles_claim))
            }
            _ => Err(BuildError::MissingPorts(missing)),
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
