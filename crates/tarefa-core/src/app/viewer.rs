//! TaskViewer - セッション管理とタスク一覧の状態機械
//!
//! # フロー
//! 1. `mount()`: 認証状態を見て、未認証ならリダイレクト、認証済みならトークンを取得
//! 2. トークンの payload からロールをデコードして Session を作る
//! 3. `GET /tarefa` で一覧を取得
//! 4. Ready の間は `create()` / `delete()` / `refresh()` を受け付ける
//!
//! # 学習ポイント
//! - リダイレクトを描画の副作用ではなく状態遷移（Loading → Redirecting）として扱う
//! - トークンの所有者は TaskViewer だけ。期限切れの更新もここで行う
//! - ビューの状態は `&mut self` 経由でしか変わらない

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::form::TaskForm;
use super::view::{self, View};
use crate::domain::{
    AccessToken, ApiError, NewTask, Prioridade, Session, Task, TaskId, TokenClaims, ViewState, ViewerError,
};
use crate::ports::{AlertSink, Clock, IdentityProvider, TaskApi};

/// TaskViewer はセッションで保護されたタスク一覧
///
/// 組み立ては [`AppBuilder`](super::AppBuilder) で行います。
pub struct TaskViewer {
    identity: Arc<dyn IdentityProvider>,
    api: Arc<dyn TaskApi>,
    alerts: Arc<dyn AlertSink>,
    clock: Arc<dyn Clock>,
    roles_claim: String,

    state: ViewState,
    session: Option<Session>,
    tasks: Vec<Task>,
    form: TaskForm,
}

impl TaskViewer {
    pub(crate) fn new(
        identity: Arc<dyn IdentityProvider>,
        api: Arc<dyn TaskApi>,
        alerts: Arc<dyn AlertSink>,
        clock: Arc<dyn Clock>,
        roles_claim: String,
    ) -> Self {
        Self {
            identity,
            api,
            alerts,
            clock,
            roles_claim,
            state: ViewState::Loading,
            session: None,
            tasks: Vec::new(),
            form: TaskForm::default(),
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn form(&self) -> &TaskForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut TaskForm {
        &mut self.form
    }

    /// 現在の状態を描画する
    pub fn render(&self) -> View {
        view::render(self.state, self.session.as_ref(), &self.tasks, &self.form)
    }

    /// 認証状態を解決して Ready まで進める
    ///
    /// - IdentityProvider が loading の間は何もしない（後で再度呼ぶ）
    /// - 未認証ならリダイレクトを 1 回だけ起動して Redirecting で止まる
    /// - トークン取得に失敗したらログを出して TokenUnavailable で止まる（リトライなし）
    /// - Ready になったら一覧を取得する
    pub async fn mount(&mut self) -> ViewState {
        if self.state != ViewState::Loading {
            return self.state;
        }
        if self.identity.is_loading() {
            debug!("identity state not resolved yet");
            return self.state;
        }

        if !self.identity.is_authenticated() {
            self.state = ViewState::Redirecting;
            info!("user is not authenticated, redirecting to login");
            if let Err(e) = self.identity.login_with_redirect().await {
                error!(error = %e, "login redirect failed");
            }
            return self.state;
        }

        self.state = ViewState::AwaitingToken;
        let token = match self.identity.get_access_token_silently().await {
            Ok(token) => token,
            Err(e) => {
                error!(error = %e, "Erro ao buscar token");
                self.state = ViewState::TokenUnavailable;
                return self.state;
            }
        };

        let claims = self.decode_claims(&token);
        let user = self.identity.user().unwrap_or_default();
        self.session = Some(Session::new(user, token, claims));
        self.state = ViewState::Ready;
        info!(admin = self.is_admin(), "session ready");

        // 失敗はアラート済み。状態は Ready のまま
        let _ = self.refresh().await;
        self.state
    }

    /// 作成・削除の操作が見えているか
    pub fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_admin)
    }

    /// `GET /tarefa` で一覧を置き換える
    ///
    /// 失敗時は「Erro ao listar tarefas: ...」をアラートし、一覧はそのまま。
    pub async fn refresh(&mut self) -> Result<(), ViewerError> {
        let token = self.fresh_token().await?;
        match self.api.list(&token).await {
            Ok(tasks) => {
                debug!(count = tasks.len(), "tasks listed");
                self.tasks = tasks;
                Ok(())
            }
            Err(e) => Err(self.report("Erro ao listar tarefas", e)),
        }
    }

    /// 指定した値で Task を作成する
    ///
    /// 検証はしません。成功したらフォームを空に戻し、一覧を取り直します。
    /// 取り直しの失敗も「Erro ao salvar tarefa: ...」としてアラートします。
    /// 二重に呼べば二重に作成されます（デバウンスなし）。
    pub async fn create(
        &mut self,
        titulo: impl Into<String>,
        descricao: impl Into<String>,
        prioridade: Option<Prioridade>,
    ) -> Result<(), ViewerError> {
        self.save(NewTask::new(titulo, descricao, prioridade)).await
    }

    /// フォームの入力値で Task を作成する（「Cadastrar」ボタン）
    pub async fn submit_form(&mut self) -> Result<(), ViewerError> {
        let body = self.form.to_new_task();
        self.save(body).await
    }

    async fn save(&mut self, body: NewTask) -> Result<(), ViewerError> {
        self.require_admin()?;
        let token = self.fresh_token().await?;

        if let Err(e) = self.api.create(&token, &body).await {
            return Err(self.report("Erro ao salvar tarefa", e));
        }
        info!(titulo = %body.titulo, "task created");
        self.form.reset();

        match self.api.list(&token).await {
            Ok(tasks) => {
                debug!(count = tasks.len(), "tasks listed after create");
                self.tasks = tasks;
                Ok(())
            }
            Err(e) => Err(self.report("Erro ao salvar tarefa", e)),
        }
    }

    /// `DELETE /tarefa/{id}` を送り、成功したらローカルの一覧から取り除く
    ///
    /// 楽観的更新: 一覧の取り直しはしません。HTTP ステータスが失敗を示していても
    /// リクエスト自体が完了していれば取り除きます。同じ id を二度消しても無害です。
    pub async fn delete(&mut self, id: &TaskId) -> Result<(), ViewerError> {
        self.require_admin()?;
        let token = self.fresh_token().await?;

        if let Err(e) = self.api.delete(&token, id).await {
            return Err(self.report("Erro ao excluir tarefa", e));
        }

        self.tasks.retain(|t| &t.id != id);
        info!(%id, "task removed from local list");
        Ok(())
    }

    /// 期限切れならトークンをサイレント更新する
    ///
    /// 更新に失敗したら Session を破棄して TokenUnavailable に遷移します。
    pub async fn ensure_fresh_token(&mut self) -> Result<(), ViewerError> {
        self.fresh_token().await.map(|_| ())
    }

    /// ログアウトしてセッションを破棄する
    pub async fn logout(&mut self) {
        if let Err(e) = self.identity.logout().await {
            error!(error = %e, "logout failed");
        }
        self.session = None;
        self.tasks.clear();
        self.form.reset();
        self.state = ViewState::Redirecting;
        info!("signed out");
    }

    async fn fresh_token(&mut self) -> Result<AccessToken, ViewerError> {
        if !self.state.is_ready() {
            return Err(ViewerError::NotReady);
        }
        let now = self.clock.now();
        let expired = match &self.session {
            Some(session) => session.is_expired_at(now),
            None => return Err(ViewerError::NotReady),
        };

        if expired {
            debug!("access token expired, renewing silently");
            match self.identity.get_access_token_silently().await {
                Ok(token) => {
                    let claims = self.decode_claims(&token);
                    if let Some(session) = self.session.as_mut() {
                        session.renew(token, claims);
                    }
                }
                Err(e) => {
                    error!(error = %e, "Erro ao buscar token");
                    self.session = None;
                    self.state = ViewState::TokenUnavailable;
                    return Err(ViewerError::Auth(e));
                }
            }
        }

        self.session
            .as_ref()
            .map(|s| s.token().clone())
            .ok_or(ViewerError::NotReady)
    }

    /// 壊れた payload はロールなしとして扱う（読み取り専用の表示になる）
    fn decode_claims(&self, token: &AccessToken) -> TokenClaims {
        match TokenClaims::decode(token, &self.roles_claim) {
            Ok(claims) => claims,
            Err(e) => {
                warn!(error = %e, "malformed token payload, continuing without roles");
                TokenClaims::default()
            }
        }
    }

    fn require_admin(&self) -> Result<(), ViewerError> {
        if !self.state.is_ready() {
            return Err(ViewerError::NotReady);
        }
        if !self.is_admin() {
            return Err(ViewerError::AdminRequired);
        }
        Ok(())
    }

    fn report(&self, context: &str, e: ApiError) -> ViewerError {
        warn!(error = %e, "{context}");
        self.alerts.alert(&format!("{context}: {e}"));
        ViewerError::Api(e)
    }
}
