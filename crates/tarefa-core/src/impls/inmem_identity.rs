//! InMemoryIdentity - 状態を差し替えられる IdentityProvider
//!
//! ブラウザのリダイレクトやサイレント更新を持たない環境（テスト、デモ）で
//! TaskViewer を動かすための実装です。呼び出し回数を数えるので
//! 「リダイレクトがちょうど 1 回起動された」などを検証できます。

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::domain::{AccessToken, AuthError, UserProfile};
use crate::ports::IdentityProvider;

/// InMemoryIdentity はスクリプト可能な IdentityProvider
///
/// # トークンの払い出し
/// - `queue_token()` で積んだトークンを先頭から返す
/// - キューが空になったら最後に返したトークンを返し続ける
/// - `fail_tokens()` 以降は `AuthError::TokenAcquisition`
#[derive(Debug, Default)]
pub struct InMemoryIdentity {
    loading: AtomicBool,
    authenticated: AtomicBool,
    user: Mutex<Option<UserProfile>>,
    tokens: Mutex<TokenScript>,
    redirects: AtomicUsize,
    token_requests: AtomicUsize,
    logouts: AtomicUsize,
}

#[derive(Debug, Default)]
struct TokenScript {
    queued: VecDeque<AccessToken>,
    last: Option<AccessToken>,
    failure: Option<String>,
}

impl InMemoryIdentity {
    /// 認証状態がまだ解決していない
    pub fn loading() -> Self {
        let identity = Self::default();
        identity.loading.store(true, Ordering::SeqCst);
        identity
    }

    /// 解決済みで未認証
    pub fn unauthenticated() -> Self {
        Self::default()
    }

    /// 解決済みで認証済み
    pub fn authenticated(user: UserProfile, token: AccessToken) -> Self {
        let identity = Self::default();
        identity.authenticated.store(true, Ordering::SeqCst);
        *lock(&identity.user) = Some(user);
        lock(&identity.tokens).queued.push_back(token);
        identity
    }

    /// 認証状態を確定させる（Loading の解除）
    pub fn resolve(&self, authenticated: bool) {
        self.authenticated.store(authenticated, Ordering::SeqCst);
        self.loading.store(false, Ordering::SeqCst);
    }

    /// 次のサイレント更新で返すトークンを積む
    pub fn queue_token(&self, token: AccessToken) {
        lock(&self.tokens).queued.push_back(token);
    }

    /// 以降のトークン取得を失敗させる
    pub fn fail_tokens(&self, message: impl Into<String>) {
        lock(&self.tokens).failure = Some(message.into());
    }

    pub fn redirect_count(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }

    pub fn token_request_count(&self) -> usize {
        self.token_requests.load(Ordering::SeqCst)
    }

    pub fn logout_count(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentity {
    fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    fn user(&self) -> Option<UserProfile> {
        if self.is_authenticated() {
            lock(&self.user).clone()
        } else {
            None
        }
    }

    async fn get_access_token_silently(&self) -> Result<AccessToken, AuthError> {
        self.token_requests.fetch_add(1, Ordering::SeqCst);
        if !self.is_authenticated() {
            return Err(AuthError::NotAuthenticated);
        }

        let mut script = lock(&self.tokens);
        if let Some(msg) = &script.failure {
            return Err(AuthError::TokenAcquisition(msg.clone()));
        }
        if let Some(next) = script.queued.pop_front() {
            script.last = Some(next);
        }
        script
            .last
            .clone()
            .ok_or_else(|| AuthError::TokenAcquisition("no token available".to_string()))
    }

    async fn login_with_redirect(&self) -> Result<(), AuthError> {
        self.redirects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.logouts.fetch_add(1, Ordering::SeqCst);
        self.authenticated.store(false, Ordering::SeqCst);
        Ok(())
    }
}

// Mutex が poison されても中身はただのテスト用データなので、そのまま使う
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}
