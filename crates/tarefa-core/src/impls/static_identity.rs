//! StaticTokenIdentity - 設定で渡されたアクセストークンを使う IdentityProvider
//!
//! ターミナルにはブラウザのリダイレクトもサイレント更新も無いので、
//! 利用者がプロバイダーで取得したトークンを設定（`TAREFA_ACCESS_TOKEN` など）で渡します。
//! ユーザープロフィールはトークンの標準 claim（`name` / `email` / `picture`）から読みます。

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

use crate::domain::{AccessToken, AuthError, TokenClaims, UserProfile, DEFAULT_ROLES_CLAIM};
use crate::ports::IdentityProvider;

/// StaticTokenIdentity はトークンの有無で認証状態が決まる
///
/// # リダイレクト
/// `login_with_redirect()` はログイン URL を案内するだけです（副作用はログのみ）。
#[derive(Debug)]
pub struct StaticTokenIdentity {
    token: Option<AccessToken>,
    login_url: Option<String>,
    logout_url: Option<String>,
    signed_out: AtomicBool,
}

impl StaticTokenIdentity {
    pub fn new(token: Option<AccessToken>) -> Self {
        Self {
            token,
            login_url: None,
            logout_url: None,
            signed_out: AtomicBool::new(false),
        }
    }

    pub fn with_login_url(mut self, url: Option<String>) -> Self {
        self.login_url = url;
        self
    }

    pub fn with_logout_url(mut self, url: Option<String>) -> Self {
        self.logout_url = url;
        self
    }

    fn active_token(&self) -> Option<&AccessToken> {
        if self.signed_out.load(Ordering::SeqCst) {
            None
        } else {
            self.token.as_ref()
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenIdentity {
    fn is_loading(&self) -> bool {
        false
    }

    fn is_authenticated(&self) -> bool {
        self.active_token().is_some()
    }

    fn user(&self) -> Option<UserProfile> {
        let token = self.active_token()?;
        // プロフィールは表示用。読めなければ空のプロフィールにする
        let claims = TokenClaims::decode(token, DEFAULT_ROLES_CLAIM).unwrap_or_default();
        Some(UserProfile {
            name: claims.name.unwrap_or_default(),
            email: claims.email.unwrap_or_default(),
            picture: claims.picture.unwrap_or_default(),
        })
    }

    async fn get_access_token_silently(&self) -> Result<AccessToken, AuthError> {
        self.active_token()
            .cloned()
            .ok_or(AuthError::NotAuthenticated)
    }

    async fn login_with_redirect(&self) -> Result<(), AuthError> {
        match &self.login_url {
            Some(url) => info!(%url, "login required, continue at the identity provider"),
            None => warn!("login required, but no login URL is configured"),
        }
        Ok(())
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.signed_out.store(true, Ordering::SeqCst);
        if let Some(url) = &self.logout_url {
            info!(%url, "signed out, end the provider session at this URL");
        }
        Ok(())
    }
}
