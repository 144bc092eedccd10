use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::claims::{AccessToken, Roles, TokenClaims};

/// User profile exposed by the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    /// アバター画像の URL
    pub picture: String,
}

/// Session: the authenticated user plus its bearer token and roles.
///
/// 認証が完了してトークンを取得できた時点で作られ、ログアウトで破棄されます。
/// 未認証の状態は [`ViewState`](super::ViewState) 側で表現します。
///
/// Design:
/// - 所有者は TaskViewer だけ（トークンの更新も TaskViewer が行う）
/// - API 呼び出しには `&Session` を渡す
/// - ロールは UI の出し分けにだけ使う。認可の最終判断はサーバー側
#[derive(Debug, Clone)]
pub struct Session {
    pub user: UserProfile,
    token: AccessToken,
    roles: Roles,
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(user: UserProfile, token: AccessToken, claims: TokenClaims) -> Self {
        Self {
            user,
            token,
            roles: claims.roles,
            expires_at: claims.expires_at,
        }
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    pub fn roles(&self) -> &Roles {
        &self.roles
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// 作成フォームと「Ações」列を出すかどうか
    pub fn is_admin(&self) -> bool {
        self.roles.is_admin()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(exp) if exp <= now)
    }

    /// Replace the token after a silent renewal.
    pub fn renew(&mut self, token: AccessToken, claims: TokenClaims) {
        self.token = token;
        self.roles = claims.roles;
        self.expires_at = claims.expires_at;
    }
}
