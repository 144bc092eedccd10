//! IdentityProvider port - 外部の認証プロバイダー
//!
//! リダイレクトプロトコルやサイレント更新の仕組みはプロバイダー側の実装で、
//! このクレートはその結果（認証状態・ユーザー・アクセストークン）だけを使います。

use async_trait::async_trait;

use crate::domain::{AccessToken, AuthError, UserProfile};

/// IdentityProvider は認証状態とアクセストークンを提供
///
/// # 契約
/// - `is_loading()` が true の間は認証状態が未確定
/// - `login_with_redirect()` は副作用のみ（ログインページへ遷移）
/// - `get_access_token_silently()` はプロバイダーのサイレント更新を使って
///   有効なトークンを返す
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn is_loading(&self) -> bool;

    fn is_authenticated(&self) -> bool;

    /// 認証済みユーザーのプロフィール（未認証なら None）
    fn user(&self) -> Option<UserProfile>;

    async fn get_access_token_silently(&self) -> Result<AccessToken, AuthError>;

    async fn login_with_redirect(&self) -> Result<(), AuthError>;

    async fn logout(&self) -> Result<(), AuthError>;
}
