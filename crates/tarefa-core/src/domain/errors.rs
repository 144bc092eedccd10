//! Errors - エラー型と分類
//!
//! # 分類
//! - AuthError: 認証・トークン取得の失敗（ログのみ、UI は「リダイレクト中」のまま）
//! - ApiError: リモート API 呼び出しの失敗（アラートで利用者に通知）
//! - ClaimsError: トークン payload の解析失敗（ロールなしとして扱う）
//! - ViewerError: TaskViewer の操作エラー

/// AuthError は IdentityProvider の操作エラー
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("user is not authenticated")]
    NotAuthenticated,

    #[error("token acquisition failed: {0}")]
    TokenAcquisition(String),
}

/// ClaimsError はトークン payload のデコードエラー
///
/// 署名は検証しません。ここで扱うのは「形」が壊れているケースだけです。
#[derive(Debug, thiserror::Error)]
pub enum ClaimsError {
    #[error("token must have three '.'-separated segments, found {0}")]
    SegmentCount(usize),

    #[error("payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),

    #[error("claim '{0}' must be an array of strings")]
    InvalidRolesClaim(String),
}

/// ApiError はリモート Task API の呼び出しエラー
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 接続失敗など、リクエスト自体が完了しなかった
    #[error("request failed: {0}")]
    Transport(String),

    /// レスポンスは返ったが 2xx ではなかった
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// レスポンスボディを解釈できなかった
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// ViewerError は TaskViewer の操作エラー
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// Ready 以外の状態では API を呼ばない
    #[error("viewer is not ready (no session token)")]
    NotReady,

    /// 作成・削除の操作は ADMIN にしか見えない
    #[error("this action requires the ADMIN role")]
    AdminRequired,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}
