//! State - ビューアの状態
//!
//! # 状態遷移
//! - Loading → Redirecting: 未認証。ログインへのリダイレクトを 1 回だけ起動
//! - Loading → AwaitingToken: 認証済み。トークンをサイレント取得中
//! - AwaitingToken → Ready: トークン取得成功（ロールをデコード）
//! - AwaitingToken → TokenUnavailable: トークン取得失敗（リトライしない）
//! - Ready → Redirecting: ログアウト
//!
//! Ready の間は一覧・作成・削除を行ってもビューはブロックしません。

/// ViewState は TaskViewer の粗い状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// IdentityProvider がまだ解決していない
    Loading,
    /// ログインページへリダイレクト済み（終端）
    Redirecting,
    /// 認証済み、トークン待ち
    AwaitingToken,
    /// トークン取得に失敗。「リダイレクト中」のメッセージのまま止まる
    TokenUnavailable,
    /// トークンとロールが揃った
    Ready,
}

impl ViewState {
    pub fn is_ready(&self) -> bool {
        matches!(self, ViewState::Ready)
    }

    /// Ready 以外で表示するメッセージ
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            ViewState::Loading => Some("Loading ..."),
            ViewState::Redirecting | ViewState::AwaitingToken | ViewState::TokenUnavailable => {
                Some("Redirecionando para login...")
            }
            ViewState::Ready => None,
        }
    }
}
