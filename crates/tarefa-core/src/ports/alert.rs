//! AlertSink port - 利用者へのブロッキングなエラー通知
//!
//! API 呼び出しの失敗は生のエラー文字列を含むメッセージで通知します。
//! 例: `Erro ao listar tarefas: request failed: ...`

/// AlertSink は利用者に見えるアラートを出す
pub trait AlertSink: Send + Sync {
    fn alert(&self, message: &str);
}
