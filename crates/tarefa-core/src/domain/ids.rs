//! Task identifiers.
//!
//! # リモート API が払い出す ID
//! ID の生成はサーバー側の責務で、クライアントは受け取った値をそのまま使います。
//! API によって数値（`42`）の場合と文字列（`"a1b2"`）の場合があるため、
//! どちらも受け付ける untagged enum にしています。
//!
//! `DELETE /tarefa/{id}` の `{id}` には Display の結果が
//! パスセグメントとしてエンコードされて入ります。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a Task, as returned by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Number(i64),
    Text(String),
}

impl TaskId {
    /// コマンドライン引数などの文字列から ID を作成
    ///
    /// 正規形の整数（`"7"`, `"-3"`）なら `Number`、それ以外は `Text` になります。
    /// `"007"` や `"+7"` は入力どおりの文字列を保つため `Text` です。
    pub fn parse(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => TaskId::Number(n),
            _ => TaskId::Text(s.to_string()),
        }
    }
}

impl From<i64> for TaskId {
    fn from(n: i64) -> Self {
        TaskId::Number(n)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId::Text(s.to_string())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Number(n) => write!(f, "{n}"),
            TaskId::Text(s) => f.write_str(s),
        }
    }
}
