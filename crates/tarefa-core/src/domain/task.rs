use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::TaskId;

/// Priority of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Prioridade {
    Baixa,
    Media,
    Alta,
}

impl Prioridade {
    pub const ALL: [Prioridade; 3] = [Prioridade::Baixa, Prioridade::Media, Prioridade::Alta];

    /// ワイヤ上の表現（`"BAIXA"` / `"MEDIA"` / `"ALTA"`）
    pub fn as_str(&self) -> &'static str {
        match self {
            Prioridade::Baixa => "BAIXA",
            Prioridade::Media => "MEDIA",
            Prioridade::Alta => "ALTA",
        }
    }

    /// フォームの選択肢に出すラベル
    pub fn label(&self) -> &'static str {
        match self {
            Prioridade::Baixa => "Baixa",
            Prioridade::Media => "Média",
            Prioridade::Alta => "Alta",
        }
    }
}

impl fmt::Display for Prioridade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown prioridade '{0}' (expected BAIXA, MEDIA or ALTA)")]
pub struct ParsePrioridadeError(String);

impl FromStr for Prioridade {
    type Err = ParsePrioridadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BAIXA" => Ok(Prioridade::Baixa),
            "MEDIA" | "MÉDIA" => Ok(Prioridade::Media),
            "ALTA" => Ok(Prioridade::Alta),
            _ => Err(ParsePrioridadeError(s.to_string())),
        }
    }
}

/// Task record as returned by `GET /tarefa`.
///
/// ライフサイクルはリモート API が所有します。クライアントは一覧を
/// 一時的に保持するだけです。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub titulo: String,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub descricao: String,
    /// 欠落 / `null` / `""` は `None`（表示は空欄）
    #[serde(default, deserialize_with = "deserialize_prioridade_or_empty")]
    pub prioridade: Option<Prioridade>,
    /// 所有者のメールアドレス
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub email: String,
}

/// Body of `POST /tarefa`.
///
/// クライアント側での検証はしません。空文字列もそのまま送ります。
/// 優先度が未選択（`None`）の場合は `""` として送ります。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub titulo: String,
    pub descricao: String,
    #[serde(serialize_with = "serialize_prioridade_or_empty")]
    pub prioridade: Option<Prioridade>,
}

impl NewTask {
    pub fn new(
        titulo: impl Into<String>,
        descricao: impl Into<String>,
        prioridade: Option<Prioridade>,
    ) -> Self {
        Self {
            titulo: titulo.into(),
            descricao: descricao.into(),
            prioridade,
        }
    }
}

fn serialize_prioridade_or_empty<S: Serializer>(
    value: &Option<Prioridade>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(p) => serializer.serialize_str(p.as_str()),
        None => serializer.serialize_str(""),
    }
}

/// フォーム入力（空文字列 = 未選択）から `Option<Prioridade>` を読む
pub fn parse_optional_prioridade(s: &str) -> Result<Option<Prioridade>, ParsePrioridadeError> {
    if s.trim().is_empty() {
        Ok(None)
    } else {
        s.parse().map(Some)
    }
}

/// 欠落と `null` は空文字列（表示は空欄）
fn deserialize_null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// 未知の値はエラー（一覧全体のデコードが失敗する）
fn deserialize_prioridade_or_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Prioridade>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
