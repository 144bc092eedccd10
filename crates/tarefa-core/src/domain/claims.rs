//! Token claims - アクセストークン payload のデコード
//!
//! # 方針
//! - 署名は検証しない（検証はサーバー側の責務）
//! - payload（2 番目のセグメント）を base64url → UTF-8 JSON として読む
//! - デコードは `Result` を返す fallible な処理。暗黙の panic はしない
//!
//! ロールは名前空間付きの URL 形式キー（既定: [`DEFAULT_ROLES_CLAIM`]）に
//! 文字列配列として入っています。キーが無ければ空集合です。

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;

use super::errors::ClaimsError;

/// 既定のロール claim キー
pub const DEFAULT_ROLES_CLAIM: &str = "https://musica-insper.com/roles";

/// 作成・削除を許可するロール
pub const ADMIN_ROLE: &str = "ADMIN";

/// AccessToken は Authorization ヘッダーに載せる不透明な資格情報
///
/// `Debug` では中身を出しません（ログへの漏えい防止）。
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Authorization` ヘッダーの値（`Bearer <token>`）
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Roles はトークンから取り出したロールの集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roles(BTreeSet<String>);

impl Roles {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(role)
    }

    /// `"ADMIN"` を含むか
    pub fn is_admin(&self) -> bool {
        self.contains(ADMIN_ROLE)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Roles {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// TokenClaims は payload から読み取った値
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenClaims {
    pub roles: Roles,
    /// `exp`（秒）を変換したもの
    pub expires_at: Option<DateTime<Utc>>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
}

impl TokenClaims {
    /// トークンの payload をデコードする
    ///
    /// # Errors
    /// - セグメント数が 3 でない
    /// - base64url / JSON として不正、または JSON が object でない
    /// - ロール claim が文字列配列でない
    pub fn decode(token: &AccessToken, roles_claim: &str) -> Result<Self, ClaimsError> {
        let payload = decode_payload(token.as_str())?;

        let roles = match payload.get(roles_claim) {
            None | Some(Value::Null) => Roles::empty(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| v.as_str().map(str::to_string))
                .collect::<Option<Vec<String>>>()
                .ok_or_else(|| ClaimsError::InvalidRolesClaim(roles_claim.to_string()))?
                .into_iter()
                .collect(),
            Some(_) => return Err(ClaimsError::InvalidRolesClaim(roles_claim.to_string())),
        };

        let expires_at = payload
            .get("exp")
            .and_then(Value::as_i64)
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single());

        Ok(Self {
            roles,
            expires_at,
            name: string_claim(&payload, "name"),
            email: string_claim(&payload, "email"),
            picture: string_claim(&payload, "picture"),
        })
    }

    /// `now` の時点で期限切れか（`exp` が無ければ期限なし）
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(exp) if exp <= now)
    }
}

fn decode_payload(token: &str) -> Result<Map<String, Value>, ClaimsError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(ClaimsError::SegmentCount(segments.len()));
    }

    // 標準 alphabet やパディング付きで来ることもあるので正規化してから読む
    let normalized: String = segments[1]
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    let bytes = URL_SAFE_NO_PAD.decode(normalized.as_bytes())?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn string_claim(payload: &Map<String, Value>, key: &str) -> Option<String> {
    payload.get(key).and_then(Value::as_str).map(str::to_string)
}

/// テスト用: payload JSON から署名なしの compact トークンを組み立てる
#[cfg(test)]
pub(crate) fn unsigned_token(payload: &Value) -> AccessToken {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
    AccessToken::new(format!("{header}.{body}.sig"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn admin_role_is_extracted_from_namespaced_claim() {
        let token = unsigned_token(&json!({ DEFAULT_ROLES_CLAIM: ["ADMIN"] }));
        let claims = TokenClaims::decode(&token, DEFAULT_ROLES_CLAIM).unwrap();

        assert!(claims.roles.is_admin());
        assert_eq!(claims.roles.iter().collect::<Vec<_>>(), vec!["ADMIN"]);
    }

    #[test]
    fn missing_roles_claim_yields_empty_roles() {
        let token = unsigned_token(&json!({ "sub": "auth0|123" }));
        let claims = TokenClaims::decode(&token, DEFAULT_ROLES_CLAIM).unwrap();

        assert!(claims.roles.is_empty());
        assert!(!claims.roles.is_admin());
    }

    #[test]
    fn roles_under_another_key_are_ignored() {
        let token = unsigned_token(&json!({ "roles": ["ADMIN"] }));
        let claims = TokenClaims::decode(&token, DEFAULT_ROLES_CLAIM).unwrap();
        assert!(claims.roles.is_empty());
    }

    #[test]
    fn custom_claim_key_is_honoured() {
        let token = unsigned_token(&json!({ "https://example.org/roles": ["ADMIN", "USER"] }));
        let claims = TokenClaims::decode(&token, "https://example.org/roles").unwrap();

        assert!(claims.roles.is_admin());
        assert!(claims.roles.contains("USER"));
    }

    #[test]
    fn profile_and_expiry_claims_are_read() {
        let token = unsigned_token(&json!({
            "name": "Ana",
            "email": "ana@example.com",
            "picture": "https://example.com/ana.png",
            "exp": 1_700_000_000
        }));
        let claims = TokenClaims::decode(&token, DEFAULT_ROLES_CLAIM).unwrap();

        assert_eq!(claims.name.as_deref(), Some("Ana"));
        assert_eq!(claims.email.as_deref(), Some("ana@example.com"));
        assert_eq!(claims.expires_at, Utc.timestamp_opt(1_700_000_000, 0).single());
        assert!(claims.is_expired_at(Utc.timestamp_opt(1_700_000_000, 0).unwrap()));
        assert!(!claims.is_expired_at(Utc.timestamp_opt(1_699_999_999, 0).unwrap()));
    }

    #[test]
    fn padded_payload_is_accepted() {
        let body = base64::engine::general_purpose::URL_SAFE
            .encode(json!({ DEFAULT_ROLES_CLAIM: ["ADMIN"] }).to_string());
        let token = AccessToken::new(format!("h.{body}.s"));

        let claims = TokenClaims::decode(&token, DEFAULT_ROLES_CLAIM).unwrap();
        assert!(claims.roles.is_admin());
    }

    #[rstest]
    #[case::opaque("opaque-token")]
    #[case::two_segments("a.b")]
    #[case::not_base64("h.***.s")]
    #[case::not_json("h.bm90LWpzb24.s")]
    fn malformed_tokens_are_errors(#[case] raw: &str) {
        let token = AccessToken::new(raw);
        assert!(TokenClaims::decode(&token, DEFAULT_ROLES_CLAIM).is_err());
    }

    #[test]
    fn non_array_roles_claim_is_an_error() {
        let token = unsigned_token(&json!({ DEFAULT_ROLES_CLAIM: "ADMIN" }));
        let err = TokenClaims::decode(&token, DEFAULT_ROLES_CLAIM).unwrap_err();
        assert!(matches!(err, ClaimsError::InvalidRolesClaim(_)));
    }

    #[test]
    fn access_token_debug_is_redacted() {
        let token = AccessToken::new("secret.value.here");
        assert_eq!(format!("{token:?}"), "AccessToken(***)");
        assert_eq!(token.bearer(), "Bearer secret.value.here");
    }
}
