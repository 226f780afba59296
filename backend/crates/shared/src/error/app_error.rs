//! Application Error - Unified terminal error type
//!
//! Defines [`AppError`] and [`AppResult<T>`].

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use super::kind::ErrorKind;

/// アプリケーション統一エラー型
///
/// JSON エラーエンベロープ
/// `{"success": false, "error": <message>, ...details}` として描画されます。
/// `details` はクォータ拒否時のカウンタなど、トップレベルに追加する
/// フィールドを保持します。
///
/// ## Fields
/// * `kind` - エラーの分類（HTTP ステータスコードにマッピング）
/// * `message` - ユーザー向けのエラーメッセージ
/// * `details` - エンベロープに追加するフィールド
///
/// ## Examples
/// ```rust
/// use kernel::error::app_error::AppError;
/// use kernel::error::kind::ErrorKind;
///
/// let err = AppError::new(ErrorKind::Forbidden, "exceeded quota")
///     .with_detail("totalQuota", 10)
///     .with_detail("performedQueryCount", 10);
/// assert_eq!(err.status_code(), 403);
/// assert_eq!(err.details()["totalQuota"], 10);
/// ```
pub struct AppError {
    /// エラー種別
    kind: ErrorKind,
    /// ユーザー向けメッセージ
    message: Cow<'static, str>,
    /// エンベロープの追加フィールド
    details: Map<String, Value>,
}

/// アプリケーション結果型エイリアス
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// 新しいエラーを作成
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: Map::new(),
        }
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Attach an extra top-level field to the rendered envelope.
    ///
    /// Values that fail to serialize are dropped; the envelope itself is
    /// never allowed to fail.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.details.insert(key.into(), value);
        }
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn details(&self) -> &Map<String, Value> {
        &self.details
    }

    /// JSON envelope body. Detail fields never overwrite `success`/`error`.
    pub fn to_body(&self) -> Value {
        let mut body = self.details.clone();
        body.insert("success".to_string(), Value::Bool(false));
        body.insert("error".to_string(), Value::String(self.message.to_string()));
        Value::Object(body)
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("kind", &self.kind);
        builder.field("message", &self.message);
        if !self.details.is_empty() {
            builder.field("details", &self.details);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl Error for AppError {}
