//! # API レスポンスエンベロープ
//!
//! 公開 API の統一レスポンス形式 `{ "code": int, "msg": string, "data": T | null }` を提供する。
//!
//! `code` は HTTP ステータスラインとは独立したドメインコードで、
//! 既存クライアントが JSON の `code` だけを見て分岐するケースに対応するため
//! HTTP ステータスと重複していても必ず出力する。

use serde::{Deserialize, Serialize};

/// 成功時の既定メッセージ
pub const SUCCESS_MESSAGE: &str = "success";

/// 公開 API の統一レスポンス型
///
/// すべてのエンドポイント（`204 No Content` を除く）はこの形式でレスポンスを返す。
/// 失敗時は `data` が `null` になる。
///
/// ## 使用例
///
/// ```
/// use todo_shared::ApiResponse;
///
/// let response = ApiResponse::ok("hello");
/// assert_eq!(response.code, 200);
/// assert_eq!(response.data, Some("hello"));
///
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiResponse<T> {
    /// ドメインコード（200 / 400 / 404 / 500）
    pub code: u16,
    /// 人間可読なメッセージ
    pub msg:  String,
    /// ペイロード（失敗時は `null`）
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 任意のコード・メッセージ・データから `ApiResponse` を作成する
    pub fn new(code: u16, msg: impl Into<String>, data: Option<T>) -> Self {
        Self {
            code,
            msg: msg.into(),
            data,
        }
    }

    /// 200 成功レスポンスを作成する
    pub fn ok(data: T) -> Self {
        Self::new(200, SUCCESS_MESSAGE, Some(data))
    }
}

/// エラー時のレスポンス型
///
/// [`ApiResponse`] と同じ形状で、`data` は常に `null` になる。
///
/// ```
/// use todo_shared::ErrorResponse;
///
/// let error = ErrorResponse::new(404, "Not Found");
/// assert_eq!(error.code, 404);
/// assert!(error.data.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// ドメインコード（400 / 404 / 500）
    pub code: u16,
    /// 人間可読なメッセージ
    pub msg:  String,
    /// 常に `null`
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(code: u16, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}


#[cfg(all(test, feature = "openapi"))]
mod openapi_tests {
    use utoipa::PartialSchema;

    use super::*;

    #[test]
    fn test_api_response_stringにtoschemaが実装されている() {
        let schema = ApiResponse::<String>::schema();
        let utoipa::openapi::RefOr::T(schema) = schema else {
            panic!("expected inline schema, got ref");
        };
        let utoipa::openapi::Schema::Object(obj) = schema else {
            panic!("expected object schema");
        };
        assert!(obj.properties.contains_key("code"));
        assert!(obj.properties.contains_key("msg"));
        assert!(obj.properties.contains_key("data"));
    }
}
