//! # リクエストボディのバインドと検証
//!
//! JSON ボディを目的の型にデコードし、`validator` による構造検証を行う。
//!
//! - デコード失敗（JSON 構文エラー、必須フィールド欠落、列挙値外のステータス）→ 400
//! - 検証失敗（空タイトル、文字数超過）→ 400
//! - ボディが axum の既定上限（2 MB）を超える → 413
//!
//! `Content-Type` ヘッダーは要求しない。ボディが JSON として解釈できれば受け付ける。
//!
//! パスの ID は [`TodoIdPath`] がボディより先に解釈するため、
//! ID とボディの両方が不正な場合も ID のエラーとして 400 を返す。

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request, rejection::BytesRejection},
    http::{StatusCode, request::Parts},
};
use serde::de::DeserializeOwned;
use todo_domain::todo::TodoId;
use validator::Validate;

use crate::error::TodoServiceError;

/// ボディをデコードし、検証済みの値を返す
pub fn bind_and_validate<T>(body: &[u8]) -> Result<T, TodoServiceError>
where
    T: DeserializeOwned + Validate,
{
    let value: T = serde_json::from_slice(body)
        .map_err(|e| TodoServiceError::BadRequest(format!("リクエストボディが不正です: {e}")))?;

    value
        .validate()
        .map_err(|e| TodoServiceError::BadRequest(format!("入力値が不正です: {e}")))?;

    Ok(value)
}

/// [`bind_and_validate`] を通したボディを受け取る extractor
///
/// ```rust,ignore
/// async fn create_todo(ValidatedJson(form): ValidatedJson<TodoForm>) { /* ... */ }
/// ```
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = TodoServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(body_rejection)?;

        bind_and_validate(&body).map(Self)
    }
}

fn body_rejection(rejection: BytesRejection) -> TodoServiceError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        TodoServiceError::PayloadTooLarge(rejection.body_text())
    } else {
        TodoServiceError::BadRequest(rejection.body_text())
    }
}

/// パスパラメータ `{id}` を [`TodoId`] として受け取る extractor
///
/// 数値として解釈できない場合は 400。
#[derive(Debug, Clone, Copy)]
pub struct TodoIdPath(pub TodoId);

impl<S> FromRequestParts<S> for TodoIdPath
where
    S: Send + Sync,
{
    type Rejection = TodoServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| TodoServiceError::BadRequest(e.body_text()))?;

        Ok(Self(raw.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, Validate, PartialEq)]
    struct Form {
        #[validate(length(min = 1, max = 5))]
        name: String,
    }

    #[test]
    fn test_正しいボディはデコードされる() {
        let form: Form = bind_and_validate(br#"{"name":"abc"}"#).unwrap();

        assert_eq!(form, Form { name: "abc".to_string() });
    }

    #[rstest]
    #[case::json構文エラー(br#"{"name":"#.as_slice())]
    #[case::必須フィールド欠落(br#"{}"#.as_slice())]
    #[case::型不一致(br#"{"name":1}"#.as_slice())]
    #[case::空ボディ(b"".as_slice())]
    #[case::空文字列(br#"{"name":""}"#.as_slice())]
    #[case::文字数超過(br#"{"name":"abcdef"}"#.as_slice())]
    fn test_不正なボディはbad_requestになる(#[case] body: &[u8]) {
        let result = bind_and_validate::<Form>(body);

        assert!(matches!(result, Err(TodoServiceError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_content_typeなしでも抽出できる() {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(r#"{"name":"abc"}"#))
            .unwrap();

        let ValidatedJson(form) = ValidatedJson::<Form>::from_request(req, &()).await.unwrap();

        assert_eq!(form.name, "abc");
    }

    #[tokio::test]
    async fn test_上限を超えるボディはpayload_too_largeになる() {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(vec![b' '; 3 * 1024 * 1024]))
            .unwrap();

        let result = ValidatedJson::<Form>::from_request(req, &()).await;

        assert!(matches!(result, Err(TodoServiceError::PayloadTooLarge(_))));
    }
}
