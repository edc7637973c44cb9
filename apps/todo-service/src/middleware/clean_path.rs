//! # パスの正規化
//!
//! ルーティング前に URL パスを整える。
//!
//! - 連続したスラッシュを 1 つにまとめる（`/api//v1` → `/api/v1`）
//! - `.` セグメントを取り除き、`..` は直前のセグメントを打ち消す
//!
//! ルーティングより前に適用する必要があるため、`Router::layer` ではなく
//! `tower::util::MapRequestLayer` で Router 全体を包む（[`crate::router::into_service`]）。

use axum::{
    extract::Request,
    http::uri::{PathAndQuery, Uri},
};

/// リクエストの URL パスを正規化する
///
/// クエリ文字列は保持する。正規化後の URI が組み立てられない場合は元のリクエストをそのまま返す。
pub fn clean_path(mut request: Request) -> Request {
    let cleaned = normalize(request.uri().path());
    if cleaned == request.uri().path() {
        return request;
    }

    let target = match request.uri().query() {
        Some(query) => format!("{cleaned}?{query}"),
        None => cleaned,
    };
    let Ok(path_and_query) = PathAndQuery::try_from(target) else {
        return request;
    };

    let mut parts = request.uri().clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    if let Ok(uri) = Uri::from_parts(parts) {
        *request.uri_mut() = uri;
    }
    request
}

fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut cleaned = format!("/{}", segments.join("/"));
    // 末尾スラッシュの扱いは NormalizePathLayer に任せる
    if path.ends_with('/') && cleaned.len() > 1 {
        cleaned.push('/');
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::変更なし("/api/v1/todos", "/api/v1/todos")]
    #[case::ルート("/", "/")]
    #[case::連続したスラッシュ("/api//v1///todos", "/api/v1/todos")]
    #[case::カレントディレクトリ("/api/./v1/todos", "/api/v1/todos")]
    #[case::親ディレクトリ("/api/v1/x/../todos", "/api/v1/todos")]
    #[case::ルートより上には戻らない("/../../health", "/health")]
    #[case::末尾スラッシュは残す("/api//v1/todos/", "/api/v1/todos/")]
    fn test_パスを正規化する(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input), expected);
    }

    #[test]
    fn test_クエリ文字列を保持する() {
        let request = Request::builder()
            .uri("/api//v1/todos?limit=10")
            .body(Body::empty())
            .unwrap();

        let cleaned = clean_path(request);

        assert_eq!(cleaned.uri().path(), "/api/v1/todos");
        assert_eq!(cleaned.uri().query(), Some("limit=10"));
    }
}
