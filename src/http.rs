//! HTTP 辅助工具：安全头、方法限制与状态重定向。

use axum::body::Body as AxumBody;
use axum::http::{HeaderValue, Request, StatusCode};
use axum::response::Redirect;
use axum::{middleware, response::Response};

use crate::error::ApiError;

/// 管理页面路径，上传与删除成功后重定向到此处。
pub const MANAGER_PATH: &str = "/manager";

/// 仅允许 POST 的路由使用的方法回退处理器。
pub async fn post_only() -> ApiError {
    ApiError::MethodNotAllowed("POST")
}

/// 构造带一次性状态消息的管理页重定向（303 See Other）。
pub fn redirect_to_manager(status_key: &str, file_name: &str) -> Result<Redirect, ApiError> {
    let query = serde_urlencoded::to_string([(status_key, file_name)])
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    Ok(Redirect::to(&format!("{MANAGER_PATH}?{query}")))
}

/// 添加基础安全响应头。
pub async fn add_security_headers(
    request: Request<AxumBody>,
    next: middleware::Next,
) -> Result<Response, StatusCode> {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        axum::http::header::X_FRAME_OPTIONS,
        HeaderValue::from_static("DENY"),
    );
    headers.insert(
        axum::http::header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    Ok(response)
}
