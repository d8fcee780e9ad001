//! 路由表：把路径映射到处理器，并挂载静态资源与下载目录。

use axum::extract::{DefaultBodyLimit, Extension, connect_info::ConnectInfo};
use axum::http::Request;
use axum::routing::{any, post};
use axum::{Router, middleware};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, info_span};

use crate::files;
use crate::http::{self, MANAGER_PATH};
use crate::storage::Storage;
use crate::upload;

/// 构建路由所需的配置。
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub static_dir: PathBuf,
    pub upload_max_size: usize,
}

/// 构建完整的应用路由。
pub fn build_router(storage: Arc<Storage>, config: &AppConfig) -> Router {
    let downloads = ServeDir::new(storage.root_path());
    let assets = ServeDir::new(&config.static_dir);

    Router::new()
        .route(
            "/upload",
            post(upload::upload_file)
                .fallback(http::post_only)
                .layer(DefaultBodyLimit::max(config.upload_max_size)),
        )
        .route(MANAGER_PATH, any(files::show_manager))
        .route(
            "/delete",
            post(files::delete_without_name).fallback(http::post_only),
        )
        .route(
            "/delete/",
            post(files::delete_without_name).fallback(http::post_only),
        )
        .route(
            "/delete/{name}",
            post(files::delete_file).fallback(http::post_only),
        )
        .nest_service("/files", downloads)
        .fallback_service(assets)
        .layer(middleware::from_fn(http::add_security_headers))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let client_ip = request
                        .extensions()
                        .get::<ConnectInfo<SocketAddr>>()
                        .map(|ConnectInfo(addr)| addr.ip().to_string())
                        .unwrap_or_else(|| "unknown".to_string());

                    info_span!(
                        env!("CARGO_CRATE_NAME"),
                        client_ip,
                        method = ?request.method(),
                        path = ?request.uri().path(),
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .layer(Extension(storage))
}
