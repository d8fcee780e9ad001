//! 文件管理页与删除处理器。

use askama::Template;
use axum::extract::{Extension, Path, Query};
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::error::ApiError;
use crate::format::format_file_size;
use crate::http::redirect_to_manager;
use crate::storage::{Storage, StorageError, StoredFile};

#[derive(Deserialize, Default)]
pub(crate) struct StatusQuery {
    uploaded: Option<String>,
    deleted: Option<String>,
}

/// 管理页中的一行。
pub struct ListingEntry {
    pub name: String,
    pub size: String,
    pub modified: String,
}

impl From<&StoredFile> for ListingEntry {
    fn from(file: &StoredFile) -> Self {
        Self {
            name: file.name.clone(),
            size: format_file_size(file.size),
            modified: file.modified_display().unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "manager.html")]
struct ManagerPage {
    files: Vec<ListingEntry>,
    uploaded: String,
    deleted: String,
}

/// 渲染文件管理页。
pub async fn show_manager(
    Query(query): Query<StatusQuery>,
    Extension(storage): Extension<Arc<Storage>>,
) -> Result<Response, ApiError> {
    let stored = storage.list_files().await.map_err(|err| {
        error!(error = ?err, "failed to read upload directory");
        ApiError::Internal("failed to read upload directory".into())
    })?;
    debug!(count = stored.len(), "list files");

    let page = ManagerPage {
        files: stored.iter().map(ListingEntry::from).collect(),
        uploaded: query.uploaded.unwrap_or_default(),
        deleted: query.deleted.unwrap_or_default(),
    };
    let html = page.render().map_err(|err| {
        error!(error = %err, "failed to render manager template");
        ApiError::Internal("failed to render manager page".into())
    })?;

    Ok((
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        )],
        html,
    )
        .into_response())
}

/// 删除指定文件后重定向回管理页。
pub async fn delete_file(
    Path(file_name): Path<String>,
    Extension(storage): Extension<Arc<Storage>>,
) -> Result<Redirect, ApiError> {
    if file_name.is_empty() {
        return Err(missing_file_name());
    }
    storage.remove_file(&file_name).await.map_err(|err| {
        if let StorageError::Io(io_err) = &err {
            error!(name = file_name, error = %io_err, "failed to delete file");
            return ApiError::Internal("failed to delete file".into());
        }
        ApiError::from(err)
    })?;
    info!(name = file_name, "delete file");
    redirect_to_manager("deleted", &file_name)
}

/// `/delete/` 未携带文件名时的处理器。
pub async fn delete_without_name() -> ApiError {
    missing_file_name()
}

fn missing_file_name() -> ApiError {
    ApiError::BadRequest("file name not specified".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_storage() -> (tempfile::TempDir, Arc<Storage>) {
        let temp = tempdir().expect("tempdir");
        let root = temp.path().join("uploads");
        std::fs::create_dir_all(&root).expect("create storage root");
        (temp, Arc::new(Storage::new(root)))
    }

    async fn render_manager(storage: Arc<Storage>, query: StatusQuery) -> String {
        let response = show_manager(Query(query), Extension(storage))
            .await
            .unwrap_or_else(|_| panic!("manager failed"));
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        String::from_utf8(body.to_vec()).expect("utf8 body")
    }

    #[tokio::test]
    async fn manager_lists_files_with_formatted_sizes() {
        let (_temp, storage) = make_storage();
        std::fs::write(storage.root_path().join("big.bin"), vec![0u8; 2048]).expect("write");
        std::fs::create_dir(storage.root_path().join("nested")).expect("mkdir");

        let html = render_manager(storage, StatusQuery::default()).await;
        assert!(html.contains("big.bin"));
        assert!(html.contains("2.0 KB"));
        assert!(!html.contains("nested"));
    }

    #[tokio::test]
    async fn manager_renders_status_notices_escaped() {
        let (_temp, storage) = make_storage();
        let html = render_manager(
            storage,
            StatusQuery {
                uploaded: Some("<b>x</b>.txt".into()),
                deleted: Some("old.txt".into()),
            },
        )
        .await;
        assert!(html.contains("&lt;b&gt;x"));
        assert!(!html.contains("<b>x</b>"));
        assert!(html.contains("old.txt"));
    }

    #[tokio::test]
    async fn manager_fails_when_directory_is_unreadable() {
        let temp = tempdir().expect("tempdir");
        let storage = Arc::new(Storage::new(temp.path().join("missing")));
        let result = show_manager(Query(StatusQuery::default()), Extension(storage)).await;
        assert!(matches!(result, Err(ApiError::Internal(_))));
    }

    #[tokio::test]
    async fn delete_missing_file_returns_not_found() {
        let (_temp, storage) = make_storage();
        let result = delete_file(Path("ghost.txt".into()), Extension(storage)).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_rejects_empty_and_traversal_names() {
        let (temp, storage) = make_storage();
        std::fs::write(temp.path().join("secret.txt"), b"keep").expect("write outside");

        let result = delete_file(Path(String::new()), Extension(storage.clone())).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));

        let result = delete_file(Path("../secret.txt".into()), Extension(storage)).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
        assert!(temp.path().join("secret.txt").exists());
    }

    #[tokio::test]
    async fn delete_removes_file() {
        let (_temp, storage) = make_storage();
        let target = storage.root_path().join("a.txt");
        std::fs::write(&target, b"abc").expect("write");

        delete_file(Path("a.txt".into()), Extension(storage))
            .await
            .unwrap_or_else(|_| panic!("delete failed"));
        assert!(!target.exists());
    }
}
