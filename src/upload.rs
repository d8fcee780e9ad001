//! 表单上传处理器：解析 multipart 并写入存储目录。

use axum::extract::multipart::Field;
use axum::extract::{Extension, Multipart};
use axum::response::Redirect;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::{error, info};

use crate::error::ApiError;
use crate::http::redirect_to_manager;
use crate::storage::{Storage, StorageError};

/// 上传表单中文件字段的名称。
pub const UPLOAD_FIELD: &str = "uploadFile";

/// 接收单文件上传，成功后重定向到管理页。
///
/// 同名文件会被直接覆盖；写入中途失败时已写入的部分会保留在磁盘上。
pub async fn upload_file(
    Extension(storage): Extension<Arc<Storage>>,
    mut multipart: Multipart,
) -> Result<Redirect, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::BadRequest(format!("error retrieving file: {err}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        if file_name.is_empty() {
            return Err(ApiError::BadRequest(
                "error retrieving file: empty file name".into(),
            ));
        }

        let written = save_field(&storage, &file_name, field).await?;
        info!(name = file_name, bytes = written, "upload complete");
        return redirect_to_manager("uploaded", &file_name);
    }

    Err(ApiError::BadRequest(format!(
        "error retrieving file: missing file field {UPLOAD_FIELD}"
    )))
}

/// 将字段内容逐块写入目标文件，返回写入的字节数。
async fn save_field(
    storage: &Storage,
    file_name: &str,
    mut field: Field<'_>,
) -> Result<u64, ApiError> {
    let mut file = storage
        .create_file(file_name)
        .await
        .map_err(|err| match err {
            StorageError::Io(err) => {
                error!(name = file_name, error = %err, "failed to create upload target");
                ApiError::Internal("failed to create file on server".into())
            }
            other => other.into(),
        })?;

    let mut total_written: u64 = 0;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|err| ApiError::BadRequest(format!("error reading file: {err}")))?
    {
        if chunk.is_empty() {
            continue;
        }
        file.write_all(&chunk).await.map_err(|err| {
            error!(name = file_name, error = %err, "failed to write upload");
            ApiError::Internal("failed to write file to disk".into())
        })?;
        total_written += chunk.len() as u64;
    }
    file.flush().await.map_err(|err| {
        error!(name = file_name, error = %err, "failed to flush upload");
        ApiError::Internal("failed to write file to disk".into())
    })?;

    Ok(total_written)
}
