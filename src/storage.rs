use chrono::{DateTime, Local};
use std::cmp::Ordering;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tokio::fs::{self, File};
use tokio::io::ErrorKind;

#[derive(Clone, Debug)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Creates the storage root (mode 0755 on unix) when it is missing.
    pub async fn ensure_root(&self) -> io::Result<()> {
        if fs::try_exists(&self.root).await? {
            return Ok(());
        }
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(0o755);
        builder.create(&self.root).await
    }

    pub fn root_path(&self) -> &Path {
        &self.root
    }

    /// Maps a client supplied file name onto a path directly under the root.
    pub fn resolve_file(&self, name: &str) -> Result<PathBuf, StorageError> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(segment)), None) if !name.contains(['/', '\\']) => {
                Ok(self.root.join(segment))
            }
            _ => Err(StorageError::InvalidName),
        }
    }

    pub async fn list_files(&self) -> Result<Vec<StoredFile>, StorageError> {
        let mut dir = fs::read_dir(&self.root).await?;
        let mut files = Vec::new();

        while let Some(entry) = dir.next_entry().await? {
            let metadata = entry.metadata().await?;
            if metadata.is_dir() {
                continue;
            }
            files.push(StoredFile {
                name: entry.file_name().to_string_lossy().to_string(),
                size: metadata.len(),
                modified: metadata.modified().ok(),
            });
        }

        files.sort_by(|a, b| match a.name.to_lowercase().cmp(&b.name.to_lowercase()) {
            Ordering::Equal => a.name.cmp(&b.name),
            other => other,
        });

        Ok(files)
    }

    /// Creates the named file, truncating any previous content.
    pub async fn create_file(&self, name: &str) -> Result<File, StorageError> {
        let target = self.resolve_file(name)?;
        Ok(File::create(target).await?)
    }

    pub async fn remove_file(&self, name: &str) -> Result<(), StorageError> {
        let target = self.resolve_file(name)?;
        let metadata = match fs::metadata(&target).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == ErrorKind::NotFound => return Err(StorageError::NotFound),
            Err(err) => return Err(StorageError::Io(err)),
        };
        if metadata.is_dir() {
            return Err(StorageError::NotFound);
        }
        fs::remove_file(target).await?;
        Ok(())
    }
}

#[derive(Debug)]
pub enum StorageError {
    InvalidName,
    NotFound,
    Io(io::Error),
}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        StorageError::Io(err)
    }
}

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub name: String,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

impl StoredFile {
    pub fn modified_display(&self) -> Option<String> {
        self.modified.map(|ts| {
            let datetime: DateTime<Local> = ts.into();
            datetime.format("%Y-%m-%d %H:%M:%S").to_string()
        })
    }
}
