//! Filesystem storage for uploaded assets (the profile photo).

use std::error::Error as StdError;
use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use futures::{StreamExt, pin_mut};
use thiserror::Error;
use tokio::{fs, io::AsyncWriteExt};
use tracing::warn;
use uuid::Uuid;

pub const PROFILE_PHOTO_STEM: &str = "profile";

#[derive(Debug, Error)]
pub enum UploadStorageError {
    #[error("invalid stored path")]
    InvalidPath,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("uploaded file exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: u64 },
    #[error("uploaded file stream failed")]
    PayloadStream {
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    #[error("uploaded file is empty")]
    EmptyPayload,
}

/// Result of storing an upload payload.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub file_name: String,
    pub size_bytes: u64,
}

/// Flat directory of uploaded files served under `/api/uploads/{file}`.
#[derive(Debug)]
pub struct UploadStorage {
    root: PathBuf,
    max_bytes: u64,
}

impl UploadStorage {
    /// Initialise storage rooted at the provided directory, creating it if necessary.
    pub fn new(root: PathBuf, max_bytes: u64) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root, max_bytes })
    }

    /// Store the profile photo as `profile.<extension>`, replacing any
    /// previous `profile.*` file.
    ///
    /// The payload is streamed into a temporary file and renamed once
    /// complete, so a failed upload leaves the previous photo in place.
    pub async fn store_profile_photo<S>(
        &self,
        extension: &str,
        stream: S,
    ) -> Result<StoredUpload, UploadStorageError>
    where
        S: futures::Stream<Item = Result<Bytes, UploadStorageError>>,
    {
        let file_name = format!("{PROFILE_PHOTO_STEM}.{extension}");
        let target = self.resolve(&file_name)?;
        let staging = self.resolve(&format!(".{PROFILE_PHOTO_STEM}-{}.tmp", Uuid::new_v4()))?;

        let size_bytes = match self.write_stream(&staging, stream).await {
            Ok(size) => size,
            Err(err) => {
                let _ = fs::remove_file(&staging).await;
                return Err(err);
            }
        };

        self.remove_profile_photos_except(&file_name).await?;
        fs::rename(&staging, &target).await?;

        Ok(StoredUpload {
            file_name,
            size_bytes,
        })
    }

    #[cfg(test)]
    async fn store_profile_photo_bytes(
        &self,
        extension: &str,
        data: Bytes,
    ) -> Result<StoredUpload, UploadStorageError> {
        let stream = futures::stream::once(async move { Ok::<_, UploadStorageError>(data) });
        self.store_profile_photo(extension, stream).await
    }

    /// Read a stored file into memory. Hidden names (staging files) are
    /// never served.
    pub async fn read(&self, file_name: &str) -> Result<Bytes, UploadStorageError> {
        if file_name.starts_with('.') {
            return Err(UploadStorageError::InvalidPath);
        }
        let absolute = self.resolve(file_name)?;
        let data = fs::read(absolute).await?;
        Ok(Bytes::from(data))
    }

    async fn write_stream<S>(&self, path: &Path, stream: S) -> Result<u64, UploadStorageError>
    where
        S: futures::Stream<Item = Result<Bytes, UploadStorageError>>,
    {
        let mut file = fs::File::create(path).await?;
        let mut total_bytes: u64 = 0;

        pin_mut!(stream);
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if chunk.is_empty() {
                continue;
            }

            total_bytes = total_bytes.saturating_add(chunk.len() as u64);
            if total_bytes > self.max_bytes {
                return Err(UploadStorageError::PayloadTooLarge {
                    limit: self.max_bytes,
                });
            }
            file.write_all(&chunk).await?;
        }

        file.flush().await?;

        if total_bytes == 0 {
            return Err(UploadStorageError::EmptyPayload);
        }
        Ok(total_bytes)
    }

    async fn remove_profile_photos_except(&self, keep: &str) -> Result<(), UploadStorageError> {
        let prefix = format!("{PROFILE_PHOTO_STEM}.");
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.starts_with(&prefix) && name != keep {
                if let Err(err) = fs::remove_file(entry.path()).await {
                    warn!(
                        target = "folio::uploads",
                        file = name,
                        error = %err,
                        "failed to remove previous profile photo"
                    );
                }
            }
        }
        Ok(())
    }

    /// Resolve a stored file name to an absolute path inside the root.
    fn resolve(&self, file_name: &str) -> Result<PathBuf, UploadStorageError> {
        let relative = Path::new(file_name);
        if file_name.is_empty()
            || relative.is_absolute()
            || relative.components().any(|component| {
                matches!(
                    component,
                    Component::ParentDir | Component::Prefix(_) | Component::RootDir
                )
            })
        {
            return Err(UploadStorageError::InvalidPath);
        }

        Ok(self.root.join(relative))
    }
}
