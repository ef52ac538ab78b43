use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::error::PersistenceError;
use super::link::LinkDescriptor;
use super::look_at::LookAtDescriptor;

/// Owns the descriptor directory and replaces files atomically so a
/// polling reader never observes a half-written document.
#[derive(Debug, Clone)]
pub struct DescriptorStore {
    directory: PathBuf,
    view_file_name: String,
    link_file_name: String,
}

impl DescriptorStore {
    pub fn new(directory: PathBuf, view_file_name: String, link_file_name: String) -> Self {
        Self {
            directory,
            view_file_name,
            link_file_name,
        }
    }

    pub fn view_file_name(&self) -> &str {
        &self.view_file_name
    }

    pub fn view_path(&self) -> PathBuf {
        self.directory.join(&self.view_file_name)
    }

    pub fn link_path(&self) -> PathBuf {
        self.directory.join(&self.link_file_name)
    }

    pub async fn write_view(&self, view: &LookAtDescriptor) -> Result<(), PersistenceError> {
        self.replace(&self.view_path(), &view.to_kml()?).await
    }

    pub async fn write_link(&self, link: &LinkDescriptor) -> Result<(), PersistenceError> {
        self.replace(&self.link_path(), &link.to_kml()?).await
    }

    /// Returns whether a file was actually removed.
    pub async fn remove_view(&self) -> Result<bool, PersistenceError> {
        remove_if_present(&self.view_path()).await
    }

    pub async fn remove_link(&self) -> Result<bool, PersistenceError> {
        remove_if_present(&self.link_path()).await
    }

    pub async fn read_view(&self) -> Result<Option<String>, PersistenceError> {
        let path = self.view_path();
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistenceError::Read { path, source }),
        }
    }

    async fn replace(&self, path: &Path, content: &str) -> Result<(), PersistenceError> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|source| PersistenceError::CreateDir {
                path: self.directory.clone(),
                source,
            })?;

        let temp_path = path.with_extension("kml.tmp");
        if let Err(source) = tokio::fs::write(&temp_path, content).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(PersistenceError::Write {
                path: temp_path,
                source,
            });
        }

        tokio::fs::rename(&temp_path, path)
            .await
            .map_err(|source| PersistenceError::Replace {
                path: path.to_path_buf(),
                source,
            })
    }
}

async fn remove_if_present(path: &Path) -> Result<bool, PersistenceError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(PersistenceError::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}
