use std::path::Path;
use color_eyre::{eyre, Result};
use humansize::{FileSize, file_size_opts as options};
use tokio::fs;
use crate::model::resource_preview::{media_type_for, ResourcePreview};

/// Reads metadata of the file offered for upload
#[derive(Clone, Default)]
pub struct ResourceLoader;

impl ResourceLoader {
    pub fn new() -> Self {
        ResourceLoader
    }

    pub async fn load(&self, path: &Path) -> Result<ResourcePreview> {
        let metadata = fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(eyre::eyre!("{} is not a regular file", path.display()));
        }

        let name = path.file_name().unwrap_or_default().to_string_lossy().into_owned();
        let extension_cow = path.extension()
            .unwrap_or_default()
            .to_string_lossy();
        let path_cow = path.to_string_lossy();
        let size_bytes = metadata.len();
        let size = size_bytes.file_size(options::CONVENTIONAL).unwrap_or_else(|_| "0 B".to_string());

        Ok(ResourcePreview::init(name, path_cow.as_ref(), size_bytes, size, media_type_for(extension_cow.as_ref())))
    }
}
