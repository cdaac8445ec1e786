/// Describes the local file offered for upload, shown in the resource panel
#[derive(Debug, Clone, PartialEq)]
pub struct ResourcePreview {
    pub name: String,
    pub path: String,
    pub size_bytes: u64,
    pub size: String,
    pub media_type: String,
}

impl ResourcePreview {
    pub fn init(name: String, path: &str, size_bytes: u64, size: String, media_type: &str) -> ResourcePreview {
        ResourcePreview {
            name,
            path: String::from(path),
            size_bytes,
            size,
            media_type: String::from(media_type),
        }
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }

    pub fn to_lines(&self) -> Vec<(String, String)> {
        vec![
            ("Name".to_string(), self.name.clone()),
            ("Path".to_string(), self.path.clone()),
            ("Size".to_string(), self.size.clone()),
            ("Type".to_string(), self.media_type.clone()),
        ]
    }
}

/// Guesses a MIME type from a file extension
pub fn media_type_for(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "txt" => "text/plain",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
