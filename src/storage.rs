use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use image::ImageFormat;

/// An image received from a client, fully buffered.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Raster formats accepted for listing photos. Anything that can carry
/// script when served (HTML, SVG) is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageKind {
    /// Detect the format from the leading bytes. The declared content type
    /// and the client filename are ignored.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes).ok()? {
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Gif => Some(Self::Gif),
            ImageFormat::WebP => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }
}

/// Object key for a validated upload: a fresh prefix, the cleaned client
/// stem, and the extension of the detected format.
pub fn object_key(prefix: &str, filename: &str, kind: ImageKind) -> String {
    let cleaned = sanitize_filename(filename);
    let stem = std::path::Path::new(&cleaned)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("image");
    format!("{prefix}-{stem}.{}", kind.extension())
}

/// Binary object storage. Returns an opaque locator for the stored object.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<String, String>;
}

/// Writes objects under a local directory that the router serves at `/uploads`.
pub struct DiskImageStore {
    root: PathBuf,
    public_base: String,
}

impl DiskImageStore {
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base: format!("{}/uploads", base_url.trim_end_matches('/')),
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[async_trait]
impl ImageStore for DiskImageStore {
    async fn put(&self, key: &str, body: Bytes, _content_type: &str) -> Result<String, String> {
        if key.is_empty() || key.contains('/') || key.contains("..") {
            return Err(format!("Refusing to store object under key '{key}'"));
        }

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| format!("Failed to create upload dir: {e}"))?;
        tokio::fs::write(self.root.join(key), &body)
            .await
            .map_err(|e| format!("Failed to write object: {e}"))?;

        Ok(format!("{}/{key}", self.public_base))
    }
}

/// Keep ASCII alphanumerics, dots, dashes and underscores from a client filename.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_matches('.').replace("..", "_");
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}
