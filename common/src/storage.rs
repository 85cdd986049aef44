//! 画像URLの命名規則
//!
//! オブジェクトストレージ上の画像は `{base}/{bucket}/{id}.{ext}` で公開されている。

use crate::types::RecordId;

pub const DEFAULT_IMAGE_EXTENSION: &str = "png";

/// 公開バケットの画像URLを組み立てる
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageStore {
    base_url: String,
    bucket: String,
    extension: String,
}

impl ImageStore {
    pub fn new(
        base_url: impl Into<String>,
        bucket: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        let bucket: String = bucket.into();
        let extension: String = extension.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.trim_matches('/').to_string(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn image_url(&self, id: &RecordId) -> String {
        format!("{}/{}/{}.{}", self.base_url, self.bucket, id, self.extension)
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url() {
        let store = ImageStore::new("https://cdn.example.com/storage/v1/object/public", "fish-images", "png");
        assert_eq!(
            store.image_url(&RecordId::Int(7)),
            "https://cdn.example.com/storage/v1/object/public/fish-images/7.png"
        );
    }

    #[test]
    fn test_image_url_normalizes_separators() {
        let store = ImageStore::new("https://cdn.example.com/", "/fish-images/", ".jpg");
        assert_eq!(
            store.image_url(&RecordId::from("manta-ray")),
            "https://cdn.example.com/fish-images/manta-ray.jpg"
        );
        assert_eq!(store.extension(), "jpg");
    }
}
