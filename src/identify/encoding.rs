//! 識別用画像のエンコード
//!
//! HTTPリクエストの `imageBase64`（Data URLまたは生Base64）と、
//! CLIで指定された画像ファイルの両方を Data URL に揃える。

use crate::error::{ReefIdError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;

const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Base64エンコード済みの画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: String,
    pub base64: String,
}

impl EncodedImage {
    /// `imageBase64` フィールドの値から生成する
    pub fn from_request(image_base64: &str) -> Result<Self> {
        let input = image_base64.trim();
        if input.is_empty() {
            return Err(ReefIdError::InvalidImage("画像データが空です".into()));
        }

        let (mime_type, payload) = if input.starts_with("data:") {
            if !input.split(',').next().unwrap_or("").contains(";base64") {
                return Err(ReefIdError::InvalidImage("Base64形式のData URLではありません".into()));
            }
            let payload = extract_base64_from_data_url(input)
                .ok_or_else(|| ReefIdError::InvalidImage("Data URLに画像データがありません".into()))?;
            (extract_mime_type_from_data_url(input), payload)
        } else {
            (DEFAULT_MIME_TYPE, input)
        };

        if !mime_type.starts_with("image/") {
            return Err(ReefIdError::InvalidImage(format!("画像ではありません: {}", mime_type)));
        }

        let decoded = STANDARD
            .decode(payload)
            .map_err(|e| ReefIdError::InvalidImage(format!("Base64デコードエラー: {}", e)))?;
        if decoded.is_empty() {
            return Err(ReefIdError::InvalidImage("画像データが空です".into()));
        }

        Ok(Self {
            mime_type: mime_type.to_string(),
            base64: payload.to_string(),
        })
    }

    /// 画像バイト列を長辺 `max_size` 以下に縮小し、JPEGで再エンコードする
    pub fn from_bytes(bytes: &[u8], max_size: u32) -> Result<Self> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| ReefIdError::ImageLoad(format!("デコードエラー: {}", e)))?;

        let img = if max_size > 0 && (img.width() > max_size || img.height() > max_size) {
            img.resize(max_size, max_size, FilterType::Triangle)
        } else {
            img
        };

        // JPEGはアルファチャンネル非対応
        let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
        let mut buffer = Vec::new();
        rgb.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
            .map_err(|e| ReefIdError::ImageLoad(format!("JPEGエンコードエラー: {}", e)))?;

        Ok(Self {
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            base64: STANDARD.encode(&buffer),
        })
    }

    pub fn from_path(path: &Path, max_size: u32) -> Result<Self> {
        if !path.exists() {
            return Err(ReefIdError::FileNotFound(path.display().to_string()));
        }
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes, max_size)
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}

/// Data URLからBase64データ部分を抽出
///
/// # Arguments
/// * `data_url` - "data:image/jpeg;base64,/9j/4AAQ..." 形式のData URL
pub fn extract_base64_from_data_url(data_url: &str) -> Option<&str> {
    data_url.split_once(',').map(|(_, data)| data).filter(|d| !d.is_empty())
}

/// Data URLからMIMEタイプを抽出（取れなければ image/jpeg）
pub fn extract_mime_type_from_data_url(data_url: &str) -> &str {
    data_url
        .strip_prefix("data:")
        .and_then(|s| s.split(|c: char| c == ';' || c == ',').next())
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_MIME_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([0, 120, 200, 255]));
        let mut buffer = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn test_extract_from_data_url() {
        let url = "data:image/png;base64,iVBORw0KGgo=";
        assert_eq!(extract_base64_from_data_url(url), Some("iVBORw0KGgo="));
        assert_eq!(extract_mime_type_from_data_url(url), "image/png");
    }

    #[test]
    fn test_extract_mime_type_fallback() {
        assert_eq!(extract_mime_type_from_data_url("AAAA"), "image/jpeg");
        assert_eq!(extract_mime_type_from_data_url("data:;base64,AAAA"), "image/jpeg");
    }

    #[test]
    fn test_from_request_data_url() {
        let image = EncodedImage::from_request("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.to_data_url(), "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn test_from_request_bare_base64() {
        let image = EncodedImage::from_request("  /9j/4AAQ  ").unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.base64, "/9j/4AAQ");
    }

    #[test]
    fn test_from_request_rejects_invalid() {
        assert!(matches!(EncodedImage::from_request(""), Err(ReefIdError::InvalidImage(_))));
        assert!(matches!(EncodedImage::from_request("not base64!!"), Err(ReefIdError::InvalidImage(_))));
        assert!(matches!(
            EncodedImage::from_request("data:text/plain;base64,aGVsbG8="),
            Err(ReefIdError::InvalidImage(_))
        ));
        assert!(matches!(
            EncodedImage::from_request("data:image/png,rawdata"),
            Err(ReefIdError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_from_bytes_downscales() {
        let encoded = EncodedImage::from_bytes(&png_bytes(400, 200), 100).unwrap();
        assert_eq!(encoded.mime_type, "image/jpeg");

        let decoded = STANDARD.decode(&encoded.base64).unwrap();
        let img = image::load_from_memory(&decoded).unwrap();
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
    }

    #[test]
    fn test_from_bytes_keeps_small_images() {
        let encoded = EncodedImage::from_bytes(&png_bytes(40, 30), 100).unwrap();
        let decoded = STANDARD.decode(&encoded.base64).unwrap();
        let img = image::load_from_memory(&decoded).unwrap();
        assert_eq!((img.width(), img.height()), (40, 30));
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(matches!(
            EncodedImage::from_bytes(b"definitely not an image", 100),
            Err(ReefIdError::ImageLoad(_))
        ));
    }
}
