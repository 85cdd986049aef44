use crate::error::{ReefIdError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// 画像ファイル、またはフォルダ直下の画像を列挙する
pub fn scan_images(target: &Path) -> Result<Vec<ImageInfo>> {
    if !target.exists() {
        return Err(ReefIdError::FileNotFound(target.display().to_string()));
    }

    if target.is_file() {
        if !is_image_path(target) {
            return Err(ReefIdError::ImageLoad(format!(
                "対応していない形式です: {}",
                target.display()
            )));
        }
        return Ok(vec![image_info(target)]);
    }

    let mut images: Vec<ImageInfo> = WalkDir::new(target)
        .max_depth(1) // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file() && is_image_path(e.path()))
        .map(|e| image_info(e.path()))
        .collect();

    // ファイル名でソート
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}

fn image_info(path: &Path) -> ImageInfo {
    ImageInfo {
        path: path.to_path_buf(),
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
    }
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| is_image_extension(&ext.to_string_lossy()))
        .unwrap_or(false)
}

fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}
