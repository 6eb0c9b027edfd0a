use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageFile {
    pub path: PathBuf,
    pub extension: String,
    pub size: u64,
    pub created: DateTime<Local>,
    pub modified: DateTime<Local>,
}

impl ImageFile {
    pub fn from_path(path: &Path) -> Result<Self> {
        let stat = fs::metadata(path)
            .with_context(|| format!("could not stat file: {}", path.display()))?;
        let modified = stat
            .modified()
            .with_context(|| format!("no modification time for: {}", path.display()))?;
        // Not every filesystem reports a birth time.
        let created = stat.created().unwrap_or(modified);

        Ok(Self {
            path: path.to_path_buf(),
            extension: path
                .extension()
                .map(|v| v.to_string_lossy().to_string())
                .unwrap_or_default(),
            size: stat.len(),
            created: DateTime::from(created),
            modified: DateTime::from(modified),
        })
    }

    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|v| v.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|v| v.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    pub fn extension_with_dot(&self) -> String {
        if self.extension.is_empty() {
            String::new()
        } else {
            format!(".{}", self.extension)
        }
    }

    pub fn is_jpeg(&self) -> bool {
        self.extension.eq_ignore_ascii_case("jpg") || self.extension.eq_ignore_ascii_case("jpeg")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: Option<String>,
    pub color_mode: Option<String>,
    pub date_taken: Option<DateTime<Local>>,
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
}

impl ImageMetadata {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn normalized_camera_make(&self) -> Option<&str> {
        self.camera_make
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn normalized_camera_model(&self) -> Option<&str> {
        self.camera_model
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn resolution(&self) -> Option<String> {
        let width = self.width?;
        let height = self
            .height
            .map(|h| h.to_string())
            .unwrap_or_default();
        Some(format!("{}x{}", width, height))
    }

    /// `make_model`, or `None` when the make is unknown. A missing model
    /// still yields `make_`.
    pub fn camera(&self) -> Option<String> {
        let make = self.normalized_camera_make()?;
        Some(format!(
            "{}_{}",
            make,
            self.normalized_camera_model().unwrap_or_default()
        ))
    }
}
