use crate::error::RenameError;
use crate::metadata::{ImageFile, ImageMetadata};
use crate::probe::MetadataProbe;
use crate::sanitize::finalize_stem;
use crate::template::{
    parse_template, render_template, template_needs_metadata, TemplateContext, TemplatePart,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const SUPPORTED_EXTENSIONS: &[&str] =
    &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp", "ico"];

/// Sequential names always end in `.jpg`, whatever the source format.
pub const SEQUENTIAL_EXTENSION: &str = ".jpg";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "pattern", rename_all = "snake_case")]
pub enum RenameMode {
    #[default]
    Sequential,
    Pattern(String),
}

impl RenameMode {
    pub fn describe(&self) -> String {
        match self {
            Self::Sequential => "001.jpg, 002.jpg, 003.jpg, ... (sorted by file name)".to_string(),
            Self::Pattern(pattern) => format!("pattern \"{}\" keeping each file's extension", pattern),
        }
    }

    /// True when rendering reads image metadata (`{width}`, `{format}`, ...).
    pub fn needs_metadata(&self) -> bool {
        match self {
            Self::Sequential => false,
            Self::Pattern(pattern) => parse_template(pattern)
                .map(|parts| template_needs_metadata(&parts))
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    pub input_dir: PathBuf,
    pub mode: RenameMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameCandidate {
    pub index: usize,
    pub original_path: PathBuf,
    pub target_path: PathBuf,
    pub changed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RenameStats {
    pub scanned_entries: usize,
    pub image_files: usize,
    pub skipped_non_image: usize,
    pub planned: usize,
    pub unchanged: usize,
    /// Files whose extension changes to `.jpg` under sequential mode.
    pub extension_rewrites: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamePlan {
    pub root: PathBuf,
    pub mode: RenameMode,
    pub total_files: usize,
    pub candidates: Vec<RenameCandidate>,
    pub stats: RenameStats,
}

pub fn generate_plan(options: &PlanOptions, probe: &dyn MetadataProbe) -> Result<RenamePlan> {
    let parts = match &options.mode {
        RenameMode::Sequential => None,
        RenameMode::Pattern(pattern) => Some(parse_template(pattern)?),
    };

    let mut stats = RenameStats::default();
    let files = collect_image_files(&options.input_dir, &mut stats)?;
    let total_files = files.len();

    let mut candidates = Vec::with_capacity(total_files);
    for (offset, file) in files.iter().enumerate() {
        let index = offset + 1;
        let file_name = match parts.as_deref() {
            None => {
                if !file.is_jpeg() {
                    stats.extension_rewrites += 1;
                }
                sequential_name(index)
            }
            Some(parts) => pattern_name(parts, file, probe, index),
        };

        let target_path = file.path.with_file_name(&file_name);
        let changed = target_path != file.path;
        if !changed {
            stats.unchanged += 1;
        }
        log::debug!(
            "planned {} -> {}",
            file.path.display(),
            target_path.display()
        );

        stats.planned += 1;
        candidates.push(RenameCandidate {
            index,
            original_path: file.path.clone(),
            target_path,
            changed,
        });
    }

    Ok(RenamePlan {
        root: options.input_dir.clone(),
        mode: options.mode.clone(),
        total_files,
        candidates,
        stats,
    })
}

pub fn scan_directory(root: &Path) -> Result<Vec<ImageFile>> {
    let mut stats = RenameStats::default();
    collect_image_files(root, &mut stats)
}

pub fn sequential_name(index: usize) -> String {
    format!("{:03}{}", index, SEQUENTIAL_EXTENSION)
}

pub fn render_preview_sample(
    template: &str,
    file: &ImageFile,
    metadata: &ImageMetadata,
    counter: usize,
) -> Result<String> {
    let parts = parse_template(template)?;
    Ok(finish_pattern_name(&parts, file, metadata, counter))
}

fn pattern_name(
    parts: &[TemplatePart],
    file: &ImageFile,
    probe: &dyn MetadataProbe,
    counter: usize,
) -> String {
    let metadata = if template_needs_metadata(parts) {
        probe.probe(file)
    } else {
        ImageMetadata::default()
    };
    finish_pattern_name(parts, file, &metadata, counter)
}

fn finish_pattern_name(
    parts: &[TemplatePart],
    file: &ImageFile,
    metadata: &ImageMetadata,
    counter: usize,
) -> String {
    let rendered = render_template(
        parts,
        &TemplateContext {
            file,
            metadata,
            counter,
        },
    );
    format!("{}{}", finalize_stem(&rendered), file.extension_with_dot())
}

fn collect_image_files(root: &Path, stats: &mut RenameStats) -> Result<Vec<ImageFile>> {
    if !root.exists() {
        return Err(RenameError::DirectoryNotFound(root.to_path_buf()).into());
    }
    if !root.is_dir() {
        return Err(RenameError::NotADirectory(root.to_path_buf()).into());
    }

    let mut out = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry =
            entry.with_context(|| format!("could not read directory: {}", root.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        stats.scanned_entries += 1;

        if is_supported_image(path) {
            stats.image_files += 1;
            out.push(ImageFile::from_path(path)?);
        } else {
            stats.skipped_non_image += 1;
        }
    }

    Ok(out)
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}
