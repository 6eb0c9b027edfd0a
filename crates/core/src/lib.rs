mod apply;
mod error;
#[cfg(feature = "decode")]
mod exif_reader;
mod metadata;
mod planner;
mod probe;
mod sanitize;
mod template;

pub use apply::{apply_plan, fallback_name, ApplyResult, FileOutcome};
pub use error::{MetadataError, RenameError};
pub use metadata::{ImageFile, ImageMetadata};
pub use planner::{
    generate_plan, render_preview_sample, scan_directory, sequential_name, PlanOptions,
    RenameCandidate, RenameMode, RenamePlan, RenameStats, SEQUENTIAL_EXTENSION,
    SUPPORTED_EXTENSIONS,
};
#[cfg(feature = "decode")]
pub use probe::ImageProbe;
pub use probe::{default_probe, MetadataProbe, NoMetadata};
pub use sanitize::finalize_stem;
pub use template::{
    parse_template, render_template, validate_template, TemplateContext, TemplateError,
    TemplatePart, Token,
};
