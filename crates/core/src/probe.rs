use crate::metadata::{ImageFile, ImageMetadata};

/// Source of per-file image metadata. Implementations never fail: anything
/// that cannot be read comes back as `ImageMetadata::default()`.
pub trait MetadataProbe {
    fn probe(&self, file: &ImageFile) -> ImageMetadata;

    fn is_available(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

impl MetadataProbe for NoMetadata {
    fn probe(&self, _file: &ImageFile) -> ImageMetadata {
        ImageMetadata::default()
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Picks the probe for this build once, at startup.
pub fn default_probe() -> Box<dyn MetadataProbe> {
    #[cfg(feature = "decode")]
    {
        Box::new(ImageProbe)
    }
    #[cfg(not(feature = "decode"))]
    {
        log::warn!("image decoding support is not built in; metadata placeholders will be empty");
        Box::new(NoMetadata)
    }
}

#[cfg(feature = "decode")]
pub use decode::ImageProbe;

#[cfg(feature = "decode")]
mod decode {
    use super::MetadataProbe;
    use crate::error::MetadataError;
    use crate::exif_reader::read_exif_fields;
    use crate::metadata::{ImageFile, ImageMetadata};
    use image::{ColorType, ImageDecoder, ImageFormat, ImageReader};
    use std::path::Path;

    #[derive(Debug, Clone, Copy, Default)]
    pub struct ImageProbe;

    impl ImageProbe {
        pub fn read(&self, path: &Path) -> Result<ImageMetadata, MetadataError> {
            let reader = ImageReader::open(path)
                .and_then(|r| r.with_guessed_format())
                .map_err(|source| MetadataError::Open {
                    path: path.to_path_buf(),
                    source,
                })?;
            let format = reader.format().map(format_name);
            let decoder = reader
                .into_decoder()
                .map_err(|source| MetadataError::Decode {
                    path: path.to_path_buf(),
                    source,
                })?;
            let (width, height) = decoder.dimensions();
            let color_mode = color_mode_name(decoder.color_type());

            let exif = read_exif_fields(path);
            Ok(ImageMetadata {
                width: Some(width),
                height: Some(height),
                format,
                color_mode: Some(color_mode),
                date_taken: exif.date_taken,
                camera_make: exif.camera_make,
                camera_model: exif.camera_model,
            })
        }
    }

    impl MetadataProbe for ImageProbe {
        fn probe(&self, file: &ImageFile) -> ImageMetadata {
            match self.read(&file.path) {
                Ok(metadata) => metadata,
                Err(err) => {
                    log::warn!("could not read metadata: {}", err);
                    ImageMetadata::default()
                }
            }
        }
    }

    fn format_name(format: ImageFormat) -> String {
        match format {
            ImageFormat::Jpeg => "JPEG".to_string(),
            ImageFormat::Png => "PNG".to_string(),
            ImageFormat::Gif => "GIF".to_string(),
            ImageFormat::Bmp => "BMP".to_string(),
            ImageFormat::Tiff => "TIFF".to_string(),
            ImageFormat::WebP => "WEBP".to_string(),
            ImageFormat::Ico => "ICO".to_string(),
            other => format!("{:?}", other).to_uppercase(),
        }
    }

    fn color_mode_name(color: ColorType) -> String {
        match color {
            ColorType::L8 => "L".to_string(),
            ColorType::La8 => "LA".to_string(),
            ColorType::Rgb8 => "RGB".to_string(),
            ColorType::Rgba8 => "RGBA".to_string(),
            ColorType::L16 => "I;16".to_string(),
            ColorType::La16 => "LA;16".to_string(),
            ColorType::Rgb16 => "RGB;16".to_string(),
            ColorType::Rgba16 => "RGBA;16".to_string(),
            ColorType::Rgb32F => "RGB;F".to_string(),
            ColorType::Rgba32F => "RGBA;F".to_string(),
            other => format!("{:?}", other),
        }
    }
}
