use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use exif::{Exif, In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExifFields {
    pub date_taken: Option<DateTime<Local>>,
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
}

/// Absent or unreadable EXIF is common for PNG/GIF/BMP and not worth a
/// warning, so every failure collapses into empty fields.
pub fn read_exif_fields(path: &Path) -> ExifFields {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            log::debug!("EXIF skipped, cannot open {}: {}", path.display(), err);
            return ExifFields::default();
        }
    };
    let mut buf = BufReader::new(file);
    let exif = match Reader::new().read_from_container(&mut buf) {
        Ok(exif) => exif,
        Err(err) => {
            log::debug!("no EXIF in {}: {}", path.display(), err);
            return ExifFields::default();
        }
    };

    ExifFields {
        date_taken: ascii_field(&exif, Tag::DateTime).and_then(|raw| parse_date(&raw)),
        camera_make: ascii_field(&exif, Tag::Make),
        camera_model: ascii_field(&exif, Tag::Model),
    }
}

fn ascii_field(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let value = match &field.value {
        Value::Ascii(parts) => parts
            .first()
            .map(|bytes| String::from_utf8_lossy(bytes).to_string())?,
        _ => field.display_value().to_string(),
    };
    normalize(value)
}

fn normalize(value: String) -> Option<String> {
    let trimmed = value.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub(crate) fn parse_date(input: &str) -> Option<DateTime<Local>> {
    let normalized = input.trim();

    let candidates = [
        "%Y:%m:%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ];

    for fmt in candidates {
        if let Ok(naive) = NaiveDateTime::parse_from_str(normalized, fmt) {
            if let Some(local) = Local.from_local_datetime(&naive).single() {
                return Some(local);
            }
        }
    }

    None
}

/// A small JPEG carrying an APP1 EXIF segment with Make, Model and
/// DateTime.
#[cfg(test)]
pub(crate) fn jpeg_with_exif(make: &str, model: &str, date_time: &str) -> Vec<u8> {
    use exif::experimental::Writer;
    use exif::Field;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    let mut jpeg = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(RgbImage::new(8, 8))
        .write_to(&mut jpeg, ImageFormat::Jpeg)
        .expect("encode jpeg");
    let jpeg = jpeg.into_inner();

    let ascii = |tag: Tag, text: &str| Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![text.as_bytes().to_vec()]),
    };
    let fields = [
        ascii(Tag::Make, make),
        ascii(Tag::Model, model),
        ascii(Tag::DateTime, date_time),
    ];
    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, false).expect("encode exif");
    let tiff = tiff.into_inner();

    // APP1 goes right after SOI; its length counts itself and the payload.
    let segment_len = u16::try_from(2 + 6 + tiff.len()).expect("exif fits one segment");
    let mut out = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    out
}
