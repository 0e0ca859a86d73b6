use chrono::NaiveDateTime;
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// EXIF規格の日時表記。互換性のため厳密にこの形式のみ受け付ける。
pub const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("ファイルを開けませんでした: {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("日付タグの値が不正です ({value:?}): {path}")]
    MalformedDate { path: PathBuf, value: String },
}

/// Reads the capture date from a JPEG's EXIF block. `DateTimeOriginal`
/// (0x9003) wins over `DateTime` (0x0132); neither present, or no EXIF at
/// all, is `Ok(None)`. A date tag that does not match [`EXIF_DATE_FORMAT`]
/// is reported as [`MetadataError::MalformedDate`], never silently dropped.
pub fn read_capture_date(path: &Path) -> Result<Option<NaiveDateTime>, MetadataError> {
    let file = File::open(path).map_err(|source| MetadataError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut buf = BufReader::new(file);

    let exif = match Reader::new().read_from_container(&mut buf) {
        Ok(exif) => exif,
        // 画像にEXIFが無い、または読めない場合は「日付なし」扱い
        Err(_) => return Ok(None),
    };

    let field = exif
        .get_field(Tag::DateTimeOriginal, In::PRIMARY)
        .or_else(|| exif.get_field(Tag::DateTime, In::PRIMARY));

    let Some(field) = field else {
        return Ok(None);
    };

    let raw = match &field.value {
        Value::Ascii(lines) => lines
            .first()
            .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
            .unwrap_or_default(),
        other => format!("{other:?}"),
    };

    match NaiveDateTime::parse_from_str(&raw, EXIF_DATE_FORMAT) {
        Ok(date) => Ok(Some(date)),
        Err(_) => Err(MetadataError::MalformedDate {
            path: path.to_path_buf(),
            value: raw,
        }),
    }
}
