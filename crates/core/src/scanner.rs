use crate::config::AppConfig;
use crate::entry::RenameEntry;
use crate::exif_reader::{read_capture_date, MetadataError};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScanStats {
    pub scanned_files: usize,
    pub image_files: usize,
    pub skipped_non_image: usize,
    pub no_date: usize,
    pub planned: usize,
}

#[derive(Debug)]
pub struct ScanIssue {
    pub filename: String,
    pub error: MetadataError,
}

#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub entries: Vec<RenameEntry>,
    pub issues: Vec<ScanIssue>,
    pub stats: ScanStats,
}

/// Scans the directory's direct children and plans a rename for every JPEG
/// with a readable capture date. A missing directory is an empty plan, not an
/// error. Files with a malformed date tag land in `issues` and the scan
/// continues. Entries come back sorted by filename.
pub fn traverse_dir_for_images(dir: &Path, config: &AppConfig) -> Result<ScanOutcome> {
    let mut outcome = ScanOutcome::default();

    if !dir.exists() {
        return Ok(outcome);
    }

    for entry in
        fs::read_dir(dir).with_context(|| format!("フォルダを読めませんでした: {}", dir.display()))?
    {
        let entry = entry.with_context(|| format!("エントリ読み取り失敗: {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        outcome.stats.scanned_files += 1;

        if !is_jpeg(&path) {
            outcome.stats.skipped_non_image += 1;
            continue;
        }
        outcome.stats.image_files += 1;

        let filename = entry.file_name().to_string_lossy().to_string();
        match read_capture_date(&path) {
            Ok(Some(date)) => {
                outcome.entries.push(RenameEntry::new(
                    filename,
                    date,
                    &config.output_date_format,
                ));
            }
            Ok(None) => {
                outcome.stats.no_date += 1;
            }
            Err(error) => {
                outcome.issues.push(ScanIssue { filename, error });
            }
        }
    }

    outcome.entries.sort_by(|a, b| a.filename.cmp(&b.filename));
    outcome.stats.planned = outcome.entries.len();

    Ok(outcome)
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg")
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::traverse_dir_for_images;
    use crate::config::AppConfig;
    use crate::exif_reader::test_fixture::{jpeg_with_exif, jpeg_without_exif};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_directory_yields_empty_plan() {
        let temp = tempdir().expect("tempdir");
        let missing = temp.path().join("does-not-exist");

        let outcome =
            traverse_dir_for_images(&missing, &AppConfig::default()).expect("scan should succeed");
        assert!(outcome.entries.is_empty());
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn directory_without_eligible_files_yields_empty_plan() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join("note.txt"), b"hello").expect("write note");
        fs::create_dir(temp.path().join("nested")).expect("create subdir");

        let outcome = traverse_dir_for_images(temp.path(), &AppConfig::default())
            .expect("scan should succeed");
        assert!(outcome.entries.is_empty());
        assert_eq!(outcome.stats.skipped_non_image, 1);
    }

    #[test]
    fn plans_only_jpegs_with_dates_and_skips_others() {
        let temp = tempdir().expect("tempdir");
        fs::write(
            temp.path().join("img1.jpg"),
            jpeg_with_exif(None, Some("2024:05:01 10:00:00")),
        )
        .expect("write img1");
        fs::write(temp.path().join("note.txt"), b"hello").expect("write note");
        fs::write(temp.path().join("nodate.jpg"), jpeg_without_exif()).expect("write nodate");

        let outcome = traverse_dir_for_images(temp.path(), &AppConfig::default())
            .expect("scan should succeed");

        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.entries[0].filename, "img1.jpg");
        assert_eq!(outcome.entries[0].output, "2024-05-01_img1.jpg");
        assert!(outcome.entries[0].selected);
        assert_eq!(outcome.stats.no_date, 1);
        assert_eq!(outcome.stats.skipped_non_image, 1);
        assert_eq!(outcome.stats.planned, 1);
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let temp = tempdir().expect("tempdir");
        for name in ["a.JPG", "b.JpEg"] {
            fs::write(
                temp.path().join(name),
                jpeg_with_exif(None, Some("2024:05:01 10:00:00")),
            )
            .expect("write jpeg");
        }

        let outcome = traverse_dir_for_images(temp.path(), &AppConfig::default())
            .expect("scan should succeed");
        assert_eq!(outcome.entries.len(), 2);
    }

    #[test]
    fn entries_are_sorted_by_filename() {
        let temp = tempdir().expect("tempdir");
        for name in ["c.jpg", "a.jpg", "b.jpg"] {
            fs::write(
                temp.path().join(name),
                jpeg_with_exif(None, Some("2024:05:01 10:00:00")),
            )
            .expect("write jpeg");
        }

        let outcome = traverse_dir_for_images(temp.path(), &AppConfig::default())
            .expect("scan should succeed");
        let names: Vec<&str> = outcome.entries.iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(names, ["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn malformed_date_becomes_issue_and_scan_continues() {
        let temp = tempdir().expect("tempdir");
        fs::write(
            temp.path().join("bad.jpg"),
            jpeg_with_exif(None, Some("05/01/2024 10:00")),
        )
        .expect("write bad");
        fs::write(
            temp.path().join("good.jpg"),
            jpeg_with_exif(None, Some("2024:05:01 10:00:00")),
        )
        .expect("write good");

        let outcome = traverse_dir_for_images(temp.path(), &AppConfig::default())
            .expect("scan should succeed");

        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.entries[0].filename, "good.jpg");
        assert_eq!(outcome.issues.len(), 1);
        assert_eq!(outcome.issues[0].filename, "bad.jpg");
    }

    #[test]
    fn scan_honors_configured_output_format() {
        let temp = tempdir().expect("tempdir");
        fs::write(
            temp.path().join("img1.jpg"),
            jpeg_with_exif(None, Some("2024:05:01 10:00:00")),
        )
        .expect("write img1");

        let config = AppConfig {
            output_date_format: "%Y_%m_%d_%H%M%S".to_string(),
            ..AppConfig::default()
        };
        let outcome = traverse_dir_for_images(temp.path(), &config).expect("scan should succeed");
        assert_eq!(outcome.entries[0].output, "2024_05_01_100000_img1.jpg");
    }
}
