mod config;
mod entry;
mod exif_reader;
mod renamer;
mod scanner;

/// 新ファイル名の日付プレフィックスの既定書式。
pub const DEFAULT_OUTPUT_DATE_FORMAT: &str = "%Y-%m-%d";
/// 一覧表示用の既定書式。
pub const DEFAULT_TABLE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub use config::{app_paths, load_config, save_config, AppConfig, AppPaths};
pub use entry::{derive_output, validate_date_format, FormatError, RenameEntry};
pub use exif_reader::{read_capture_date, MetadataError, EXIF_DATE_FORMAT};
pub use renamer::{rename_entries, RenameError, RenameErrorKind, RenameReport};
pub use scanner::{traverse_dir_for_images, ScanIssue, ScanOutcome, ScanStats};
