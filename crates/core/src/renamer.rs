use crate::entry::RenameEntry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct RenameReport {
    pub renamed: usize,
    pub unchanged: usize,
}

#[derive(Debug, Error)]
pub enum RenameErrorKind {
    #[error("リネーム先が既に存在します: {0}")]
    Collision(String),
    #[error("リネームに失敗しました: {0}")]
    Io(#[from] std::io::Error),
}

/// First failure in a batch. Renames before `index` stayed applied; the
/// directory is left in a mixed state and must be re-scanned.
#[derive(Debug, Error)]
#[error("{filename} -> {output} に失敗しました (適用済み {completed}件): {kind}")]
pub struct RenameError {
    pub index: usize,
    pub filename: String,
    pub output: String,
    pub completed: usize,
    pub kind: RenameErrorKind,
}

/// Renames each entry inside `dir`, in sequence, stopping at the first
/// failure. Callers pass only selected entries. Not transactional: on error
/// the report of what already happened lives in [`RenameError::completed`].
pub fn rename_entries(dir: &Path, entries: &[RenameEntry]) -> Result<RenameReport, RenameError> {
    let mut report = RenameReport::default();

    for (index, entry) in entries.iter().enumerate() {
        if entry.unchanged() {
            report.unchanged += 1;
            continue;
        }

        let target = dir.join(&entry.output);
        // 既存ファイルは上書きしない。先行エントリが名前を空けていれば
        // この時点で存在しないので、存在チェックだけで衝突判定になる。
        if target.exists() {
            return Err(RenameError {
                index,
                filename: entry.filename.clone(),
                output: entry.output.clone(),
                completed: report.renamed,
                kind: RenameErrorKind::Collision(entry.output.clone()),
            });
        }

        if let Err(err) = fs::rename(dir.join(&entry.filename), &target) {
            return Err(RenameError {
                index,
                filename: entry.filename.clone(),
                output: entry.output.clone(),
                completed: report.renamed,
                kind: RenameErrorKind::Io(err),
            });
        }
        report.renamed += 1;
    }

    Ok(report)
}
