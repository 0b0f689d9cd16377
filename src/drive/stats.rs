//! Storage usage and per-kind statistics.

use std::collections::BTreeMap;

use super::types::{DriveFile, FileKind};

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Count and total size of the files of one kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindStat {
    pub count: usize,
    pub bytes: u64,
}

/// Storage used by an account against its quota.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageUsage {
    /// Bytes held by non-deleted files.
    pub used_bytes: u64,
    /// Quota in GiB.
    pub quota_gb: f64,
}

impl StorageUsage {
    /// Compute usage for a file list. Trashed files do not count.
    pub fn of(files: &[DriveFile], quota_gb: f64) -> Self {
        Self {
            used_bytes: files
                .iter()
                .filter(|f| !f.deleted)
                .fold(0u64, |total, f| total.saturating_add(f.size_bytes)),
            quota_gb,
        }
    }

    /// Used space in GiB.
    pub fn used_gb(&self) -> f64 {
        self.used_bytes as f64 / BYTES_PER_GIB
    }

    /// Used share of the quota in percent, capped at 100.
    pub fn percent(&self) -> f64 {
        if self.quota_gb <= 0.0 {
            return 100.0;
        }
        (self.used_gb() / self.quota_gb * 100.0).min(100.0)
    }
}

/// Per-kind statistics over non-deleted files. Kinds without files are absent.
pub fn kind_stats(files: &[DriveFile]) -> BTreeMap<FileKind, KindStat> {
    files
        .iter()
        .filter(|f| !f.deleted)
        .fold(BTreeMap::new(), |mut acc, file| {
            let stat: &mut KindStat = acc.entry(file.kind).or_default();
            stat.count += 1;
            stat.bytes = stat.bytes.saturating_add(file.size_bytes);
            acc
        })
}
