use crate::error::RenameError;
use crate::planner::{RenameCandidate, RenamePlan, SEQUENTIAL_EXTENSION};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Renamed { from: PathBuf, to: PathBuf },
    Unchanged { path: PathBuf },
    Failed { from: PathBuf, to: PathBuf, error: String },
}

impl FileOutcome {
    pub fn is_renamed(&self) -> bool {
        matches!(self, Self::Renamed { .. })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyResult {
    pub renamed: usize,
    pub skipped: usize,
    pub outcomes: Vec<FileOutcome>,
}

impl ApplyResult {
    fn record(&mut self, outcome: FileOutcome) {
        if outcome.is_renamed() {
            self.renamed += 1;
        } else {
            self.skipped += 1;
        }
        self.outcomes.push(outcome);
    }
}

/// Applies the plan in order. Per-file failures are recorded and the batch
/// moves on; files already renamed stay renamed.
pub fn apply_plan(plan: &RenamePlan) -> ApplyResult {
    let mut result = ApplyResult::default();
    let mut pending = PendingTargets::new(&plan.candidates);

    for candidate in &plan.candidates {
        pending.release(&candidate.target_path);
        let target = resolve_collision(candidate, &pending, plan.total_files);
        result.record(apply_one(&candidate.original_path, &target));
    }

    result
}

fn apply_one(original_path: &Path, target: &Path) -> FileOutcome {
    if target.file_name() == original_path.file_name() {
        log::debug!("unchanged: {}", original_path.display());
        return FileOutcome::Unchanged {
            path: original_path.to_path_buf(),
        };
    }

    match fs::rename(original_path, target) {
        Ok(()) => {
            log::debug!(
                "renamed {} -> {}",
                original_path.display(),
                target.display()
            );
            FileOutcome::Renamed {
                from: original_path.to_path_buf(),
                to: target.to_path_buf(),
            }
        }
        Err(source) => {
            let err = RenameError::RenameFailed {
                from: original_path.to_path_buf(),
                to: target.to_path_buf(),
                source,
            };
            log::warn!("{}", err);
            FileOutcome::Failed {
                from: original_path.to_path_buf(),
                to: target.to_path_buf(),
                error: err.to_string(),
            }
        }
    }
}

fn resolve_collision(candidate: &RenameCandidate, pending: &PendingTargets, total: usize) -> PathBuf {
    let target = &candidate.target_path;
    if !target.exists() || target == &candidate.original_path {
        return target.clone();
    }

    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    let mut n = total + 1;
    loop {
        let fallback = parent.join(fallback_name(n));
        if !fallback.exists() && !pending.contains(&fallback) {
            log::debug!(
                "{} is taken, using {}",
                target.display(),
                fallback.display()
            );
            return fallback;
        }
        n += 1;
    }
}

pub fn fallback_name(n: usize) -> String {
    format!("image_{:03}{}", n, SEQUENTIAL_EXTENSION)
}

/// Destinations still claimed by candidates that have not been applied.
struct PendingTargets {
    counts: HashMap<PathBuf, usize>,
}

impl PendingTargets {
    fn new(candidates: &[RenameCandidate]) -> Self {
        let mut counts = HashMap::new();
        for candidate in candidates {
            *counts.entry(candidate.target_path.clone()).or_insert(0) += 1;
        }
        Self { counts }
    }

    fn release(&mut self, target: &Path) {
        if let Some(count) = self.counts.get_mut(target) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(target);
            }
        }
    }

    fn contains(&self, path: &Path) -> bool {
        self.counts.contains_key(path)
    }
}
