use crate::config::Config;
use crate::format::OrganizeFormat;
use crate::metadata::MetadataReader;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Return true if the given path's extension matches any of the configured
/// file_extensions patterns ("*.mp3", "mp3", ".mp3"), case-insensitive.
pub fn path_matches_extensions(path: &Path, exts: &[String]) -> bool {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(s) => s.to_ascii_lowercase(),
        None => return false,
    };
    exts.iter().any(|pat| {
        let p = pat.trim();
        let p = p.strip_prefix("*.").or_else(|| p.strip_prefix('.')).unwrap_or(p);
        !p.is_empty() && ext == p.to_ascii_lowercase()
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Path relative to the destination folder, `/`-separated.
    pub relative: String,
    pub unique: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    pub source: PathBuf,
    pub reason: String,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct Plan {
    pub moves: Vec<PlannedMove>,
    pub skipped: Vec<Skipped>,
}

impl Plan {
    /// Number of files whose path has neither a title nor a track number.
    pub fn non_unique(&self) -> usize {
        self.moves.iter().filter(|m| !m.unique).count()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApplySummary {
    pub moved: usize,
    pub copied: usize,
    pub unchanged: usize,
    pub failed: usize,
}

/// Insert `(n)` before the extension of the last path segment.
fn with_counter(relative: &str, n: usize) -> String {
    let (dir, name) = match relative.rsplit_once('/') {
        Some((d, file)) => (Some(d), file),
        None => (None, relative),
    };
    let name = match name.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() => format!("{base}({n}).{ext}"),
        _ => format!("{name}({n})"),
    };
    match dir {
        Some(d) => format!("{d}/{name}"),
        None => name,
    }
}

fn join_relative(root: &Path, relative: &str) -> PathBuf {
    let mut out = root.to_path_buf();
    out.extend(relative.split('/').filter(|s| !s.is_empty()));
    out
}

/// Walk `source_folder` and work out where every matching file goes.
/// Nothing on disk is changed.
pub fn plan(cfg: &Config, format: &OrganizeFormat, reader: &dyn MetadataReader) -> Result<Plan> {
    if !cfg.source_folder.is_dir() {
        anyhow::bail!("source folder {} is not a directory", cfg.source_folder.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(&cfg.source_folder)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| path_matches_extensions(p, &cfg.file_extensions))
        .collect();
    files.sort();

    let mut plan = Plan::default();
    let mut planned: HashSet<String> = HashSet::new();

    for source in files {
        let shown = pathdiff::diff_paths(&source, &cfg.source_folder).unwrap_or_else(|| source.clone());

        let song = match reader.read(&source) {
            Ok(song) => song,
            Err(e) => {
                warn!("Skipping {}: {:#}", shown.display(), e);
                plan.skipped.push(Skipped { source, reason: format!("{e:#}") });
                continue;
            }
        };

        let result = match format.compute_path(&song, cfg.extension.as_deref()) {
            Ok(r) => r,
            Err(e) => {
                warn!("Skipping {}: {}", shown.display(), e);
                plan.skipped.push(Skipped { source, reason: e.to_string() });
                continue;
            }
        };

        let mut relative = result.path.clone();
        let mut destination = join_relative(&cfg.destination_folder, &relative);
        let mut n = 1;
        // case-insensitive so the plan also holds on FAT/NTFS/APFS destinations
        while planned.contains(&relative.to_lowercase())
            || (!cfg.overwrite && destination != source && destination.exists())
        {
            n += 1;
            relative = with_counter(&result.path, n);
            destination = join_relative(&cfg.destination_folder, &relative);
        }
        planned.insert(relative.to_lowercase());

        debug!("Planned {} -> {}", shown.display(), relative);
        plan.moves.push(PlannedMove { source, destination, relative, unique: result.unique });
    }

    if plan.non_unique() > 0 {
        warn!(
            "{} file(s) have neither title nor track number in their path; colliding names get a counter",
            plan.non_unique()
        );
    }
    info!("Planned {} file(s), skipped {}", plan.moves.len(), plan.skipped.len());
    Ok(plan)
}

fn move_file(source: &Path, destination: &Path) -> Result<()> {
    if std::fs::rename(source, destination).is_ok() {
        return Ok(());
    }
    // rename fails across filesystems
    std::fs::copy(source, destination)
        .with_context(|| format!("copying {} to {}", source.display(), destination.display()))?;
    std::fs::remove_file(source).with_context(|| format!("removing {}", source.display()))?;
    Ok(())
}

/// Carry out a plan. Failures are logged and counted; the rest continue.
pub fn apply(plan: &Plan, copy: bool) -> ApplySummary {
    let mut summary = ApplySummary::default();
    for m in &plan.moves {
        if m.source == m.destination {
            summary.unchanged += 1;
            continue;
        }
        let result = (|| -> Result<()> {
            if let Some(parent) = m.destination.parent() {
                std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
            }
            if copy {
                std::fs::copy(&m.source, &m.destination)
                    .with_context(|| format!("copying {} to {}", m.source.display(), m.destination.display()))?;
            } else {
                move_file(&m.source, &m.destination)?;
            }
            Ok(())
        })();
        match result {
            Ok(()) if copy => summary.copied += 1,
            Ok(()) => summary.moved += 1,
            Err(e) => {
                warn!("Failed to organize {}: {:#}", m.source.display(), e);
                summary.failed += 1;
            }
        }
    }
    info!(
        "Organized: {} moved, {} copied, {} unchanged, {} failed",
        summary.moved, summary.copied, summary.unchanged, summary.failed
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_patterns() {
        let exts = vec!["*.mp3".to_string(), ".FLAC".to_string(), "ogg".to_string(), "".to_string()];
        assert!(path_matches_extensions(Path::new("a/b.MP3"), &exts));
        assert!(path_matches_extensions(Path::new("b.flac"), &exts));
        assert!(path_matches_extensions(Path::new("b.ogg"), &exts));
        assert!(!path_matches_extensions(Path::new("b.txt"), &exts));
        assert!(!path_matches_extensions(Path::new("noext"), &exts));
    }

    #[test]
    fn counters_go_before_the_extension() {
        assert_eq!(with_counter("A/B/song.flac", 2), "A/B/song(2).flac");
        assert_eq!(with_counter("song", 3), "song(3)");
        assert_eq!(with_counter("dir.x/song", 2), "dir.x/song(2)");
    }

    #[test]
    fn relative_paths_join_per_segment() {
        let p = join_relative(Path::new("/dest"), "a/b/c.flac");
        assert_eq!(p, Path::new("/dest").join("a").join("b").join("c.flac"));
    }
}
