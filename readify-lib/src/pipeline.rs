//! Page processing: parse, reconcile, serialize.
//!
//! Pages are independent, so a directory is processed in parallel; each page
//! still gets one single-threaded reconciliation pass with its own
//! [`Reconciler`].

use crate::config::ReadifyConfig;
use crate::error::{ReadifyError, Result};
use crate::parser::{html, serialize};
use crate::reconcile::{Reconciler, ResultSet};
use crate::report::{PageFailure, PageReport, RunReport};
use log::{info, warn};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extensions treated as pages
const PAGE_EXTENSIONS: &[&str] = &["html", "htm"];

/// Directories never descended into
const SKIP_DIRS: &[&str] = &["node_modules", ".git", "target", ".sass-cache", ".jekyll-cache"];

/// Runs one reconciliation pass over an HTML string.
pub fn process_html(html_content: &str, reconciler: &mut Reconciler) -> Result<(String, ResultSet)> {
    let mut document = html::create_dom_tree(html_content);
    let result = reconciler.reconcile(&mut document);
    let output = serialize::to_html(&document)?;
    Ok((output, result))
}

/// Processes `src`, writing the result to `dest` when given.
///
/// Returns the rewritten page as well, so callers without a destination can
/// print it.
pub fn process_file(
    src: &Path,
    dest: Option<&Path>,
    config: &ReadifyConfig,
) -> Result<(String, ResultSet)> {
    let html_content = fs::read_to_string(src).map_err(|e| ReadifyError::file(src, e))?;
    let (output, result) = process_html(&html_content, &mut config.reconciler())?;
    if let Some(dest) = dest {
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ReadifyError::file(parent, e))?;
        }
        fs::write(dest, &output).map_err(|e| ReadifyError::file(dest, e))?;
    }
    Ok((output, result))
}

/// All pages below `dir`, sorted by path, plus the entries the walk could
/// not read. Failure paths are relative to `dir`.
pub fn collect_pages(dir: &Path) -> (Vec<PathBuf>, Vec<PageFailure>) {
    let mut pages = Vec::new();
    let mut failures = Vec::new();
    let walker = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_str().unwrap_or("");
            !SKIP_DIRS.contains(&name) && !name.starts_with('.')
        });
    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() && is_page(entry.path()) => {
                pages.push(entry.into_path())
            }
            Ok(_) => {}
            Err(err) => {
                let path = err.path().unwrap_or(dir);
                warn!("{}: {}", path.display(), err);
                failures.push(PageFailure {
                    path: path.strip_prefix(dir).unwrap_or(path).to_path_buf(),
                    error: err.to_string(),
                });
            }
        }
    }
    pages.sort();
    (pages, failures)
}

fn is_page(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| PAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Processes every page below `input_dir` into the same relative location
/// below `output_dir`. Passing the same directory twice rewrites in place.
pub fn process_tree(input_dir: &Path, output_dir: &Path, config: &ReadifyConfig) -> RunReport {
    let (pages, walk_failures) = collect_pages(input_dir);
    info!("processing {} page(s) from {}", pages.len(), input_dir.display());

    let outcomes: Vec<(PathBuf, Result<ResultSet>)> = pages
        .par_iter()
        .map(|src| {
            let relative = src.strip_prefix(input_dir).unwrap_or(src);
            let dest = output_dir.join(relative);
            let outcome = process_file(src, Some(&dest), config).map(|(_, result)| result);
            (relative.to_path_buf(), outcome)
        })
        .collect();

    let mut report = RunReport {
        failures: walk_failures,
        ..RunReport::default()
    };
    for (path, outcome) in outcomes {
        match outcome {
            Ok(result) => report.pages.push(PageReport { path, result }),
            Err(err) => {
                warn!("{}: {}", path.display(), err);
                report.failures.push(PageFailure {
                    path,
                    error: err.to_string(),
                });
            }
        }
    }
    info!(
        "{} page(s) processed, {} failed",
        report.pages.len(),
        report.failures.len()
    );
    report
}
