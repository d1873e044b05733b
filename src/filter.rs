use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::config::Options;
use crate::error::{Error, Result};

/// Decides which module ids are transform candidates.
///
/// Exclude always wins over include; an empty include list accepts every id.
#[derive(Debug, Clone)]
pub struct Filter {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl Filter {
    pub fn new(options: &Options) -> Result<Self> {
        let cwd = options.cwd.as_deref();
        Ok(Self {
            include: build_set("include", &options.include, cwd)?,
            exclude: build_set("exclude", &options.exclude, cwd)?,
        })
    }

    /// Accepts everything.
    pub fn all() -> Self {
        Self {
            include: None,
            exclude: None,
        }
    }

    pub fn matches(&self, id: &str) -> bool {
        // Virtual modules from other plugins are never ours.
        if id.contains('\0') {
            return false;
        }
        let id = id.replace('\\', "/");
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(&id) {
                return false;
            }
        }
        match &self.include {
            Some(include) => include.is_match(&id),
            None => true,
        }
    }
}

fn build_set(list: &'static str, patterns: &[String], cwd: Option<&str>) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let resolved = resolve_pattern(pattern, cwd);
        let glob = GlobBuilder::new(&resolved)
            .literal_separator(true)
            .build()
            .map_err(|source| Error::Pattern {
                list,
                pattern: pattern.clone(),
                source,
            })?;
        builder.add(glob);
    }
    let set = builder.build().map_err(|source| Error::Pattern {
        list,
        pattern: patterns.join(", "),
        source,
    })?;
    Ok(Some(set))
}

fn resolve_pattern(pattern: &str, cwd: Option<&str>) -> String {
    let pattern = pattern.replace('\\', "/");
    let is_absolute = pattern.starts_with('/') || has_drive_prefix(&pattern);
    match cwd {
        Some(cwd) if !is_absolute && !pattern.starts_with('*') => {
            let cwd = cwd.replace('\\', "/");
            let pattern = pattern.strip_prefix("./").unwrap_or(&pattern);
            format!("{}/{}", cwd.trim_end_matches('/'), pattern)
        }
        _ => pattern,
    }
}

// `C:/...`
fn has_drive_prefix(pattern: &str) -> bool {
    let bytes = pattern.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/'
}
