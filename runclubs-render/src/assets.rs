//! Static asset copying with content-hashed file names.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::RenderError;

/// Site path prefix of copied assets.
const STATIC_PREFIX: &str = "/static";

/// Site paths of the copied stylesheets and scripts, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assets {
    pub css: Vec<String>,
    pub js: Vec<String>,
}

impl Assets {
    /// Separate the analytics script from the other scripts.
    pub fn split_analytics(&self) -> (Option<String>, Vec<String>) {
        let mut umami = None;
        let mut other = Vec::new();
        for js in &self.js {
            if js.contains("umami") {
                umami = Some(js.clone());
            } else {
                other.push(js.clone());
            }
        }
        (umami, other)
    }
}

/// First 8 hex chars of the SHA-256 of `bytes`.
fn content_hash(bytes: &[u8]) -> String {
    let hash = Sha256::digest(bytes);
    hash[..4].iter().map(|b| format!("{:02x}", b)).collect()
}

/// `style.css` -> `style-<hash>.css`
fn hashed_name(file_name: &str, hash: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}-{hash}.{ext}"),
        None => format!("{file_name}-{hash}"),
    }
}

/// Copy the files of `static_dir` into `<output_dir>/static/`.
///
/// Stylesheets and scripts get a content hash in their name; other files
/// keep theirs. A missing `static_dir` yields no assets.
pub fn copy_static_assets(static_dir: &Path, output_dir: &Path) -> Result<Assets, RenderError> {
    let mut assets = Assets::default();
    if !static_dir.is_dir() {
        log::warn!("static directory {} not found", static_dir.display());
        return Ok(assets);
    }

    let dest_dir = output_dir.join("static");
    fs::create_dir_all(&dest_dir)?;

    let mut entries: Vec<_> = fs::read_dir(static_dir)?
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    entries.sort();

    for src in entries {
        let Some(file_name) = src.file_name().and_then(|n| n.to_str()) else {
            return Err(RenderError::Asset {
                path: src.clone(),
                message: "file name is not valid UTF-8".to_string(),
            });
        };
        let contents = fs::read(&src)?;
        let ext = src.extension().and_then(|e| e.to_str()).unwrap_or("");

        let target_name = match ext {
            "css" | "js" => hashed_name(file_name, &content_hash(&contents)),
            _ => file_name.to_string(),
        };
        let dest = dest_dir.join(&target_name);
        fs::write(&dest, &contents).map_err(|source| RenderError::Write {
            path: dest.clone(),
            source,
        })?;
        log::debug!("copied {} -> {}", src.display(), dest.display());

        let site_path = format!("{STATIC_PREFIX}/{target_name}");
        match ext {
            "css" => assets.css.push(site_path),
            "js" => assets.js.push(site_path),
            _ => {}
        }
    }

    Ok(assets)
}
