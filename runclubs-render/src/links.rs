//! URL construction for canonical links and in-page hrefs.

use std::path::PathBuf;

/// Absolute URL of a site path. Paths without a file extension are
/// directories and get a trailing slash.
pub fn canonical(base_url: &str, path: &str) -> String {
    let mut url = base_url.trim_end_matches('/').to_string();
    if !path.starts_with('/') {
        url.push('/');
    }
    url.push_str(path);
    if !path.contains('.') && !path.ends_with('/') {
        url.push('/');
    }
    url
}

fn is_file(path: &str) -> bool {
    path.rsplit('/').next().is_some_and(|last| last.contains('.'))
}

/// Where the generated links point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Served by a web server: directory paths end in `/`.
    Remote,
    /// Browsed from disk: links are absolute file paths below the output
    /// directory, directories resolve to their `index.html`.
    Local(PathBuf),
}

impl LinkTarget {
    pub fn link(&self, path: &str) -> String {
        match self {
            Self::Remote => {
                if !is_file(path) && !path.ends_with('/') {
                    format!("{path}/")
                } else {
                    path.to_string()
                }
            }
            Self::Local(root) => {
                let mut res = root.display().to_string();
                if !path.starts_with('/') {
                    res.push('/');
                }
                res.push_str(path);
                if path.ends_with('/') {
                    res.push_str("index.html");
                } else if !is_file(path) {
                    res.push_str("/index.html");
                }
                res
            }
        }
    }
}

/// Percent-encode a string for use as a single URL path segment.
///
/// Unreserved characters and `$&+:=@` pass through, everything else
/// (including `/`) is encoded byte-wise.
pub fn path_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'~'
            | b'$'
            | b'&'
            | b'+'
            | b':'
            | b'='
            | b'@' => out.push(b as char),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}
