//! Path and URL policy.
//!
//! Pure functions, no I/O. A spec file's path relative to the spec root fully determines both
//! where its pages are written and the remote URL the pages point back at.

use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

fn scheme_regex() -> &'static Regex {
    static SCHEME: OnceLock<Regex> = OnceLock::new();
    SCHEME.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("Invalid regex"))
}

/// True if `value` starts with a URL scheme such as `https://`.
pub fn is_absolute_url(value: &str) -> bool {
    scheme_regex().is_match(value)
}

/// Output directory for the pages of one spec file.
///
/// `a/b/pets.yaml` under `content/apis` becomes `content/apis/a/b/pets`, so specs sharing a
/// base filename in different directories never write into the same directory.
pub fn derive_output_dir(spec_relative_path: &Path, apis_root: &Path) -> PathBuf {
    let mut output = apis_root.to_path_buf();
    if let Some(parent) = spec_relative_path.parent() {
        for component in parent.components() {
            if let Component::Normal(segment) = component {
                output.push(segment);
            }
        }
    }
    if let Some(stem) = spec_relative_path.file_stem() {
        output.push(stem);
    }
    output
}

/// Canonical remote URL of a spec file: `<remote_root>/<specs_root_name>/<relative path>`.
///
/// `remote_root` must already be in raw-content form.
pub fn derive_remote_url(
    spec_relative_path: &Path,
    remote_root: &str,
    specs_root_name: &str,
) -> String {
    let relative = to_url_path(spec_relative_path);
    let specs_root_name = specs_root_name.trim_matches('/');
    let remote_root = remote_root.trim_end_matches('/');

    if specs_root_name.is_empty() {
        format!("{}/{}", remote_root, relative)
    } else {
        format!("{}/{}/{}", remote_root, specs_root_name, relative)
    }
}

/// Joins the normal components of a path with `/`, whatever the host separator is.
pub fn to_url_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
