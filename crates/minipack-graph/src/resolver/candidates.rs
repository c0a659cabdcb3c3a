//! Candidate path generation for reference resolution.
//!
//! Resolution is split in two steps: compute the ordered list of base paths a
//! reference may denote, then probe each base (as-is, then with every
//! configured extension) against the runtime. Keeping the first step pure lets
//! the blocking and async resolvers share it.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

/// How a reference is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// `/components/btn/btn`: relative to the app root
    RootAbsolute,
    /// `./btn`, `../shared/btn`
    Relative,
    /// `btn` or `some-package/btn`: package directories first, then `./btn`
    Bare,
}

impl ReferenceKind {
    pub fn of(reference: &str) -> Self {
        if reference.starts_with('/') {
            Self::RootAbsolute
        } else if reference.starts_with("./") || reference.starts_with("../") || reference == "." || reference == ".." {
            Self::Relative
        } else {
            Self::Bare
        }
    }
}

/// Ordered base paths a reference may denote.
pub fn base_candidates(
    app_root: &Path,
    context: &Path,
    reference: &str,
    module_dirs: &[String],
) -> Vec<PathBuf> {
    match ReferenceKind::of(reference) {
        ReferenceKind::RootAbsolute => {
            vec![app_root.join(reference.trim_start_matches('/')).clean()]
        }
        ReferenceKind::Relative => vec![context.join(reference).clean()],
        ReferenceKind::Bare => {
            let mut candidates = Vec::new();
            for dir in search_dirs(app_root, context) {
                for module_dir in module_dirs {
                    candidates.push(dir.join(module_dir).join(reference).clean());
                }
            }
            // Tolerate an omitted `./` prefix
            candidates.push(context.join(format!("./{reference}")).clean());
            candidates
        }
    }
}

/// Directories searched for package folders: the context and its ancestors,
/// stopping at the app root.
fn search_dirs<'a>(app_root: &'a Path, context: &'a Path) -> Vec<&'a Path> {
    if !context.starts_with(app_root) {
        return vec![context];
    }
    context
        .ancestors()
        .take_while(|dir| dir.starts_with(app_root))
        .collect()
}

/// File paths probed for one base: the base itself, then `base.<ext>`.
///
/// Extensions are appended rather than substituted so `btn.min` probes
/// `btn.min.js`, not `btn.js`.
pub fn file_candidates(base: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(extensions.len() + 1);
    candidates.push(base.to_path_buf());
    for ext in extensions {
        let mut with_ext = OsString::from(base.as_os_str());
        with_ext.push(".");
        with_ext.push(ext.trim_start_matches('.'));
        candidates.push(PathBuf::from(with_ext));
    }
    candidates
}
