use std::env;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Look up an executable by name on a search path.
///
/// `search_path` uses the platform `PATH` syntax; `None` falls back to the
/// process `PATH`. Names containing a path separator are checked directly.
pub fn find_executable(name: &str, search_path: Option<&OsStr>) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }

    let direct = Path::new(name);
    if direct.components().count() > 1 {
        return is_executable(direct).then(|| direct.to_path_buf());
    }

    let path_var = match search_path {
        Some(path) => path.to_os_string(),
        None => env::var_os("PATH")?,
    };

    for dir in env::split_paths(&path_var) {
        let candidate = dir.join(name);
        if is_executable(&candidate) {
            return Some(candidate);
        }
        #[cfg(windows)]
        {
            let with_ext = candidate.with_extension("exe");
            if is_executable(&with_ext) {
                return Some(with_ext);
            }
        }
    }
    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// List the sub-directories of `root` that can be plugin candidates.
///
/// Names containing a `.` are skipped. The result is sorted so discovery
/// order does not depend on the filesystem.
pub fn list_candidate_dirs<P: AsRef<Path>>(root: P) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if name.contains('.') {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}
