// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Local file-system helpers used by test code: whole-file text reads,
//! bundled resource lookup, recursive directory cleanup and extension-based
//! listings.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[cfg(windows)]
const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
const LINE_SEPARATOR: &str = "\n";

/// Read a text file and return its contents as a single string.
///
/// The file is read line by line; every line, including the last, is followed
/// by the platform line separator, so content round-trips modulo separator
/// normalization.
///
/// Fails with [`Error::NotFound`] if the path does not exist.
pub fn read_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::not_found(path));
    }

    let file = fs::File::open(path).map_err(|e| Error::io(path, e))?;
    let size = file.metadata().map(|m| m.len() as usize).unwrap_or(0);
    let reader = BufReader::new(file);

    let mut contents = String::with_capacity(size);
    for line in reader.lines() {
        let line = line.map_err(|e| Error::io(path, e))?;
        contents.push_str(&line);
        contents.push_str(LINE_SEPARATOR);
    }
    Ok(contents)
}

/// Resolve a bundled resource name to an absolute path.
///
/// Probes the name itself relative to the working directory, then
/// `resources/<name>`, then `tests/resources/<name>`, returning the first
/// hit canonicalized. Fails with [`Error::NotFound`] if the resource is
/// absent everywhere.
pub fn resource_path(name: &str) -> Result<PathBuf> {
    let candidates = [
        PathBuf::from(name),
        Path::new("resources").join(name),
        Path::new("tests").join("resources").join(name),
    ];

    for candidate in &candidates {
        if candidate.exists() {
            tracing::debug!("resolved resource '{}' to {:?}", name, candidate);
            return candidate.canonicalize().map_err(|e| Error::io(candidate, e));
        }
    }

    Err(Error::not_found(name))
}

/// Delete everything under `root`, leaving `root` itself in place.
///
/// Traversal is depth-first post-order, so directories are always empty by
/// the time they are removed. Partial deletion is not rolled back: the first
/// entry that cannot be removed fails the call with [`Error::Io`] naming
/// that entry.
///
/// Fails with [`Error::NotFound`] if `root` is missing or not a directory.
pub fn delete_dir_contents(root: impl AsRef<Path>) -> Result<()> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(Error::not_found(root));
    }

    for entry in fs::read_dir(root).map_err(|e| Error::io(root, e))? {
        let entry = entry.map_err(|e| Error::io(root, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| Error::io(&path, e))?;

        if file_type.is_dir() {
            remove_tree(&path)?;
        } else {
            // Symlinks are removed, never followed.
            fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
        }
    }
    Ok(())
}

fn remove_tree(dir: &Path) -> Result<()> {
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| Error::io(&path, e))?;

        if file_type.is_dir() {
            remove_tree(&path)?;
        } else {
            fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
        }
    }
    fs::remove_dir(dir).map_err(|e| Error::io(dir, e))
}

/// List files directly inside `dir` whose name ends with `ext`,
/// case-insensitive. Non-recursive; directories are never included.
///
/// Returns an empty vector when nothing matches. Fails with
/// [`Error::NotFound`] when `dir` is missing or not a directory.
pub fn list_files_by_extension(dir: impl AsRef<Path>, ext: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::not_found(dir));
    }

    let ext_lower = ext.to_lowercase();
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if name.ends_with(&ext_lower) {
            files.push(entry.path());
        }
    }
    Ok(files)
}
