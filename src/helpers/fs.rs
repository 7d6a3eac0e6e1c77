//! Recipe file I/O
//!
//! The recipe is read once and written once. Writes go to a temporary file in
//! the same directory which is then renamed over the recipe, so the file is
//! never left half written.

use crate::core::error::BumpError;
use std::io::Write;
use std::path::Path;

/// Read a recipe file into memory.
pub fn read_recipe(path: &Path) -> Result<String, BumpError> {
    std::fs::read_to_string(path).map_err(|source| BumpError::RecipeIo {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace the recipe at `path` with `content` (temp file + rename).
///
/// The original file permissions are kept.
pub fn write_recipe_atomic(path: &Path, content: &str) -> Result<(), BumpError> {
    let io_err = |source: std::io::Error| BumpError::RecipeIo {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp_file = tempfile::NamedTempFile::new_in(parent).map_err(io_err)?;
    temp_file.write_all(content.as_bytes()).map_err(io_err)?;
    temp_file.as_file().sync_all().map_err(io_err)?;

    if let Ok(metadata) = std::fs::metadata(path) {
        temp_file
            .as_file()
            .set_permissions(metadata.permissions())
            .map_err(io_err)?;
    }

    // Atomic rename (same directory, same filesystem)
    temp_file.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
