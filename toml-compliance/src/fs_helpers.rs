//! Filesystem helpers shared across `toml-compliance` modules.

use std::io::Read;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::error::ComplianceError;

/// Opens a directory if it exists, returning `None` when the path is missing.
pub fn open_optional_dir(path: &Utf8Path) -> Result<Option<Dir>, ComplianceError> {
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => Ok(Some(dir)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(ComplianceError::Io {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}

/// Reads a whole file into memory.
pub fn read_bytes(path: &Utf8Path) -> Result<Vec<u8>, ComplianceError> {
    let io_error = |source| ComplianceError::Io {
        path: path.to_path_buf(),
        source,
    };
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let name = path.file_name().ok_or_else(|| {
        io_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path has no file name",
        ))
    })?;

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_error)?;
    let mut file = dir.open(name).map_err(io_error)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer).map_err(io_error)?;
    Ok(buffer)
}
