use crate::core::asset::AssetFormat;
use crate::core::platform;
use crate::error::{Result, ToolupError};
use crate::utils::fs;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Component, Path, PathBuf};
use tar::Archive;
use zip::ZipArchive;

/// Extract the single executable named `executable` from an archive stream
/// into `dest`.
///
/// Entries whose base filename equals `executable` (case-insensitive, with a
/// trailing `.exe` ignored) are written below `dest`; every other entry is
/// skipped. An archive containing no matching entry extracts successfully —
/// the caller decides whether an absent binary matters.
pub fn extract(
    reader: impl Read,
    format: AssetFormat,
    executable: &str,
    dest: &Path,
) -> Result<()> {
    match format {
        AssetFormat::TarGz => extract_tar_gz(reader, executable, dest),
        AssetFormat::Zip => extract_zip(reader, executable, dest),
    }
}

fn extract_tar_gz(reader: impl Read, executable: &str, dest: &Path) -> Result<()> {
    let decoder = GzDecoder::new(reader);
    let mut archive = Archive::new(decoder);

    let entries = archive
        .entries()
        .map_err(|e| ToolupError::extraction(format!("reading tar archive: {e}")))?;

    for entry in entries {
        let mut entry =
            entry.map_err(|e| ToolupError::extraction(format!("reading tar entry: {e}")))?;
        let entry_path = entry
            .path()
            .map_err(|e| ToolupError::extraction(format!("reading tar entry path: {e}")))?
            .into_owned();

        if entry.header().entry_type().is_dir() {
            continue;
        }
        if !matches_executable(&entry_path, executable) {
            continue;
        }

        let out_path = safe_join(dest, &entry_path)?;
        write_executable(&out_path, &mut entry)?;
    }

    Ok(())
}

fn extract_zip(mut reader: impl Read, executable: &str, dest: &Path) -> Result<()> {
    // Zip needs random access, so the whole body is buffered first.
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|e| ToolupError::extraction(format!("buffering zip archive: {e}")))?;

    let mut archive = ZipArchive::new(Cursor::new(buf))
        .map_err(|e| ToolupError::extraction(format!("reading zip archive: {e}")))?;

    for index in 0..archive.len() {
        let mut file = archive
            .by_index(index)
            .map_err(|e| ToolupError::extraction(format!("reading zip entry: {e}")))?;
        let entry_path = PathBuf::from(file.name());

        if file.is_dir() {
            continue;
        }
        if !matches_executable(&entry_path, executable) {
            continue;
        }

        let out_path = safe_join(dest, &entry_path)?;
        write_executable(&out_path, &mut file)?;
    }

    Ok(())
}

fn matches_executable(entry_path: &Path, executable: &str) -> bool {
    let Some(file_name) = entry_path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    platform::strip_exe_suffix(file_name).eq_ignore_ascii_case(executable)
}

/// Join an archive entry's stored path onto `dest`, refusing entries that
/// would resolve outside it. Absolute paths and `..` segments both trip the
/// guard, which fails the whole extraction rather than skipping the entry.
fn safe_join(dest: &Path, entry_path: &Path) -> Result<PathBuf> {
    let mut out = dest.to_path_buf();
    for component in entry_path.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            _ => {
                return Err(ToolupError::PathTraversal {
                    entry: entry_path.display().to_string(),
                })
            }
        }
    }
    Ok(out)
}

/// Write entry bytes to a fresh file and force executable permission bits —
/// some releases ship binaries without them.
fn write_executable(path: &Path, reader: &mut impl Read) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::ensure_dir_exists(parent)?;
    }

    let mut file = File::create(path)
        .map_err(|e| ToolupError::extraction(format!("creating {}: {e}", path.display())))?;
    std::io::copy(reader, &mut file)
        .map_err(|e| ToolupError::extraction(format!("writing {}: {e}", path.display())))?;

    fs::make_executable(path)?;
    Ok(())
}
