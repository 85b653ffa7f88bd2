//! ROM path resolution: loads a [`RomSet`] from a ZIP archive, a directory
//! (loose files or `{machine}.zip` inside it), or a single image file.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use dragon_machines::rom_loader::{RomLoadError, RomSet};
use log::debug;

fn zip_error(e: zip::result::ZipError) -> RomLoadError {
    RomLoadError::Io(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        format!("invalid ZIP: {e}"),
    ))
}

/// Resolve a ROM path and load every image it names.
///
/// Resolution order:
/// 1. `path` ends with `.zip`: load that archive.
/// 2. `path` is a directory holding `{machine_name}.zip`: load that archive.
/// 3. `path` is a directory: load its loose files.
/// 4. `path` is a file: a set of one image, named after the file.
pub fn load_rom_set(machine_name: &str, path: &Path) -> Result<RomSet, RomLoadError> {
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
    {
        return load_from_zip(path);
    }

    if path.is_dir() {
        let zip_path = path.join(format!("{machine_name}.zip"));
        if zip_path.is_file() {
            return load_from_zip(&zip_path);
        }
        return RomSet::from_directory(path);
    }

    if path.is_file() {
        return RomSet::from_file(path);
    }

    Err(RomLoadError::Io(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("ROM path not found: {}", path.display()),
    )))
}

/// Every file in a ZIP archive, keyed by its name without directories.
fn load_from_zip(path: &Path) -> Result<RomSet, RomLoadError> {
    let reader = BufReader::new(File::open(path)?);
    let mut archive = zip::ZipArchive::new(reader).map_err(zip_error)?;

    let mut rom_set = RomSet::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(zip_error)?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().rsplit('/').next().unwrap_or_default().to_string();
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data)?;
        debug!("{}: {name} ({} bytes)", path.display(), data.len());
        rom_set.insert(name, data);
    }
    Ok(rom_set)
}
