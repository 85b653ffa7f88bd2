//! ROM images for the machines.
//!
//! A [`RomSet`] is a bag of named images, read from a directory of dumps, a
//! ZIP archive unpacked by the host, or byte slices in tests. A machine
//! describes what it needs as a [`RomRegion`] of [`RomSpec`] entries and
//! assembles its ROM space from the set, checking sizes and (when known)
//! CRC-32 checksums.

use std::collections::HashMap;
use std::path::Path;

use dragon_core::core::MemoryError;
use log::debug;
use thiserror::Error;

// ---------------------------------------------------------------------------
// CRC-32
// ---------------------------------------------------------------------------

/// Reflected polynomial 0xEDB88320, as used by ZIP archives.
const CRC32_TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut i = 0u32;
    while i < 256 {
        let mut crc = i;
        let mut j = 0;
        while j < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ 0xEDB8_8320
            } else {
                crc >> 1
            };
            j += 1;
        }
        table[i as usize] = crc;
        i += 1;
    }
    table
};

pub fn crc32(data: &[u8]) -> u32 {
    !data.iter().fold(0xFFFF_FFFFu32, |crc, &byte| {
        (crc >> 8) ^ CRC32_TABLE[((crc ^ byte as u32) & 0xFF) as usize]
    })
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RomLoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing ROM file: {0}")]
    MissingFile(String),

    #[error("ROM {file}: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        file: String,
        expected: usize,
        actual: usize,
    },

    #[error("ROM {file}: CRC32 {actual:08X} matches none of the known dumps")]
    ChecksumMismatch { file: String, actual: u32 },

    #[error(transparent)]
    Memory(#[from] MemoryError),
}

// ---------------------------------------------------------------------------
// RomSet
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct RomSet {
    files: HashMap<String, Vec<u8>>,
}

impl RomSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every regular file in `path` (not recursive), keyed by file name.
    pub fn from_directory(path: &Path) -> Result<Self, RomLoadError> {
        let mut set = Self::new();
        for entry in std::fs::read_dir(path)? {
            let file_path = entry?.path();
            if !file_path.is_file() {
                continue;
            }
            if let Some(name) = file_path.file_name() {
                let data = std::fs::read(&file_path)?;
                set.insert(name.to_string_lossy().into_owned(), data);
            }
        }
        debug!("{} ROM files in {}", set.files.len(), path.display());
        Ok(set)
    }

    /// A set holding a single image file.
    pub fn from_file(path: &Path) -> Result<Self, RomLoadError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut set = Self::new();
        set.insert(name, std::fs::read(path)?);
        Ok(set)
    }

    /// Each entry is a `(file name, data)` pair.
    pub fn from_slices(entries: &[(&str, &[u8])]) -> Self {
        let mut set = Self::new();
        for (name, data) in entries {
            set.insert(name.to_string(), data.to_vec());
        }
        set
    }

    /// File names are matched case-insensitively, as dumps come in both.
    pub fn insert(&mut self, name: String, data: Vec<u8>) {
        self.files.insert(name.to_ascii_lowercase(), data);
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files
            .get(&name.to_ascii_lowercase())
            .map(|v| v.as_slice())
    }

    pub fn require(&self, name: &str) -> Result<&[u8], RomLoadError> {
        self.get(name)
            .ok_or_else(|| RomLoadError::MissingFile(name.to_string()))
    }

    pub fn require_sized(&self, name: &str, expected: usize) -> Result<&[u8], RomLoadError> {
        let data = self.require(name)?;
        if data.len() != expected {
            return Err(RomLoadError::SizeMismatch {
                file: name.to_string(),
                expected,
                actual: data.len(),
            });
        }
        Ok(data)
    }

    /// The only image in the set, if there is exactly one.
    pub fn sole_file(&self) -> Option<(&str, &[u8])> {
        if self.files.len() != 1 {
            return None;
        }
        self.files
            .iter()
            .next()
            .map(|(name, data)| (name.as_str(), data.as_slice()))
    }

    pub fn file_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.files.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

// ---------------------------------------------------------------------------
// RomSpec / RomRegion
// ---------------------------------------------------------------------------

/// One image file and where it lands inside its region.
#[derive(Debug)]
pub struct RomSpec {
    pub name: &'static str,
    pub size: usize,
    pub offset: usize,
    /// CRC-32 of every known good dump. Empty accepts any contents.
    pub crc32: &'static [u32],
    /// Missing optional images leave their part of the region zeroed.
    pub optional: bool,
}

impl RomSpec {
    pub const fn new(name: &'static str, size: usize, offset: usize) -> Self {
        Self {
            name,
            size,
            offset,
            crc32: &[],
            optional: false,
        }
    }

    pub const fn with_crc(mut self, crc32: &'static [u32]) -> Self {
        self.crc32 = crc32;
        self
    }

    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// A contiguous block of ROM space filled from one or more images.
#[derive(Debug)]
pub struct RomRegion {
    pub size: usize,
    pub entries: &'static [RomSpec],
}

impl RomRegion {
    pub fn load(&self, rom_set: &RomSet) -> Result<Vec<u8>, RomLoadError> {
        self.load_inner(rom_set, true)
    }

    /// Sizes are still checked; checksums are not.
    pub fn load_skip_checksums(&self, rom_set: &RomSet) -> Result<Vec<u8>, RomLoadError> {
        self.load_inner(rom_set, false)
    }

    fn load_inner(&self, rom_set: &RomSet, verify: bool) -> Result<Vec<u8>, RomLoadError> {
        let mut region = vec![0u8; self.size];

        for entry in self.entries {
            debug_assert!(
                entry.offset + entry.size <= self.size,
                "ROM {} overruns its region",
                entry.name
            );

            if entry.optional && rom_set.get(entry.name).is_none() {
                debug!("optional ROM {} not present", entry.name);
                continue;
            }
            let data = rom_set.require_sized(entry.name, entry.size)?;

            if verify && !entry.crc32.is_empty() {
                let actual = crc32(data);
                if !entry.crc32.contains(&actual) {
                    return Err(RomLoadError::ChecksumMismatch {
                        file: entry.name.to_string(),
                        actual,
                    });
                }
            }

            region[entry.offset..entry.offset + entry.size].copy_from_slice(data);
        }

        Ok(region)
    }
}
