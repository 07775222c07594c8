//! Executable inspection
//!
//! Reads the machine type out of a PE header and the file version out of
//! the `VS_FIXEDFILEINFO` resource. Both report failures as [`ProbeError`];
//! fallback policy belongs to the caller.

use crate::error::ProbeError;
use pppm_schema::{Architecture, Version};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Offset of `e_lfanew`, the PE header pointer at the end of the 64 byte DOS header.
const PE_POINTER_OFFSET: usize = 60;
/// Offset of the `Machine` field from the start of the PE header (after `PE\0\0`).
const MACHINE_OFFSET: usize = 4;
/// Only the head of the file is inspected.
const PROBE_LEN: u64 = 4096;

/// `dwSignature` of `VS_FIXEDFILEINFO` (0xFEEF04BD, little endian).
const FIXED_FILE_INFO_SIGNATURE: [u8; 4] = [0xBD, 0x04, 0xEF, 0xFE];

/// Read the raw PE machine-type value of an executable.
///
/// # Errors
///
/// Returns [`ProbeError::NotFound`] for a missing file, [`ProbeError::Read`]
/// if it cannot be read, and [`ProbeError::Truncated`] if the first 4096
/// bytes do not reach the header fields.
pub fn read_machine_type(path: &Path) -> Result<u16, ProbeError> {
    let file = File::open(path).map_err(|e| read_error(path, &e))?;
    let mut data = Vec::with_capacity(PROBE_LEN as usize);
    file.take(PROBE_LEN)
        .read_to_end(&mut data)
        .map_err(|e| read_error(path, &e))?;

    let truncated = |needed: usize| ProbeError::Truncated {
        path: path.to_path_buf(),
        len: data.len(),
        needed,
    };

    let pe_header = read_u32_le(&data, PE_POINTER_OFFSET)
        .ok_or_else(|| truncated(PE_POINTER_OFFSET + 4))? as usize;
    let machine_at = pe_header.saturating_add(MACHINE_OFFSET);
    let machine =
        read_u16_le(&data, machine_at).ok_or_else(|| truncated(machine_at.saturating_add(2)))?;

    tracing::trace!("{}: machine type {machine:#06x}", path.display());
    Ok(machine)
}

/// Probe the architecture of an executable. Unknown machine types map to
/// [`Architecture::Native`].
///
/// # Errors
///
/// Same as [`read_machine_type`].
pub fn probe_architecture(path: &Path) -> Result<Architecture, ProbeError> {
    read_machine_type(path).map(Architecture::from_machine)
}

/// Read the file version embedded in an executable's version resource.
///
/// Maps `dwFileVersionMS`/`dwFileVersionLS` onto major, minor and build.
///
/// # Errors
///
/// Returns [`ProbeError::NotFound`] or [`ProbeError::Read`] for unreadable
/// files and [`ProbeError::NoVersionInfo`] when no version resource is present.
pub fn read_file_version(path: &Path) -> Result<Version, ProbeError> {
    let file = File::open(path).map_err(|e| read_error(path, &e))?;
    let len = file.metadata().map_err(|e| read_error(path, &e))?.len();
    if len == 0 {
        return Err(ProbeError::NoVersionInfo(path.to_path_buf()));
    }

    // SAFETY: the map is read-only and dropped before returning. A concurrent
    // truncation of the executable by another process is outside our control,
    // same as for any reader of installed application binaries.
    #[allow(unsafe_code)]
    let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(|e| read_error(path, &e))?;

    let info = mmap
        .windows(FIXED_FILE_INFO_SIGNATURE.len())
        .position(|w| w == FIXED_FILE_INFO_SIGNATURE)
        .ok_or_else(|| ProbeError::NoVersionInfo(path.to_path_buf()))?;

    // dwSignature, dwStrucVersion, dwFileVersionMS, dwFileVersionLS
    let (Some(ms), Some(ls)) = (read_u32_le(&mmap, info + 8), read_u32_le(&mmap, info + 12)) else {
        return Err(ProbeError::NoVersionInfo(path.to_path_buf()));
    };

    Ok(Version::new(ms >> 16, ms & 0xFFFF, ls >> 16))
}

fn read_error(path: &Path, err: &io::Error) -> ProbeError {
    if err.kind() == io::ErrorKind::NotFound {
        ProbeError::NotFound(path.to_path_buf())
    } else {
        ProbeError::Read {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

fn read_u32_le(data: &[u8], at: usize) -> Option<u32> {
    let bytes = data.get(at..at.checked_add(4)?)?;
    bytes.try_into().ok().map(u32::from_le_bytes)
}

fn read_u16_le(data: &[u8], at: usize) -> Option<u16> {
    let bytes = data.get(at..at.checked_add(2)?)?;
    bytes.try_into().ok().map(u16::from_le_bytes)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Minimal DOS + PE header with the given machine type at `pe_offset`.
    pub(crate) fn pe_image(pe_offset: u32, machine: u16) -> Vec<u8> {
        let mut image = vec![0u8; pe_offset as usize + 24];
        image[0..2].copy_from_slice(b"MZ");
        image[60..64].copy_from_slice(&pe_offset.to_le_bytes());
        let pe = pe_offset as usize;
        image[pe..pe + 4].copy_from_slice(b"PE\0\0");
        image[pe + 4..pe + 6].copy_from_slice(&machine.to_le_bytes());
        image
    }

    fn write_temp(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_probe_x64() {
        let file = write_temp(&pe_image(0x80, 0x8664));
        assert_eq!(read_machine_type(file.path()).unwrap(), 0x8664);
        assert_eq!(probe_architecture(file.path()).unwrap(), Architecture::X64);
    }

    #[test]
    fn test_probe_x86_and_unknown() {
        let x86 = write_temp(&pe_image(0x40, 0x014c));
        assert_eq!(probe_architecture(x86.path()).unwrap(), Architecture::X86);

        let arm = write_temp(&pe_image(0x40, 0xaa64));
        assert_eq!(probe_architecture(arm.path()).unwrap(), Architecture::Native);
    }

    #[test]
    fn test_file_shorter_than_dos_header() {
        let file = write_temp(&[0x4d, 0x5a, 0, 0, 0, 0]);
        assert!(matches!(
            probe_architecture(file.path()),
            Err(ProbeError::Truncated { len: 6, .. })
        ));
    }

    #[test]
    fn test_pe_offset_beyond_probe_window() {
        let mut image = vec![0u8; 64];
        image[60..64].copy_from_slice(&8000u32.to_le_bytes());
        let file = write_temp(&image);
        assert!(matches!(
            read_machine_type(file.path()),
            Err(ProbeError::Truncated { needed: 8006, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.exe");
        assert_eq!(
            probe_architecture(&path),
            Err(ProbeError::NotFound(path.clone()))
        );
        assert_eq!(read_file_version(&path), Err(ProbeError::NotFound(path)));
    }

    #[test]
    fn test_read_file_version() {
        let mut image = pe_image(0x40, 0x8664);
        image.extend_from_slice(&[0u8; 3]);
        image.extend_from_slice(&FIXED_FILE_INFO_SIGNATURE);
        image.extend_from_slice(&0x0001_0000u32.to_le_bytes()); // dwStrucVersion
        image.extend_from_slice(&((5u32 << 16) | 2).to_le_bytes()); // 5.2
        image.extend_from_slice(&((7u32 << 16) | 99).to_le_bytes()); // build 7, private 99
        let file = write_temp(&image);
        assert_eq!(read_file_version(file.path()).unwrap(), Version::new(5, 2, 7));
    }

    #[test]
    fn test_no_version_resource() {
        let file = write_temp(&pe_image(0x40, 0x8664));
        assert!(matches!(
            read_file_version(file.path()),
            Err(ProbeError::NoVersionInfo(_))
        ));
        let empty = write_temp(&[]);
        assert!(matches!(
            read_file_version(empty.path()),
            Err(ProbeError::NoVersionInfo(_))
        ));
    }
}
