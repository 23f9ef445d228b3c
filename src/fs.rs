// SPDX-License-Identifier: GPL-3.0-only

use uefi::status::{Result, Status};

/// Named byte streams, opened through the shell's path mappings.
pub trait FileService {
    type Handle;

    /// Prepares file access. Must succeed before `open` is used.
    fn initialize(&mut self) -> Result<()>;

    /// `mode` is a combination of the `uefi::fs::FILE_MODE_*` flags.
    fn open(&mut self, path: &str, mode: u64) -> Result<Self::Handle>;

    /// Reads up to `buf.len()` bytes, returning how many were read.
    fn read(&mut self, handle: &mut Self::Handle, buf: &mut [u8]) -> Result<usize>;

    fn close(&mut self, handle: Self::Handle);
}

/// A file that is closed when the guard goes out of scope.
pub struct OpenFile<'a, F: FileService + ?Sized> {
    fs: &'a mut F,
    handle: Option<F::Handle>,
}

impl<'a, F: FileService + ?Sized> OpenFile<'a, F> {
    pub fn open(fs: &'a mut F, path: &str, mode: u64) -> Result<Self> {
        let handle = fs.open(path, mode)?;
        debugln!("opened {}", path);
        Ok(Self {
            fs,
            handle: Some(handle),
        })
    }

    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.handle.as_mut() {
            Some(handle) => self.fs.read(handle, buf),
            None => Err(Status::INVALID_PARAMETER),
        }
    }

    /// Fills `buf` completely, failing with `END_OF_FILE` if the file is shorter.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..])? {
                0 => return Err(Status::END_OF_FILE),
                count => filled += count,
            }
        }
        Ok(())
    }
}

impl<'a, F: FileService + ?Sized> Drop for OpenFile<'a, F> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            debugln!("closing file");
            self.fs.close(handle);
        }
    }
}

/// A shell path such as `fs1:\UefiApplication.efi`, split into the
/// file system index and the path on that volume.
///
/// Only used when no shell is running. `fsN` then names the N-th handle
/// with a file system in firmware enumeration order, which need not match
/// the shell's mapping table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ShellPath<'a> {
    pub volume: usize,
    pub path: &'a str,
}

impl<'a> ShellPath<'a> {
    /// Paths without a mapping refer to the first file system.
    pub fn parse(full: &'a str) -> Result<Self> {
        let (volume, path) = match full.split_once(':') {
            Some((mapping, path)) => (Self::mapping_index(mapping)?, path),
            None => (0, full),
        };

        if path.is_empty() {
            return Err(Status::INVALID_PARAMETER);
        }

        Ok(Self { volume, path })
    }

    fn mapping_index(mapping: &str) -> Result<usize> {
        let digits = mapping
            .get(..2)
            .filter(|prefix| prefix.eq_ignore_ascii_case("fs"))
            .map(|_| &mapping[2..])
            .ok_or(Status::NO_MAPPING)?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Status::NO_MAPPING);
        }

        digits.parse().map_err(|_| Status::NO_MAPPING)
    }
}

/// Encodes `path` as a NUL-terminated UCS-2 string in `buf`.
pub fn encode_ucs2<'b>(path: &str, buf: &'b mut [u16]) -> Result<&'b [u16]> {
    let mut len = 0;
    for c in path.chars() {
        let w = u16::try_from(c as u32).map_err(|_| Status::INVALID_PARAMETER)?;
        // Keep one slot for the terminator
        if len + 1 >= buf.len() {
            return Err(Status::BUFFER_TOO_SMALL);
        }
        buf[len] = w;
        len += 1;
    }

    match buf.get_mut(len) {
        Some(end) => *end = 0,
        None => return Err(Status::BUFFER_TOO_SMALL),
    }

    Ok(&buf[..=len])
}
