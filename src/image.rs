// SPDX-License-Identifier: GPL-3.0-only

use plain::Plain;

/// DOS stub signature every PE/COFF image starts with.
pub const DOS_SIGNATURE: [u8; 2] = *b"MZ";

/// Leading bytes of an image file.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(C)]
pub struct ImageHeader {
    pub signature: [u8; 2],
    pub last_page_bytes: [u8; 2],
}

unsafe impl Plain for ImageHeader {}

impl ImageHeader {
    pub const SIZE: usize = 4;

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        plain::from_bytes::<Self>(bytes).ok().copied()
    }

    /// The header read as one little-endian 32-bit value.
    pub fn value(&self) -> u32 {
        let sig = self.signature;
        let last = self.last_page_bytes;
        u32::from_le_bytes([sig[0], sig[1], last[0], last[1]])
    }

    pub fn is_dos(&self) -> bool {
        self.signature == DOS_SIGNATURE
    }
}
