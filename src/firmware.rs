// SPDX-License-Identifier: GPL-3.0-only

use alloc::vec::Vec;
use core::ffi::c_void;
use core::fmt;
use core::ptr::NonNull;
use std::fs::{File, FileSystem};
use std::proto::Protocol;
use uefi::guid::Guid;
use uefi::status::{Result, Status};
use uefi::text::TextInputKey;

use uefi_sample_app::check;
use uefi_sample_app::console::{ConsoleService, InputKey};
use uefi_sample_app::debugln;
use uefi_sample_app::fs::{encode_ucs2, FileService, ShellPath};
use uefi_sample_app::proto::ProtocolLookupService;
use uefi_sample_app::shell::ShellFiles;

/// Firmware text console.
pub struct Console;

impl fmt::Write for Console {
    fn write_str(&mut self, string: &str) -> fmt::Result {
        print!("{}", string);
        Ok(())
    }
}

pub struct TextInput;

impl ConsoleService for TextInput {
    fn read_key_stroke(&mut self) -> Result<InputKey> {
        let uefi = std::system_table();

        let mut input = TextInputKey {
            ScanCode: 0,
            UnicodeChar: 0,
        };

        check((uefi.ConsoleIn.ReadKeyStroke)(uefi.ConsoleIn, &mut input))?;

        Ok(InputKey {
            scan_code: input.ScanCode,
            unicode_char: input.UnicodeChar,
        })
    }

    fn wait_for_key_event(&mut self) -> Result<()> {
        let uefi = std::system_table();

        let mut index = 0;
        check((uefi.BootServices.WaitForEvent)(1, &uefi.ConsoleIn.WaitForKey, &mut index))
    }
}

/// Volumes with a file system, `fsN:` naming the N-th in enumeration order.
pub struct Volumes {
    volumes: Vec<FileSystem>,
}

impl Volumes {
    pub fn new() -> Self {
        Self { volumes: Vec::new() }
    }
}

impl FileService for Volumes {
    type Handle = File;

    fn initialize(&mut self) -> Result<()> {
        self.volumes = FileSystem::all();
        debugln!("found {} file systems", self.volumes.len());
        if self.volumes.is_empty() {
            return Err(Status::NOT_FOUND);
        }
        Ok(())
    }

    fn open(&mut self, path: &str, _mode: u64) -> Result<File> {
        let shell_path = ShellPath::parse(path)?;
        let volume = self.volumes.get_mut(shell_path.volume).ok_or(Status::NO_MAPPING)?;

        let mut name = [0u16; 256];
        let name = encode_ucs2(shell_path.path, &mut name)?;

        // Dir::open always opens for reading
        let mut root = volume.root()?;
        root.open(name)
    }

    fn read(&mut self, handle: &mut File, buf: &mut [u8]) -> Result<usize> {
        handle.read(buf)
    }

    fn close(&mut self, handle: File) {
        drop(handle);
    }
}

/// Files through the running shell, or through [`Volumes`] without one.
pub fn files() -> ShellFiles<'static, BootProtocols, Volumes> {
    ShellFiles::new(&BootProtocols, Volumes::new())
}

pub struct BootProtocols;

// LocateProtocol hands back the interface installed for the requested GUID
unsafe impl ProtocolLookupService for BootProtocols {
    fn locate_protocol(&self, guid: &Guid) -> Result<NonNull<c_void>> {
        let uefi = std::system_table();

        let mut interface = 0;
        check((uefi.BootServices.LocateProtocol)(guid, 0, &mut interface))?;

        NonNull::new(interface as *mut c_void).ok_or(Status::NOT_FOUND)
    }
}
