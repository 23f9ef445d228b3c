// SPDX-License-Identifier: GPL-3.0-only

use core::ffi::c_void;
use core::ptr::{self, NonNull};
use uefi::guid::Guid;
use uefi::status::{Result, Status};

use crate::check;
use crate::fs::{encode_ucs2, FileService};
use crate::proto::{self, Protocol, ProtocolLookupService};

pub const SHELL_PROTOCOL_GUID: Guid = Guid(0x6302d008, 0x7f9b, 0x4f30, [0x87, 0xac, 0x60, 0xc9, 0xfe, 0xf5, 0xda, 0x4e]);

pub type ShellFileHandle = *mut c_void;

/// `EFI_SHELL_PROTOCOL`, installed by a running UEFI shell.
#[repr(C)]
pub struct ShellProtocol {
    pub Execute: extern "efiapi" fn(),
    pub GetEnv: extern "efiapi" fn(),
    pub SetEnv: extern "efiapi" fn(),
    pub GetAlias: extern "efiapi" fn(),
    pub SetAlias: extern "efiapi" fn(),
    pub GetHelpText: extern "efiapi" fn(),
    pub GetDevicePathFromMap: extern "efiapi" fn(),
    pub GetMapFromDevicePath: extern "efiapi" fn(),
    pub GetDevicePathFromFilePath: extern "efiapi" fn(),
    pub GetFilePathFromDevicePath: extern "efiapi" fn(),
    pub SetMap: extern "efiapi" fn(),
    pub GetCurDir: extern "efiapi" fn(),
    pub SetCurDir: extern "efiapi" fn(),
    pub OpenFileList: extern "efiapi" fn(),
    pub FreeFileList: extern "efiapi" fn(),
    pub RemoveDupInFileList: extern "efiapi" fn(),
    pub BatchIsActive: extern "efiapi" fn(),
    pub IsRootShell: extern "efiapi" fn(),
    pub EnablePageBreak: extern "efiapi" fn(),
    pub DisablePageBreak: extern "efiapi" fn(),
    pub GetPageBreak: extern "efiapi" fn(),
    pub GetDeviceName: extern "efiapi" fn(),
    pub GetFileInfo: extern "efiapi" fn(),
    pub SetFileInfo: extern "efiapi" fn(),
    pub OpenFileByName: extern "efiapi" fn(
        FileName: *const u16,
        FileHandle: &mut ShellFileHandle,
        OpenMode: u64,
    ) -> Status,
    pub CloseFile: extern "efiapi" fn(FileHandle: ShellFileHandle) -> Status,
    pub CreateFile: extern "efiapi" fn(),
    pub ReadFile: extern "efiapi" fn(
        FileHandle: ShellFileHandle,
        ReadSize: &mut usize,
        Buffer: *mut c_void,
    ) -> Status,
    pub WriteFile: extern "efiapi" fn(),
    pub DeleteFile: extern "efiapi" fn(),
    pub DeleteFileByName: extern "efiapi" fn(),
    pub GetFilePosition: extern "efiapi" fn(),
    pub SetFilePosition: extern "efiapi" fn(),
    pub FlushFile: extern "efiapi" fn(),
    pub FindFiles: extern "efiapi" fn(),
    pub FindFilesInDir: extern "efiapi" fn(),
    pub GetFileSize: extern "efiapi" fn(),
    pub OpenRoot: extern "efiapi" fn(),
    pub OpenRootByHandle: extern "efiapi" fn(),
    pub ExecutionBreak: usize,
    pub MajorVersion: u32,
    pub MinorVersion: u32,
}

impl Protocol for ShellProtocol {
    const GUID: Guid = SHELL_PROTOCOL_GUID;
}

pub enum ShellHandle<H> {
    Shell(NonNull<c_void>),
    Volume(H),
}

/// Files opened by shell path. A running shell resolves `fsN:` through its
/// own mapping table; without one, `volumes` is asked instead.
pub struct ShellFiles<'a, P: ?Sized, V> {
    protocols: &'a P,
    shell: Option<&'a ShellProtocol>,
    volumes: V,
}

impl<'a, P: ProtocolLookupService + ?Sized, V: FileService> ShellFiles<'a, P, V> {
    pub fn new(protocols: &'a P, volumes: V) -> Self {
        Self {
            protocols,
            shell: None,
            volumes,
        }
    }

    pub fn volumes(&self) -> &V {
        &self.volumes
    }

    pub fn has_shell(&self) -> bool {
        self.shell.is_some()
    }
}

impl<'a, P: ProtocolLookupService + ?Sized, V: FileService> FileService for ShellFiles<'a, P, V> {
    type Handle = ShellHandle<V::Handle>;

    fn initialize(&mut self) -> Result<()> {
        match proto::locate::<ShellProtocol, _>(self.protocols) {
            Ok(shell) => {
                debugln!("shell {}.{}", shell.MajorVersion, shell.MinorVersion);
                self.shell = Some(shell);
                Ok(())
            }
            Err(err) => {
                debugln!("no shell: {}", err);
                self.shell = None;
                self.volumes.initialize()
            }
        }
    }

    fn open(&mut self, path: &str, mode: u64) -> Result<Self::Handle> {
        let shell = match self.shell {
            Some(shell) => shell,
            None => return self.volumes.open(path, mode).map(ShellHandle::Volume),
        };

        let mut name = [0u16; 256];
        let name = encode_ucs2(path, &mut name)?;

        let mut file = ptr::null_mut();
        check((shell.OpenFileByName)(name.as_ptr(), &mut file, mode))?;
        NonNull::new(file).map(ShellHandle::Shell).ok_or(Status::NOT_FOUND)
    }

    fn read(&mut self, handle: &mut Self::Handle, buf: &mut [u8]) -> Result<usize> {
        match (self.shell, handle) {
            (Some(shell), ShellHandle::Shell(file)) => {
                let mut size = buf.len();
                check((shell.ReadFile)(file.as_ptr(), &mut size, buf.as_mut_ptr().cast()))?;
                Ok(size)
            }
            (_, ShellHandle::Volume(file)) => self.volumes.read(file, buf),
            (None, ShellHandle::Shell(_)) => Err(Status::INVALID_PARAMETER),
        }
    }

    fn close(&mut self, handle: Self::Handle) {
        match handle {
            ShellHandle::Shell(file) => {
                if let Some(shell) = self.shell {
                    let _ = (shell.CloseFile)(file.as_ptr());
                }
            }
            ShellHandle::Volume(file) => self.volumes.close(file),
        }
    }
}
