// SPDX-License-Identifier: GPL-3.0-only

//! Scripted stand-ins for the firmware services.

use core::ffi::c_void;
use core::ptr::NonNull;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use uefi::guid::Guid;
use uefi::status::{Result, Status};

use crate::console::{ConsoleService, InputKey};
use crate::fs::FileService;
use crate::proto::{same_guid, Protocol, ProtocolLookupService, SampleDriverProtocol};
use crate::shell::{ShellFileHandle, ShellProtocol};

pub struct FakeConsole {
    script: VecDeque<Result<InputKey>>,
    pub polls: usize,
    pub waits: usize,
    pub wait_status: Option<Status>,
}

impl FakeConsole {
    pub fn new(script: Vec<Result<InputKey>>) -> Self {
        Self {
            script: script.into(),
            polls: 0,
            waits: 0,
            wait_status: None,
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl ConsoleService for FakeConsole {
    fn read_key_stroke(&mut self) -> Result<InputKey> {
        self.polls += 1;
        self.script.pop_front().expect("console polled after the script ran out")
    }

    fn wait_for_key_event(&mut self) -> Result<()> {
        self.waits += 1;
        match self.wait_status {
            Some(status) => Err(status),
            None => Ok(()),
        }
    }
}

pub struct FakeFiles {
    contents: Vec<u8>,
    position: usize,
    /// Largest number of bytes handed out per read
    pub chunk: usize,
    pub init_status: Option<Status>,
    pub open_status: Option<Status>,
    pub read_status: Option<Status>,
    pub opened_path: Option<String>,
    pub opened_mode: Option<u64>,
    pub reads: usize,
    pub closes: usize,
}

impl FakeFiles {
    pub fn with_contents(contents: &[u8]) -> Self {
        Self {
            contents: contents.to_vec(),
            position: 0,
            chunk: usize::MAX,
            init_status: None,
            open_status: None,
            read_status: None,
            opened_path: None,
            opened_mode: None,
            reads: 0,
            closes: 0,
        }
    }
}

impl FileService for FakeFiles {
    type Handle = u32;

    fn initialize(&mut self) -> Result<()> {
        match self.init_status {
            Some(status) => Err(status),
            None => Ok(()),
        }
    }

    fn open(&mut self, path: &str, mode: u64) -> Result<u32> {
        if let Some(status) = self.open_status {
            return Err(status);
        }
        self.opened_path = Some(path.to_string());
        self.opened_mode = Some(mode);
        Ok(1)
    }

    fn read(&mut self, handle: &mut u32, buf: &mut [u8]) -> Result<usize> {
        assert_eq!(*handle, 1, "read through a handle that was never opened");
        self.reads += 1;
        if let Some(status) = self.read_status {
            return Err(status);
        }

        let rest = &self.contents[self.position..];
        let count = rest.len().min(buf.len()).min(self.chunk);
        buf[..count].copy_from_slice(&rest[..count]);
        self.position += count;
        Ok(count)
    }

    fn close(&mut self, handle: u32) {
        assert_eq!(handle, 1, "closed a handle that was never opened");
        self.closes += 1;
    }
}

/// The only file the fake shell knows about.
pub const SHELL_FILE: &str = "fs1:\\UefiApplication.efi";

#[derive(Clone, Default)]
pub struct ShellState {
    pub contents: Vec<u8>,
    pub position: usize,
    pub opened: Option<String>,
    pub mode: Option<u64>,
    pub closes: usize,
}

thread_local! {
    static SHELL: RefCell<ShellState> = RefCell::new(ShellState::default());
}

pub fn shell_state() -> ShellState {
    SHELL.with(|shell| shell.borrow().clone())
}

const SHELL_HANDLE: usize = 0x5e11;

extern "efiapi" fn shell_unused() {
    panic!("unexpected shell call");
}

extern "efiapi" fn shell_open(name: *const u16, handle: &mut ShellFileHandle, mode: u64) -> Status {
    let name = unsafe {
        let mut len = 0;
        while *name.add(len) != 0 {
            len += 1;
        }
        String::from_utf16_lossy(std::slice::from_raw_parts(name, len))
    };

    if name != SHELL_FILE {
        return Status::NOT_FOUND;
    }

    SHELL.with(|shell| {
        let mut shell = shell.borrow_mut();
        shell.opened = Some(name);
        shell.mode = Some(mode);
    });
    *handle = SHELL_HANDLE as ShellFileHandle;
    Status::SUCCESS
}

extern "efiapi" fn shell_read(handle: ShellFileHandle, size: &mut usize, buffer: *mut c_void) -> Status {
    assert_eq!(handle as usize, SHELL_HANDLE);
    SHELL.with(|shell| {
        let mut shell = shell.borrow_mut();
        let count = (*size).min(shell.contents.len() - shell.position);
        let start = shell.position;
        let buf = unsafe { std::slice::from_raw_parts_mut(buffer as *mut u8, count) };
        buf.copy_from_slice(&shell.contents[start..start + count]);
        shell.position += count;
        *size = count;
    });
    Status::SUCCESS
}

extern "efiapi" fn shell_close(handle: ShellFileHandle) -> Status {
    assert_eq!(handle as usize, SHELL_HANDLE);
    SHELL.with(|shell| shell.borrow_mut().closes += 1);
    Status::SUCCESS
}

fn fake_shell() -> ShellProtocol {
    ShellProtocol {
        Execute: shell_unused,
        GetEnv: shell_unused,
        SetEnv: shell_unused,
        GetAlias: shell_unused,
        SetAlias: shell_unused,
        GetHelpText: shell_unused,
        GetDevicePathFromMap: shell_unused,
        GetMapFromDevicePath: shell_unused,
        GetDevicePathFromFilePath: shell_unused,
        GetFilePathFromDevicePath: shell_unused,
        SetMap: shell_unused,
        GetCurDir: shell_unused,
        SetCurDir: shell_unused,
        OpenFileList: shell_unused,
        FreeFileList: shell_unused,
        RemoveDupInFileList: shell_unused,
        BatchIsActive: shell_unused,
        IsRootShell: shell_unused,
        EnablePageBreak: shell_unused,
        DisablePageBreak: shell_unused,
        GetPageBreak: shell_unused,
        GetDeviceName: shell_unused,
        GetFileInfo: shell_unused,
        SetFileInfo: shell_unused,
        OpenFileByName: shell_open,
        CloseFile: shell_close,
        CreateFile: shell_unused,
        ReadFile: shell_read,
        WriteFile: shell_unused,
        DeleteFile: shell_unused,
        DeleteFileByName: shell_unused,
        GetFilePosition: shell_unused,
        SetFilePosition: shell_unused,
        FlushFile: shell_unused,
        FindFiles: shell_unused,
        FindFilesInDir: shell_unused,
        GetFileSize: shell_unused,
        OpenRoot: shell_unused,
        OpenRootByHandle: shell_unused,
        ExecutionBreak: 0,
        MajorVersion: 2,
        MinorVersion: 2,
    }
}

pub struct FakeProtocols {
    sample: Option<Box<SampleDriverProtocol>>,
    shell: Option<Box<ShellProtocol>>,
    pub lookups: Cell<usize>,
}

impl FakeProtocols {
    pub fn empty() -> Self {
        Self {
            sample: None,
            shell: None,
            lookups: Cell::new(0),
        }
    }

    pub fn with_sample(value: usize) -> Self {
        Self {
            sample: Some(Box::new(SampleDriverProtocol { SampleValue: value })),
            ..Self::empty()
        }
    }

    /// Publishes a shell that serves `contents` as [`SHELL_FILE`].
    pub fn with_shell(mut self, contents: &[u8]) -> Self {
        SHELL.with(|shell| {
            *shell.borrow_mut() = ShellState {
                contents: contents.to_vec(),
                ..ShellState::default()
            }
        });
        self.shell = Some(Box::new(fake_shell()));
        self
    }
}

fn published<T>(interface: &Option<Box<T>>) -> Result<NonNull<c_void>> {
    match interface.as_deref() {
        Some(interface) => Ok(NonNull::from(interface).cast()),
        None => Err(Status::NOT_FOUND),
    }
}

unsafe impl ProtocolLookupService for FakeProtocols {
    fn locate_protocol(&self, guid: &Guid) -> Result<NonNull<c_void>> {
        self.lookups.set(self.lookups.get() + 1);
        if same_guid(guid, &SampleDriverProtocol::GUID) {
            published(&self.sample)
        } else if same_guid(guid, &ShellProtocol::GUID) {
            published(&self.shell)
        } else {
            Err(Status::NOT_FOUND)
        }
    }
}
