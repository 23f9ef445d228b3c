// SPDX-License-Identifier: GPL-3.0-only

use core::fmt::Write;
use uefi::fs::FILE_MODE_READ;
use uefi::status::{Result, Status};

use crate::config::Config;
use crate::console::{wait_for_key, ConsoleService, Key};
use crate::fs::{FileService, OpenFile};
use crate::image::ImageHeader;
use crate::proto::{self, ProtocolLookupService, SampleDriverProtocol};

pub const BANNER: &str = concat!("UEFI Sample Application ", env!("CARGO_PKG_VERSION"));

/// Addresses handed to the entry point by the firmware.
#[derive(Clone, Copy, Debug)]
pub struct ImageInfo {
    pub handle: usize,
    pub system_table: usize,
}

pub struct Services<'a, C, F, P> {
    pub console: &'a mut C,
    pub files: &'a mut F,
    pub protocols: &'a P,
}

/// Runs the application and returns its exit status: `SUCCESS` only when
/// every step succeeded, otherwise the status of the step that failed.
pub fn run<C, F, P, W>(services: Services<C, F, P>, out: &mut W, image: ImageInfo, config: &Config) -> Status
where
    C: ConsoleService,
    F: FileService,
    P: ProtocolLookupService,
    W: Write,
{
    match sequence(services, out, image, config) {
        Ok(()) => Status::SUCCESS,
        Err(err) => err,
    }
}

fn report<W: Write>(out: &mut W, what: &str, err: Status) -> Status {
    let _ = writeln!(out, "{}: {}", what, err);
    debugln!("{}: {}", what, err);
    err
}

fn read_header<F: FileService>(file: &mut OpenFile<F>) -> Result<ImageHeader> {
    let mut bytes = [0; ImageHeader::SIZE];
    file.read_exact(&mut bytes)?;
    ImageHeader::from_bytes(&bytes).ok_or(Status::BAD_BUFFER_SIZE)
}

fn sequence<C, F, P, W>(services: Services<C, F, P>, out: &mut W, image: ImageInfo, config: &Config) -> Result<()>
where
    C: ConsoleService,
    F: FileService,
    P: ProtocolLookupService,
    W: Write,
{
    let Services { console, files, protocols } = services;

    let _ = writeln!(out, "Press any key to continue...");
    let input = wait_for_key(console, config.poll_errors)
        .map_err(|err| report(out, "Failed to get keystroke", err))?;

    let _ = writeln!(out, "{}", BANNER);
    let _ = writeln!(out, "Key pressed: {:?}", Key::from(input));
    let _ = writeln!(
        out,
        "Image handle is {:#x} and system table is at {:#x}",
        image.handle, image.system_table
    );

    files
        .initialize()
        .map_err(|err| report(out, "Failed to initialize file access", err))?;

    // Closed when this goes out of scope, whichever step below fails
    let mut file = OpenFile::open(files, config.self_path, FILE_MODE_READ)
        .map_err(|err| report(out, "Failed to open ourselves", err))?;

    let header = read_header(&mut file)
        .map_err(|err| report(out, "Failed to read ourselves", err))?;
    let _ = writeln!(out, "Data: {:#010x}", header.value());
    if header.is_dos() {
        let _ = writeln!(out, "Image has a DOS (MZ) header");
    } else {
        let _ = writeln!(out, "Image header signature not recognized");
    }

    let sample = proto::locate::<SampleDriverProtocol, _>(protocols)
        .map_err(|err| report(out, "Failed to locate the sample driver", err))?;
    let _ = writeln!(out, "Sample driver is loaded: {:#x}", sample.SampleValue);

    Ok(())
}
