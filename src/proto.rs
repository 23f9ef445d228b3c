// SPDX-License-Identifier: GPL-3.0-only

use core::ffi::c_void;
use core::ptr::NonNull;
use uefi::guid::Guid;
use uefi::status::Result;

/// An interface that can be discovered by its GUID.
pub trait Protocol {
    const GUID: Guid;
}

/// Protocol discovery, `LocateProtocol` style.
///
/// # Safety
///
/// A pointer returned by `locate_protocol` must refer to a live instance of
/// the interface named by `guid`, valid for as long as the service is
/// borrowed.
pub unsafe trait ProtocolLookupService {
    fn locate_protocol(&self, guid: &Guid) -> Result<NonNull<c_void>>;
}

/// Borrows the first published instance of `P`. The interface stays owned
/// by whoever installed it; nothing is released here.
pub fn locate<'a, P: Protocol, S: ProtocolLookupService + ?Sized>(service: &'a S) -> Result<&'a P> {
    let interface = service.locate_protocol(&P::GUID)?;
    Ok(unsafe { interface.cast::<P>().as_ref() })
}

pub fn same_guid(a: &Guid, b: &Guid) -> bool {
    a.0 == b.0 && a.1 == b.1 && a.2 == b.2 && a.3 == b.3
}

pub const SAMPLE_DRIVER_PROTOCOL_GUID: Guid = Guid(0x3c1d4a0f, 0x6e2b, 0x4f57, [0x9a, 0x41, 0x2d, 0x7c, 0x58, 0xe0, 0x13, 0xb6]);

/// Interface published by the companion sample driver.
#[repr(C)]
pub struct SampleDriverProtocol {
    pub SampleValue: usize,
}

impl Protocol for SampleDriverProtocol {
    const GUID: Guid = SAMPLE_DRIVER_PROTOCOL_GUID;
}
