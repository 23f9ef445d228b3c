// SPDX-License-Identifier: GPL-3.0-only

//! Pre-boot sample application: waits for a key, reads the first bytes of
//! its own image and queries the protocol published by the sample driver.
//!
//! Firmware services are reached through the traits in [`console`], [`fs`]
//! and [`proto`]; the UEFI binary binds them to the system table.

#![cfg_attr(not(test), no_std)]
#![allow(non_snake_case)]

use uefi::status::{Result, Status};

#[macro_use]
pub mod debug;

pub mod app;
pub mod config;
pub mod console;
pub mod fs;
pub mod image;
pub mod proto;
pub mod shell;

#[cfg(test)]
mod fake;

const ERROR_BIT: usize = 1 << (usize::BITS - 1);

/// Errors become `Err`, success and warnings become `Ok`.
pub fn check(status: Status) -> Result<()> {
    if status.0 & ERROR_BIT != 0 {
        Err(status)
    } else {
        Ok(())
    }
}
