// SPDX-License-Identifier: GPL-3.0-only

#![cfg_attr(target_os = "uefi", no_std)]
#![cfg_attr(target_os = "uefi", no_main)]
#![allow(non_snake_case)]

#[cfg(target_os = "uefi")]
extern crate alloc;
#[cfg(target_os = "uefi")]
#[macro_use]
extern crate uefi_std as std;

#[cfg(target_os = "uefi")]
mod firmware;

#[cfg(target_os = "uefi")]
#[no_mangle]
pub extern "C" fn main() -> uefi::status::Status {
    use core::ptr;
    use uefi_sample_app::app::{self, ImageInfo, Services};
    use uefi_sample_app::config::Config;

    use crate::firmware::{self, BootProtocols, Console, TextInput};

    let uefi = std::system_table();

    // Waiting for a key must not trip the boot watchdog
    let _ = (uefi.BootServices.SetWatchdogTimer)(0, 0, 0, ptr::null());

    let image = ImageInfo {
        handle: std::handle().0,
        system_table: uefi as *const _ as usize,
    };

    let config = Config::default();
    uefi_sample_app::debugln!("self path {}", config.self_path);

    let mut console = TextInput;
    let mut files = firmware::files();
    let services = Services {
        console: &mut console,
        files: &mut files,
        protocols: &BootProtocols,
    };

    app::run(services, &mut Console, image, &config)
}

#[cfg(not(target_os = "uefi"))]
fn main() {
    eprintln!("UefiApplication only runs as a UEFI image; build it for a *-unknown-uefi target");
    std::process::exit(1);
}
