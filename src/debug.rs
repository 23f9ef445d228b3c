// SPDX-License-Identifier: GPL-3.0-only

use core::fmt::{self, Write};
use spin::Mutex;

/// Port the QEMU and coreboot debug consoles listen on.
pub const DEBUG_PORT: u16 = 0x402;

static DEBUG: Mutex<Debug> = Mutex::new(Debug);

pub struct Debug;

impl Write for Debug {
    #[cfg(all(feature = "debug", target_os = "uefi", any(target_arch = "x86", target_arch = "x86_64")))]
    fn write_str(&mut self, string: &str) -> Result<(), fmt::Error> {
        use hwio::{Io, Pio};

        let mut port = Pio::<u8>::new(DEBUG_PORT);
        for b in string.bytes() {
            port.write(b);
        }

        Ok(())
    }

    #[cfg(not(all(feature = "debug", target_os = "uefi", any(target_arch = "x86", target_arch = "x86_64"))))]
    fn write_str(&mut self, _string: &str) -> Result<(), fmt::Error> {
        Ok(())
    }
}

pub fn _debug(args: fmt::Arguments) {
    let _ = DEBUG.lock().write_fmt(args);
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => ($crate::debug::_debug(format_args!($($arg)*)));
}

#[macro_export]
macro_rules! debugln {
    () => ($crate::debug!("\n"));
    ($fmt:expr) => ($crate::debug!(concat!($fmt, "\n")));
    ($fmt:expr, $($arg:tt)*) => ($crate::debug!(concat!($fmt, "\n"), $($arg)*));
}
