// SPDX-License-Identifier: GPL-3.0-only

/// Where the application expects to find its own image.
pub const DEFAULT_SELF_PATH: &str = "fs1:\\UefiApplication.efi";

/// Build-time override of [`DEFAULT_SELF_PATH`].
pub const SELF_PATH: &str = match option_env!("UEFI_SAMPLE_SELF_PATH") {
    Some(path) => path,
    None => DEFAULT_SELF_PATH,
};

/// What to do when polling the console fails with anything but `NOT_READY`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PollErrorPolicy {
    /// Ignore the error and poll again.
    Retry,
    /// Hand the error back to the caller.
    Propagate,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub self_path: &'static str,
    pub poll_errors: PollErrorPolicy,
}

impl Default for Config {
    fn default() -> Self {
        let poll_errors = if cfg!(feature = "strict_input") {
            PollErrorPolicy::Propagate
        } else {
            PollErrorPolicy::Retry
        };

        Self {
            self_path: SELF_PATH,
            poll_errors,
        }
    }
}
