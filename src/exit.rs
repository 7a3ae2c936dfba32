// src/exit.rs
//! Standardized process exit codes for `infoflow`.
//!
//! Provides a stable contract for scripts and schedulers that trigger runs.

use std::process::Termination;

use crate::error::InfoflowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum InfoflowExit {
    /// Analysis completed (possibly with skipped flagged items).
    Success = 0,
    /// Generic error (I/O, unexpected failure).
    Error = 1,
    /// Input or configuration could not be parsed or validated.
    InvalidInput = 2,
}

impl InfoflowExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }
}

impl Termination for InfoflowExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}

impl From<&anyhow::Error> for InfoflowExit {
    fn from(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<InfoflowError>() {
            Some(e) if e.is_input_error() => Self::InvalidInput,
            _ => Self::Error,
        }
    }
}

impl From<anyhow::Result<()>> for InfoflowExit {
    fn from(res: anyhow::Result<()>) -> Self {
        match res {
            Ok(()) => Self::Success,
            Err(e) => Self::from(&e),
        }
    }
}
