use std::{fmt, io};

use thiserror::Error;

#[cfg(windows)]
mod windows;

#[cfg(windows)]
use windows_sys::Win32::Foundation::ERROR_NO_TOKEN;
// Mirror of windows-sys ERROR_NO_TOKEN, so the fallback decision stays
// testable off windows.
#[cfg(not(windows))]
const ERROR_NO_TOKEN: u32 = 1008;

/// Only the absence of a thread token triggers the process-token fallback;
/// every other token-open failure is re-raised unchanged.
#[cfg_attr(not(windows), allow(dead_code))]
fn should_fall_back(err: &io::Error) -> bool {
    err.raw_os_error() == Some(ERROR_NO_TOKEN as i32)
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("current user lookup is only available on windows")]
    Unsupported,
}

/// A Windows security identifier in its canonical string form,
/// e.g. `S-1-5-21-...-1001`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sid(String);

impl Sid {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Sid {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for Sid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// SID of the user the process is running as. Prefers the thread token so
/// that impersonation is honored, and falls back to the process token when
/// no thread token exists. Other token-open failures propagate unchanged.
#[cfg(windows)]
pub fn current_user_sid() -> Result<Sid, IdentityError> {
    windows::current_user_sid()
}

#[cfg(not(windows))]
pub fn current_user_sid() -> Result<Sid, IdentityError> {
    Err(IdentityError::Unsupported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sid_display_round_trips() {
        let sid = Sid::from("S-1-5-18".to_string());
        assert_eq!(sid.to_string(), "S-1-5-18");
        assert_eq!(sid.as_str(), "S-1-5-18");
    }

    #[test]
    fn falls_back_only_when_no_token_exists() {
        const ERROR_ACCESS_DENIED: i32 = 5;

        let no_token = io::Error::from_raw_os_error(ERROR_NO_TOKEN as i32);
        assert!(should_fall_back(&no_token));

        let denied = io::Error::from_raw_os_error(ERROR_ACCESS_DENIED);
        assert!(!should_fall_back(&denied));
    }

    #[cfg(not(windows))]
    #[test]
    fn current_user_sid_unsupported_off_windows() {
        assert!(matches!(
            current_user_sid(),
            Err(IdentityError::Unsupported)
        ));
    }
}
