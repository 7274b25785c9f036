use std::{io, mem, ptr, slice};

use tracing::debug;
use windows_sys::{
    core::PWSTR,
    Win32::{
        Foundation::{CloseHandle, LocalFree, ERROR_INSUFFICIENT_BUFFER, HANDLE},
        Security::{
            Authorization::ConvertSidToStringSidW, GetTokenInformation, TokenUser, TOKEN_QUERY,
            TOKEN_USER,
        },
        System::Threading::{GetCurrentProcess, GetCurrentThread, OpenProcessToken, OpenThreadToken},
    },
};

use super::{IdentityError, Sid};

/// Access token handle, closed on drop.
struct TokenHandle(HANDLE);

impl TokenHandle {
    /// Opens the current thread token for TOKEN_QUERY, falling back to the
    /// process token when the thread carries none (ERROR_NO_TOKEN). Any other
    /// failure is returned as the raw OS error.
    fn open_query() -> Result<Self, IdentityError> {
        let mut handle: HANDLE = ptr::null_mut();
        // SAFETY: GetCurrentThread/GetCurrentProcess return pseudo-handles
        // that need no release; the token handle is owned by the guard.
        unsafe {
            if OpenThreadToken(GetCurrentThread(), TOKEN_QUERY, 1, &mut handle) != 0 {
                debug!("using thread token");
                return Ok(Self(handle));
            }
            let err = io::Error::last_os_error();
            if !super::should_fall_back(&err) {
                return Err(err.into());
            }
            debug!("no thread token, using process token");
            if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut handle) == 0 {
                return Err(io::Error::last_os_error().into());
            }
        }
        Ok(Self(handle))
    }

    /// Queries TokenUser and renders the SID in canonical string form.
    fn user_sid(&self) -> Result<String, IdentityError> {
        // SAFETY: the buffer is sized by the first GetTokenInformation call
        // and usize-aligned, which satisfies TOKEN_USER's pointer alignment.
        unsafe {
            let mut size = 0u32;
            if GetTokenInformation(self.0, TokenUser, ptr::null_mut(), 0, &mut size) == 0 {
                let err = io::Error::last_os_error();
                if err.raw_os_error() != Some(ERROR_INSUFFICIENT_BUFFER as i32) {
                    return Err(err.into());
                }
            }

            let words = (size as usize).div_ceil(mem::size_of::<usize>());
            let mut buf = vec![0usize; words];
            if GetTokenInformation(self.0, TokenUser, buf.as_mut_ptr().cast(), size, &mut size)
                == 0
            {
                return Err(io::Error::last_os_error().into());
            }
            let user = &*buf.as_ptr().cast::<TOKEN_USER>();

            let mut string_sid: PWSTR = ptr::null_mut();
            if ConvertSidToStringSidW(user.User.Sid, &mut string_sid) == 0 {
                return Err(io::Error::last_os_error().into());
            }
            let len = (0..).take_while(|&i| *string_sid.add(i) != 0).count();
            let sid = String::from_utf16_lossy(slice::from_raw_parts(string_sid, len));
            LocalFree(string_sid.cast());
            Ok(sid)
        }
    }
}

impl Drop for TokenHandle {
    fn drop(&mut self) {
        // SAFETY: the handle was opened by open_query and not closed elsewhere.
        unsafe {
            CloseHandle(self.0);
        }
    }
}

pub fn current_user_sid() -> Result<Sid, IdentityError> {
    let token = TokenHandle::open_query()?;
    token.user_sid().map(Sid)
}
