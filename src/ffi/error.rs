//! Status code conversion and the buffer protocols shared by every call.

use log::warn;

use super::handles::Handle;
use super::raw::{RttiResult, RTTI_SUCCESS};
use crate::error::{Error, Result};
use crate::gateway::Gateway;

/// Check a status code and convert it to a Result.
///
/// On failure, the message the library recorded on `instance` is fetched
/// with the two-phase last-error protocol. Free functions pass the null
/// handle and get an error without a library message. A failure while
/// fetching the message never masks the original status.
pub fn check_status(gateway: &dyn Gateway, instance: Handle, code: RttiResult) -> Result<()> {
    if code == RTTI_SUCCESS {
        return Ok(());
    }

    let message = if instance.is_null() {
        String::new()
    } else {
        match last_error(gateway, instance) {
            Ok(message) => message.unwrap_or_default(),
            Err(err) => {
                warn!("could not fetch last error of {:?}: {}", instance, err);
                String::new()
            }
        }
    };

    Err(Error::native(code, message))
}

/// Query the last error recorded on `instance`.
///
/// The first call passes no buffer to learn the message size and whether an
/// error is recorded at all; only then is a buffer of that size passed.
pub fn last_error(gateway: &dyn Gateway, instance: Handle) -> Result<Option<String>> {
    let mut needed: u32 = 0;
    let mut has_error = false;

    let code = gateway.get_last_error(instance, &mut [], &mut needed, &mut has_error);
    if code != RTTI_SUCCESS {
        return Err(Error::native(code, String::new()));
    }
    if !has_error {
        return Ok(None);
    }

    let mut buffer = vec![0u8; needed as usize];
    let code = gateway.get_last_error(instance, &mut buffer, &mut needed, &mut has_error);
    if code != RTTI_SUCCESS {
        return Err(Error::native(code, String::new()));
    }

    Ok(has_error.then(|| decode_string(buffer)))
}

/// Read a string result through the two-phase buffer protocol.
///
/// `call` receives the buffer (empty for the size query) and the
/// needed-size out-parameter, and returns the call's status.
pub fn read_string<F>(gateway: &dyn Gateway, instance: Handle, mut call: F) -> Result<String>
where
    F: FnMut(&mut [u8], &mut u32) -> RttiResult,
{
    let mut needed: u32 = 0;
    check_status(gateway, instance, call(&mut [], &mut needed))?;
    if needed == 0 {
        return Ok(String::new());
    }

    let mut buffer = vec![0u8; needed as usize];
    check_status(gateway, instance, call(&mut buffer, &mut needed))?;

    Ok(decode_string(buffer))
}

fn decode_string(mut buffer: Vec<u8>) -> String {
    if let Some(end) = buffer.iter().position(|&b| b == 0) {
        buffer.truncate(end);
    }
    String::from_utf8(buffer)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
