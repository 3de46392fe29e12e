//! Percent-escaping for URL fragments.

use crate::error::{Result, UrlSyncError};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped when writing a fragment.
///
/// Everything except ASCII alphanumerics and `/ ? : @ & = + $ - _ . ~ #`.
/// In particular `! ' ( ) * ; ,` are always escaped, since some
/// intermediaries leave them raw and others do not.
pub const FRAGMENT_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'#');

/// Escape `text` for use in a URL fragment. Escapes use uppercase hex.
pub fn encode_fragment(text: &str) -> String {
    utf8_percent_encode(text, FRAGMENT_ESCAPE).to_string()
}

/// Decode one layer of percent-escaping.
///
/// Strict: a `%` not followed by two hex digits, or escapes that do not form
/// valid UTF-8, are errors rather than being passed through.
pub fn decode_component(s: &str) -> Result<String> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() >= i + 3
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(UrlSyncError::Decode(format!(
                    "malformed percent-escape at offset {}",
                    i
                )));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    percent_decode_str(s)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| UrlSyncError::Decode(format!("percent-escapes are not UTF-8: {}", e)))
}
