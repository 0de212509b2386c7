//! OTP shape checks: modhex validation, Dvorak remapping and device identity.

use crate::yubicoerror::YubicoError;
use crate::Result;

const MIN_LENGTH: usize = 32;
const MAX_LENGTH: usize = 48;

/// Length of the encrypted part that follows the public device identity.
const PAYLOAD_LENGTH: usize = 32;

/// The modhex alphabet a Yubikey types on a QWERTY layout.
const MODHEX: &[u8; 16] = b"cbdefghijklnrtuv";

/// The same keystrokes as seen by a host configured for Dvorak, paired with their modhex letter.
const DVORAK_TO_MODHEX: [(u8, u8); 16] = [
    (b'j', b'c'),
    (b'x', b'b'),
    (b'e', b'd'),
    (b'.', b'e'),
    (b'u', b'f'),
    (b'i', b'g'),
    (b'd', b'h'),
    (b'c', b'i'),
    (b'h', b'j'),
    (b't', b'k'),
    (b'n', b'l'),
    (b'b', b'n'),
    (b'p', b'r'),
    (b'y', b't'),
    (b'g', b'u'),
    (b'k', b'v'),
];

/// Checks that `otp` looks like a Yubikey OTP and returns it in modhex.
///
/// Input typed on a Dvorak layout is translated when every character belongs to
/// the Dvorak alphabet. Mixed input is rejected rather than partially translated.
pub fn normalize_and_validate(otp: &str) -> Result<String> {
    if !has_valid_length(otp) {
        return Err(YubicoError::InvalidLength);
    }

    if otp.chars().all(is_modhex) {
        return Ok(otp.to_string());
    }

    let translated = otp
        .chars()
        .map(dvorak_to_modhex)
        .collect::<Option<String>>()
        .ok_or(YubicoError::InvalidFormat)?;

    if !has_valid_length(&translated) {
        return Err(YubicoError::InvalidLength);
    }
    if !translated.chars().all(is_modhex) {
        return Err(YubicoError::InvalidFormat);
    }

    Ok(translated)
}

/// Public identity of the device that produced `otp`: everything before the last 32 characters.
///
/// Never fails; anything too short to carry an identity yields an empty string.
pub fn identity_of(otp: &str) -> &str {
    if otp.len() <= PAYLOAD_LENGTH {
        return "";
    }
    otp.get(..otp.len() - PAYLOAD_LENGTH).unwrap_or("")
}

fn has_valid_length(otp: &str) -> bool {
    let length = otp.chars().count();
    (MIN_LENGTH..=MAX_LENGTH).contains(&length)
}

fn is_modhex(c: char) -> bool {
    c.is_ascii() && MODHEX.contains(&(c.to_ascii_lowercase() as u8))
}

fn dvorak_to_modhex(c: char) -> Option<char> {
    if !c.is_ascii() {
        return None;
    }
    let lower = c.to_ascii_lowercase() as u8;
    DVORAK_TO_MODHEX
        .iter()
        .find(|(dvorak, _)| *dvorak == lower)
        .map(|&(_, modhex)| {
            if c.is_ascii_uppercase() {
                (modhex as char).to_ascii_uppercase()
            } else {
                modhex as char
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const OTP: &str = "ccccccidlfvvvuefkdgcilrjcfffijigdhrbvngfgelb";

    #[test]
    fn modhex_otp_is_returned_unchanged() {
        assert_eq!(normalize_and_validate(OTP).unwrap(), OTP);
    }

    #[test]
    fn length_is_checked_before_characters() {
        assert!(matches!(
            normalize_and_validate("not 32-48 char string"),
            Err(YubicoError::InvalidLength)
        ));
        assert!(matches!(
            normalize_and_validate(
                "definitely a string that is longer than 48 characters just because we can!"
            ),
            Err(YubicoError::InvalidLength)
        ));
        assert!(matches!(normalize_and_validate(""), Err(YubicoError::InvalidLength)));
    }

    #[test]
    fn garbage_of_valid_length_is_invalid_format() {
        assert!(matches!(
            normalize_and_validate("this string is definitely not an otp"),
            Err(YubicoError::InvalidFormat)
        ));
    }

    #[test]
    fn dvorak_input_is_translated() {
        let dvorak = format!("{}{}{}", "x".repeat(12), "j".repeat(16), ".p".repeat(8));
        let modhex = format!("{}{}{}", "b".repeat(12), "c".repeat(16), "er".repeat(8));
        assert_eq!(normalize_and_validate(&dvorak).unwrap(), modhex);
    }

    #[test]
    fn dvorak_uppercase_keeps_case() {
        let dvorak = "XPYJ".repeat(8);
        assert_eq!(normalize_and_validate(&dvorak).unwrap(), "BRTC".repeat(8));
    }

    #[test]
    fn mixed_alphabets_are_rejected() {
        // 'x' only exists on Dvorak, 'l' only in modhex.
        let mixed = format!("{}{}", "x".repeat(16), "l".repeat(16));
        assert!(matches!(
            normalize_and_validate(&mixed),
            Err(YubicoError::InvalidFormat)
        ));
    }

    #[test]
    fn identity_of_short_input_is_empty() {
        assert_eq!(identity_of(""), "");
        assert_eq!(identity_of("string that would cause panic"), "");
        assert_eq!(identity_of(&"c".repeat(32)), "");
    }

    #[test]
    fn identity_of_full_otp() {
        assert_eq!(identity_of(OTP), "ccccccidlfvv");
        assert_eq!(identity_of(&"c".repeat(33)), "c");
    }

    #[test]
    fn identity_of_never_panics_on_multibyte_input() {
        let otp = format!("é{}", "c".repeat(32));
        assert_eq!(identity_of(&otp), "é");
        let otp = format!("{}é{}", "c".repeat(1), "c".repeat(31));
        assert_eq!(identity_of(&otp), "");
    }
}
