//! Base64 helpers.
//!
//! Tokens split on `=`, so base64 text passed as `pubkey:AQI=` arrives
//! without its padding. Decoding therefore accepts padded and unpadded
//! input alike; encoding always pads.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::{DecodeError, Engine as _};

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode standard base64 with or without padding.
///
/// # Errors
///
/// Returns a [`DecodeError`] if `text` is not base64.
///
/// # Examples
///
/// ```
/// use keyroute_core::encoding::decode_base64;
///
/// assert_eq!(decode_base64("AQI=").expect("padded"), vec![1, 2]);
/// assert_eq!(decode_base64("AQI").expect("unpadded"), vec![1, 2]);
/// assert!(decode_base64("not base64!").is_err());
/// ```
pub fn decode_base64(text: &str) -> Result<Vec<u8>, DecodeError> {
    LENIENT.decode(text.as_bytes())
}

/// Encode as padded standard base64.
#[must_use]
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod proptest_tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_padding_is_optional(bytes in proptest::collection::vec(any::<u8>(), 0..96)) {
            let padded = encode_base64(&bytes);
            let stripped = padded.trim_end_matches('=');
            prop_assert_eq!(decode_base64(&padded).expect("padded decodes"), bytes.clone());
            prop_assert_eq!(decode_base64(stripped).expect("unpadded decodes"), bytes);
        }
    }
}
