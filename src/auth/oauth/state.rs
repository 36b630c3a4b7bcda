//! OAuth `state` parameter generation and validation.
//!
//! The state is an unguessable per-attempt value: the caller stores it before
//! redirecting to Square and compares it with the callback's `state` query
//! parameter. Comparison uses [`subtle`] so timing does not reveal how many
//! leading bytes matched.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use subtle::ConstantTimeEq;

const STATE_BYTES: usize = 32;

/// Generates a state value from 32 random bytes, base64url encoded.
///
/// # Example
///
/// ```rust
/// use square_giftcard::auth::oauth::generate_state;
///
/// let state = generate_state();
/// assert_eq!(state.len(), 43);
/// assert_ne!(state, generate_state());
/// ```
#[must_use]
pub fn generate_state() -> String {
    let mut bytes = [0u8; STATE_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Compares the callback state with the stored one in constant time.
///
/// Returns `true` iff both are byte-for-byte equal. Inputs of different
/// length compare unequal.
///
/// # Example
///
/// ```rust
/// use square_giftcard::auth::oauth::validate_state;
///
/// assert!(validate_state("abc", "abc"));
/// assert!(!validate_state("abc", "abd"));
/// assert!(!validate_state("abc", "abcd"));
/// ```
#[must_use]
pub fn validate_state(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_state_is_url_safe() {
        let state = generate_state();
        assert_eq!(state.len(), 43);
        assert!(state
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_consecutive_states_differ() {
        let states: std::collections::HashSet<String> = (0..100).map(|_| generate_state()).collect();
        assert_eq!(states.len(), 100);
    }

    #[test]
    fn test_validate_state_equal_inputs() {
        let state = generate_state();
        assert!(validate_state(&state, &state.clone()));
        assert!(validate_state("", ""));
    }

    #[test]
    fn test_validate_state_mismatch_at_any_position() {
        let expected = "aaaaaaaaaa";
        for i in 0..expected.len() {
            let mut provided = expected.as_bytes().to_vec();
            provided[i] = b'b';
            let provided = String::from_utf8(provided).unwrap();
            assert!(!validate_state(&provided, expected), "position {i}");
        }
    }

    #[test]
    fn test_validate_state_length_mismatch() {
        assert!(!validate_state("abc", "ab"));
        assert!(!validate_state("", "a"));
    }
}
