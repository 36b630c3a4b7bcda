//! PKCE (RFC 7636) verifier/challenge generation.
//!
//! A fresh [`PkcePair`] is generated per authorization attempt. The caller
//! keeps the verifier (typically in session state) across the redirect and
//! passes it to the code exchange; the challenge goes into the authorize URL.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of random bytes behind a code verifier.
const VERIFIER_BYTES: usize = 32;

/// A PKCE code verifier and its S256 challenge.
///
/// # Security
///
/// `Debug` masks the verifier; only the challenge is safe to expose.
///
/// # Example
///
/// ```rust
/// use square_giftcard::auth::oauth::PkcePair;
///
/// let pair = PkcePair::generate();
/// assert_eq!(pair.code_verifier().len(), 43);
/// assert_eq!(pair.code_challenge(), PkcePair::challenge_for(pair.code_verifier()));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PkcePair {
    code_verifier: String,
    code_challenge: String,
}

impl PkcePair {
    /// Generates a new pair from 32 random bytes (base64url, no padding).
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; VERIFIER_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let code_verifier = URL_SAFE_NO_PAD.encode(bytes);
        let code_challenge = Self::challenge_for(&code_verifier);

        Self {
            code_verifier,
            code_challenge,
        }
    }

    /// Computes `base64url(sha256(verifier))`.
    #[must_use]
    pub fn challenge_for(verifier: &str) -> String {
        URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
    }

    /// The secret verifier, sent with the token exchange.
    #[must_use]
    pub fn code_verifier(&self) -> &str {
        &self.code_verifier
    }

    /// The challenge, sent with the authorize request.
    #[must_use]
    pub fn code_challenge(&self) -> &str {
        &self.code_challenge
    }

    /// The challenge method; Square supports only `S256`.
    #[must_use]
    pub const fn code_challenge_method(&self) -> &'static str {
        "S256"
    }
}

impl std::fmt::Debug for PkcePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PkcePair")
            .field("code_verifier", &"*****")
            .field("code_challenge", &self.code_challenge)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_matches_verifier() {
        let pair = PkcePair::generate();

        let expected = URL_SAFE_NO_PAD.encode(Sha256::digest(pair.code_verifier().as_bytes()));
        assert_eq!(pair.code_challenge(), expected);
        assert_eq!(pair.code_challenge().len(), 43);
        assert_eq!(pair.code_challenge_method(), "S256");
    }

    #[test]
    fn test_rfc7636_appendix_b_vector() {
        assert_eq!(
            PkcePair::challenge_for("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    #[test]
    fn test_verifier_is_url_safe() {
        let pair = PkcePair::generate();
        assert!(pair
            .code_verifier()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_pairs_are_unique() {
        let first = PkcePair::generate();
        let second = PkcePair::generate();
        assert_ne!(first.code_verifier(), second.code_verifier());
        assert_ne!(first.code_challenge(), second.code_challenge());
    }

    #[test]
    fn test_debug_masks_verifier() {
        let pair = PkcePair::generate();
        let debug = format!("{pair:?}");
        assert!(!debug.contains(pair.code_verifier()));
        assert!(debug.contains(pair.code_challenge()));
    }
}
