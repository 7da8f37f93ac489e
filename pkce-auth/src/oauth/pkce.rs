//! PKCE (Proof Key for Code Exchange) support for OAuth 2.0.
//!
//! Implements RFC 7636 with the `S256` method for securing the authorization code flow of a
//! public client.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of random bytes behind a verifier. Hex encoding doubles it to 128 characters,
/// the longest verifier RFC 7636 allows.
const VERIFIER_BYTES: usize = 64;

/// PKCE code verifier (random string).
///
/// Never leaves the server except in the token request to the provider.
#[derive(Clone, PartialEq, Eq)]
pub struct PkceVerifier(String);

impl PkceVerifier {
    /// Generate a new random PKCE verifier.
    ///
    /// 64 bytes from the thread-local CSPRNG, hex-encoded.
    pub fn generate() -> Self {
        let mut random_bytes = [0u8; VERIFIER_BYTES];
        rand::thread_rng().fill_bytes(&mut random_bytes);
        Self(hex::encode(random_bytes))
    }

    /// Create a PKCE verifier from an existing string.
    pub fn from_string(verifier: String) -> Self {
        Self(verifier)
    }

    /// Get the verifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Generate the corresponding code challenge.
    pub fn challenge(&self) -> PkceChallenge {
        PkceChallenge::from_verifier(self)
    }
}

// Keep the verifier out of logs.
impl std::fmt::Debug for PkceVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PkceVerifier([REDACTED])")
    }
}

/// PKCE code challenge (SHA256 hash of verifier).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkceChallenge(String);

impl PkceChallenge {
    /// Create a code challenge from a verifier.
    ///
    /// Uses SHA256 hashing and base64url encoding without padding as per RFC 7636.
    pub fn from_verifier(verifier: &PkceVerifier) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(verifier.as_str().as_bytes());
        let hash = hasher.finalize();
        let challenge = URL_SAFE_NO_PAD.encode(hash);
        Self(challenge)
    }

    /// Get the challenge string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `code_challenge_method` sent alongside this challenge.
    pub fn method(&self) -> &'static str {
        "S256"
    }
}
