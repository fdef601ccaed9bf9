//! Key material for the target chain.
//!
//! Addresses are raw ed25519 public keys rendered in base58. Secret keys are
//! accepted in the 64-byte `secret || public` layout that the Solana CLI and
//! web3.js export, or as a bare 32-byte seed.

use crate::error::KeyError;
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use std::fmt;
use std::str::FromStr;

pub const PUBKEY_BYTES: usize = 32;
pub const SIGNATURE_BYTES: usize = 64;
pub const KEYPAIR_BYTES: usize = 64;
pub const SEED_BYTES: usize = 32;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Pubkey([u8; PUBKEY_BYTES]);

impl Pubkey {
    pub const fn new(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(&self) -> [u8; PUBKEY_BYTES] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; PUBKEY_BYTES] {
        &self.0
    }
}

impl FromStr for Pubkey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_base58(s)?;
        let bytes: [u8; PUBKEY_BYTES] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| KeyError::InvalidLength {
                    expected: PUBKEY_BYTES,
                    actual: bytes.len(),
                })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({})", self)
    }
}

/// Transaction signature, also used as the transaction identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_BYTES]);

impl Signature {
    pub const fn new(bytes: [u8; SIGNATURE_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_BYTES] {
        &self.0
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self([0u8; SIGNATURE_BYTES])
    }
}

impl FromStr for Signature {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_base58(s)?;
        let bytes: [u8; SIGNATURE_BYTES] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| KeyError::InvalidLength {
                    expected: SIGNATURE_BYTES,
                    actual: bytes.len(),
                })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self)
    }
}

#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    pub fn from_seed(seed: &[u8; SEED_BYTES]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Decodes a base58 secret key. Surrounding whitespace is ignored.
    pub fn from_base58_string(encoded: &str) -> Result<Self, KeyError> {
        let bytes = decode_base58(encoded.trim())?;
        match bytes.len() {
            KEYPAIR_BYTES => {
                let mut raw = [0u8; KEYPAIR_BYTES];
                raw.copy_from_slice(&bytes);
                let signing_key = SigningKey::from_keypair_bytes(&raw)
                    .map_err(|_| KeyError::MismatchedKeypair)?;
                Ok(Self { signing_key })
            }
            SEED_BYTES => {
                let mut seed = [0u8; SEED_BYTES];
                seed.copy_from_slice(&bytes);
                Ok(Self::from_seed(&seed))
            }
            actual => Err(KeyError::InvalidLength {
                expected: KEYPAIR_BYTES,
                actual,
            }),
        }
    }

    pub fn to_base58_string(&self) -> String {
        bs58::encode(self.signing_key.to_keypair_bytes()).into_string()
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey(self.signing_key.verifying_key().to_bytes())
    }

    pub fn sign_message(&self, message: &[u8]) -> Signature {
        Signature(self.signing_key.sign(message).to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("pubkey", &self.pubkey())
            .finish_non_exhaustive()
    }
}

fn decode_base58(s: &str) -> Result<Vec<u8>, KeyError> {
    bs58::decode(s)
        .into_vec()
        .map_err(|e| KeyError::InvalidBase58(e.to_string()))
}
