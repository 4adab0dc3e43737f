//! Self-describing scrypt password hashes.
//!
//! [`hash`] turns a secret and salt into a `$`-delimited string carrying the
//! cost parameters, the salt and the derived key. [`compare`] checks a secret
//! against such a string in constant time.
//!
//! ```
//! use scrypt_hash::{HashOptions, compare, hash};
//!
//! let options = HashOptions::new().cpu_cost(1024).memory_cost(1);
//! let encoded = hash("hunter2", "sixteen byte salt", &options).unwrap();
//!
//! assert!(compare(&encoded, "hunter2"));
//! assert!(!compare(&encoded, "hunter3"));
//! ```
//!
//! Hashing fails loudly with a [`HashError`]. Verification is total: any
//! malformed or tampered input simply does not match.

mod crypto;
mod error;
pub mod format;

pub use crate::crypto::{
    HashOptions, HashParameters, Kdf, SALT_LEN, SALT_MIN_LEN, Scrypt, equals, generate_salt,
    validate,
};
pub use crate::error::{Field, HashError};

use base64::{Engine, engine::general_purpose::STANDARD};
use log::{debug, warn};

/// Hashes and verifies secrets with a given [`Kdf`].
///
/// Stateless apart from the adapter; share it freely between threads.
#[derive(Debug, Clone, Default)]
pub struct Hasher<K = Scrypt> {
    kdf: K,
}

impl<K: Kdf> Hasher<K> {
    pub fn new(kdf: K) -> Self {
        Self { kdf }
    }

    pub fn kdf(&self) -> &K {
        &self.kdf
    }

    /// Merges `options` over the defaults and hashes.
    pub fn hash(
        &self,
        secret: impl AsRef<[u8]>,
        salt: impl AsRef<[u8]>,
        options: &HashOptions,
    ) -> Result<String, HashError> {
        let parameters = options.resolve()?;
        self.hash_with_parameters(secret.as_ref(), salt.as_ref(), &parameters)
    }

    /// Hashes with fully specified parameters.
    ///
    /// # Errors
    ///
    /// - [`HashError::InvalidParameter`] if `parameters` or the salt length
    ///   violate the policy
    /// - [`HashError::DerivationFailed`] if the KDF fails
    pub fn hash_with_parameters(
        &self,
        secret: &[u8],
        salt: &[u8],
        parameters: &HashParameters,
    ) -> Result<String, HashError> {
        validate(parameters, salt)?;

        // the KDF sees the base64 text, not the raw salt
        let salt = STANDARD.encode(salt);

        let key = self
            .kdf
            .derive(secret, salt.as_bytes(), parameters)
            .map_err(|e| {
                warn!("key derivation failed with {parameters:?}: {e:#}");
                HashError::DerivationFailed {
                    parameters: *parameters,
                }
            })?;

        if key.len() != parameters.key_length() {
            warn!(
                "key derivation returned {} bytes, expected {}",
                key.len(),
                parameters.key_length()
            );
            return Err(HashError::DerivationFailed {
                parameters: *parameters,
            });
        }

        debug!("derived scrypt hash with {parameters:?}");
        Ok(format::encode(parameters, &salt, &key))
    }

    /// Returns `true` iff `encoded` is a hash of `secret`.
    ///
    /// Never fails: malformed input, undersized salts, invalid base64 and
    /// KDF failures all yield `false`.
    pub fn compare(&self, encoded: &str, secret: impl AsRef<[u8]>) -> bool {
        let Some(decoded) = format::decode(encoded) else {
            debug!("rejecting stored hash: malformed fields");
            return false;
        };

        let salt = match STANDARD.decode(decoded.salt()) {
            Ok(salt) => salt,
            Err(e) => {
                debug!("rejecting stored hash: salt is not base64 ({e})");
                return false;
            }
        };

        match self.hash_with_parameters(secret.as_ref(), &salt, decoded.parameters()) {
            Ok(candidate) => equals(encoded.as_bytes(), candidate.as_bytes()),
            Err(e) => {
                debug!("rejecting stored hash: {e}");
                false
            }
        }
    }
}

/// Hashes `secret` with the default [`Scrypt`] adapter.
///
/// `salt` must be at least [`SALT_MIN_LEN`] bytes; see [`generate_salt`].
pub fn hash(
    secret: impl AsRef<[u8]>,
    salt: impl AsRef<[u8]>,
    options: &HashOptions,
) -> Result<String, HashError> {
    Hasher::<Scrypt>::default().hash(secret, salt, options)
}

/// [`hash`] with the default parameters (`N = 2^14, r = 8, p = 1`, 64 byte key).
pub fn hash_with_defaults(
    secret: impl AsRef<[u8]>,
    salt: impl AsRef<[u8]>,
) -> Result<String, HashError> {
    hash(secret, salt, &HashOptions::default())
}

/// Verifies `secret` against an encoded hash with the default [`Scrypt`] adapter.
pub fn compare(encoded: &str, secret: impl AsRef<[u8]>) -> bool {
    Hasher::<Scrypt>::default().compare(encoded, secret)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::{Result, bail};
    use zeroize::Zeroizing;

    use super::*;

    const SALT: &[u8] = b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

    /// Records the salt it was handed and returns a key of repeated secret bytes.
    #[derive(Default)]
    struct RecordingKdf {
        salts: Mutex<Vec<Vec<u8>>>,
    }

    impl Kdf for RecordingKdf {
        fn derive(
            &self,
            secret: &[u8],
            salt: &[u8],
            parameters: &HashParameters,
        ) -> Result<Zeroizing<Vec<u8>>> {
            self.salts.lock().unwrap().push(salt.to_vec());
            let byte = secret.first().copied().unwrap_or(0);
            Ok(Zeroizing::new(vec![byte; parameters.key_length()]))
        }
    }

    struct FailingKdf;

    impl Kdf for FailingKdf {
        fn derive(&self, _: &[u8], _: &[u8], _: &HashParameters) -> Result<Zeroizing<Vec<u8>>> {
            bail!("out of memory")
        }
    }

    struct ShortKdf;

    impl Kdf for ShortKdf {
        fn derive(&self, _: &[u8], _: &[u8], _: &HashParameters) -> Result<Zeroizing<Vec<u8>>> {
            Ok(Zeroizing::new(vec![0u8; 4]))
        }
    }

    #[test]
    fn kdf_receives_base64_salt() {
        let hasher = Hasher::new(RecordingKdf::default());
        let encoded = hasher
            .hash(b"x", SALT, &HashOptions::new().key_length(16))
            .unwrap();

        let salts = hasher.kdf().salts.lock().unwrap();
        assert_eq!(salts.as_slice(), &[STANDARD.encode(SALT).into_bytes()]);
        assert_eq!(
            encoded,
            format!(
                "16384$8$1$16${}${}",
                STANDARD.encode(SALT),
                "78".repeat(16)
            )
        );
    }

    #[test]
    fn compare_uses_stored_parameters() {
        let hasher = Hasher::new(RecordingKdf::default());
        let options = HashOptions::new()
            .cpu_cost(2)
            .memory_cost(3)
            .parallelization_cost(4)
            .key_length(17);
        let encoded = hasher.hash(b"secret", SALT, &options).unwrap();

        assert!(encoded.starts_with("2$3$4$17$"));
        assert!(hasher.compare(&encoded, b"secret"));
        assert!(!hasher.compare(&encoded, b"other"));
    }

    #[test]
    fn derivation_failure_is_reported() {
        let hasher = Hasher::new(FailingKdf);
        match hasher.hash(b"pw", SALT, &HashOptions::default()) {
            Err(HashError::DerivationFailed { parameters }) => {
                assert_eq!(parameters, HashParameters::default())
            }
            other => panic!("expected DerivationFailed, got: {other:?}"),
        }
    }

    #[test]
    fn wrong_key_length_is_a_derivation_failure() {
        let hasher = Hasher::new(ShortKdf);
        assert!(matches!(
            hasher.hash(b"pw", SALT, &HashOptions::default()),
            Err(HashError::DerivationFailed { .. })
        ));
    }

    #[test]
    fn compare_swallows_derivation_failure() {
        let encoded = Hasher::new(RecordingKdf::default())
            .hash(b"pw", SALT, &HashOptions::default())
            .unwrap();

        assert!(!Hasher::new(FailingKdf).compare(&encoded, b"pw"));
    }

    #[test]
    fn validation_runs_before_kdf() {
        let hasher = Hasher::new(RecordingKdf::default());

        assert!(matches!(
            hasher.hash(b"pw", b"abc", &HashOptions::default()),
            Err(HashError::InvalidParameter {
                field: Field::Salt,
                ..
            })
        ));
        assert!(hasher.kdf().salts.lock().unwrap().is_empty());
    }

    #[test]
    fn compare_rejects_undersized_stored_salt() {
        let hasher = Hasher::new(RecordingKdf::default());
        // "abc" in base64
        assert!(!hasher.compare("1024$1$1$16$YWJj$", b"pw"));
        assert!(hasher.kdf().salts.lock().unwrap().is_empty());
    }

    #[test]
    fn reference_vector() {
        let reference = "65536$8$1$64$YWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWE=$\
                         293567c0a58a1b393f13f2ac882142f0064ff59b94d5e2c6ee62f4717d361b3e\
                         4b7786d23826bd0dda67ced7e3bf37e1d8272bcb171aec254eedf3cec81be91b";

        let encoded = hash("foo", SALT, &HashOptions::new().cpu_cost(1 << 16)).unwrap();
        assert_eq!(encoded, reference);

        assert!(compare(reference, "foo"));
        assert!(!compare(reference, "bar"));
    }
}
