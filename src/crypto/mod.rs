//! Cryptographic building blocks for password hashing.
//!
//! Provides parameter validation, the key derivation adapter, salt generation
//! and constant-time comparison.

pub mod ct;
pub mod kdf;
pub mod params;
pub mod salt;

pub use ct::equals;
pub use kdf::{Kdf, Scrypt};
pub use params::{HashOptions, HashParameters, validate};
pub use salt::generate_salt;

/// Minimum raw salt length accepted by [`validate`] (16 bytes).
pub const SALT_MIN_LEN: usize = 16;
/// Length of salts produced by [`generate_salt`] (32 bytes).
pub const SALT_LEN: usize = 32;
/// Minimum derived key length (16 bytes).
pub const KEY_MIN_LEN: usize = 16;
