use anyhow::{Context, Result, bail};
use zeroize::Zeroizing;

use super::params::HashParameters;

/// A memory-hard key derivation function.
///
/// Implementations are called concurrently from any thread and must be reentrant.
pub trait Kdf: Send + Sync {
    /// Derives exactly `parameters.key_length()` bytes from `secret` and `salt`.
    ///
    /// `parameters` have already been validated by the caller.
    fn derive(
        &self,
        secret: &[u8],
        salt: &[u8],
        parameters: &HashParameters,
    ) -> Result<Zeroizing<Vec<u8>>>;
}

/// Scrypt backed by the pure Rust `scrypt` crate.
///
/// scrypt allocates `128 * r * (N + p)` bytes while mixing. Requests above
/// `max_memory` fail instead of allocating, so a stored hash with absurd cost
/// fields cannot exhaust the process.
#[derive(Debug, Clone, Copy)]
pub struct Scrypt {
    max_memory: u64,
}

impl Default for Scrypt {
    fn default() -> Self {
        Self {
            // 1 GiB
            max_memory: 1 << 30,
        }
    }
}

impl Scrypt {
    pub fn with_max_memory(max_memory: u64) -> Self {
        Self { max_memory }
    }

    pub fn max_memory(&self) -> u64 {
        self.max_memory
    }

    /// Bytes needed to derive with `parameters`, `None` on overflow.
    pub fn required_memory(parameters: &HashParameters) -> Option<u64> {
        let r = u64::from(parameters.memory_cost());
        let p = u64::from(parameters.parallelization_cost());
        let n_plus_p = parameters.cpu_cost().checked_add(p)?;

        128u64
            .checked_mul(r)?
            .checked_mul(n_plus_p)?
            .checked_add(u64::try_from(parameters.key_length()).ok()?)
    }
}

impl Kdf for Scrypt {
    fn derive(
        &self,
        secret: &[u8],
        salt: &[u8],
        parameters: &HashParameters,
    ) -> Result<Zeroizing<Vec<u8>>> {
        match Self::required_memory(parameters) {
            Some(needed) if needed <= self.max_memory => {}
            Some(needed) => bail!(
                "scrypt needs {needed} bytes which exceeds the limit of {} bytes",
                self.max_memory
            ),
            None => bail!("scrypt memory requirement overflows"),
        }

        // the output length is passed to scrypt() directly, len here only feeds PHC strings
        let params = scrypt::Params::new(
            parameters.log_n(),
            parameters.memory_cost(),
            parameters.parallelization_cost(),
            scrypt::Params::RECOMMENDED_LEN,
        )
        .map_err(|e| anyhow::anyhow!("invalid scrypt params: {e}"))?;

        let mut key = Zeroizing::new(vec![0u8; parameters.key_length()]);
        scrypt::scrypt(secret, salt, &params, &mut key)
            .map_err(|e| anyhow::anyhow!("{e}"))
            .context("scrypt key derivation failed")?;

        Ok(key)
    }
}
