use anyhow::{Result, anyhow};
use getrandom::fill;

use super::SALT_LEN;

/// Fill buffer with cryptographically secure random bytes
fn secure_random(buf: &mut [u8]) -> Result<()> {
    fill(buf).map_err(|_| anyhow!("OS random generator unavailable"))
}

/// Generate a fresh salt for [`crate::hash`]
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    secure_random(&mut salt)?;
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SALT_MIN_LEN;

    #[test]
    fn salts_are_long_enough_and_distinct() {
        let s1 = generate_salt().unwrap();
        let s2 = generate_salt().unwrap();

        assert!(s1.len() >= SALT_MIN_LEN);
        assert_ne!(s1, s2);
    }
}
