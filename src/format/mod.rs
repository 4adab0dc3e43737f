//! Encoded hash format.
//!
//! ```text
//! CPU_COST $ MEMORY_COST $ PARALLELIZATION_COST $ KEY_LENGTH $ BASE64(SALT) $ HEX(KEY)
//! ```
//!
//! Numeric fields are decimal, the salt uses the standard padded base64 alphabet
//! and the key is lowercase hex. None of these contain the `$` delimiter.

use crate::HashParameters;

/// Field delimiter.
pub const DELIMITER: char = '$';

/// The leading fields of an encoded hash.
///
/// The derived key is not kept; verification recomputes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHash<'a> {
    parameters: HashParameters,
    salt: &'a str,
}

impl<'a> DecodedHash<'a> {
    /// Cost parameters as stored. Not validated.
    pub fn parameters(&self) -> &HashParameters {
        &self.parameters
    }

    /// Base64 text of the salt, not yet decoded.
    pub fn salt(&self) -> &'a str {
        self.salt
    }
}

/// Joins the six fields of an encoded hash.
pub fn encode(parameters: &HashParameters, base64_salt: &str, key: &[u8]) -> String {
    format!(
        "{}{d}{}{d}{}{d}{}{d}{}{d}{}",
        parameters.cpu_cost(),
        parameters.memory_cost(),
        parameters.parallelization_cost(),
        parameters.key_length(),
        base64_salt,
        hex::encode(key),
        d = DELIMITER,
    )
}

/// Splits an encoded hash into parameters and base64 salt.
///
/// Returns `None` if one of the four numeric fields is missing or not a
/// plain decimal that fits its type, or if the salt field is empty.
/// Leading zeros are accepted here, but [`encode`] never writes them, so such
/// a hash cannot match in [`crate::compare`].
pub fn decode(encoded: &str) -> Option<DecodedHash<'_>> {
    let mut fields = encoded.split(DELIMITER);

    let cpu_cost = parse_number(fields.next())?;
    let memory_cost = parse_number(fields.next())?;
    let parallelization_cost = parse_number(fields.next())?;
    let key_length = parse_number(fields.next())?;
    let salt = fields.next().filter(|s| !s.is_empty())?;

    Some(DecodedHash {
        parameters: HashParameters::unchecked(
            cpu_cost,
            memory_cost,
            parallelization_cost,
            key_length,
        ),
        salt,
    })
}

fn parse_number<T: std::str::FromStr>(field: Option<&str>) -> Option<T> {
    // str::parse alone would also take a leading '+'
    let field = field.filter(|f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()))?;
    field.parse().ok()
}
