use std::fmt;

use crate::HashParameters;

/// Input named by an [`HashError::InvalidParameter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    CpuCost,
    MemoryCost,
    ParallelizationCost,
    KeyLength,
    Salt,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::CpuCost => "cpu_cost",
            Field::MemoryCost => "memory_cost",
            Field::ParallelizationCost => "parallelization_cost",
            Field::KeyLength => "key_length",
            Field::Salt => "salt",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised while producing a hash.
///
/// Verification never returns these: [`crate::compare`] maps every failure to `false`.
#[derive(Debug)]
pub enum HashError {
    /// A parameter or the salt violates the hashing policy.
    InvalidParameter {
        field: Field,
        constraint: &'static str,
    },
    /// An option key that is not one of the four recognised parameters.
    UnknownOption(String),
    /// The options document could not be read as a JSON object.
    InvalidOptions(String),
    /// The key derivation function reported a failure.
    DerivationFailed { parameters: HashParameters },
}

impl fmt::Display for HashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashError::InvalidParameter { field, constraint } => {
                write!(f, "invalid value of \"{field}\": {constraint}")
            }
            HashError::UnknownOption(key) => write!(f, "unknown option \"{key}\""),
            HashError::InvalidOptions(msg) => write!(f, "invalid options: {msg}"),
            HashError::DerivationFailed { parameters: p } => write!(
                f,
                "could not generate hash with options cpu_cost => {}, memory_cost => {}, \
                 parallelization_cost => {}, key_length => {}",
                p.cpu_cost(),
                p.memory_cost(),
                p.parallelization_cost(),
                p.key_length()
            ),
        }
    }
}

impl std::error::Error for HashError {}
