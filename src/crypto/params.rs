use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{KEY_MIN_LEN, SALT_MIN_LEN};
use crate::error::{Field, HashError};

/// Fully resolved scrypt cost parameters.
///
/// Only [`HashOptions::resolve`] and [`HashParameters::new`] construct values
/// that are known to pass [`validate`]; [`crate::format::decode`] builds them
/// unchecked and the facade validates before deriving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashParameters {
    cpu_cost: u64,
    memory_cost: u32,
    parallelization_cost: u32,
    key_length: usize,
}

impl Default for HashParameters {
    fn default() -> Self {
        Self {
            // N = 2^14
            cpu_cost: 1 << 14,
            // r
            memory_cost: 8,
            // p
            parallelization_cost: 1,
            key_length: 64,
        }
    }
}

impl HashParameters {
    pub fn new(
        cpu_cost: u64,
        memory_cost: u32,
        parallelization_cost: u32,
        key_length: usize,
    ) -> Result<Self, HashError> {
        let params = Self::unchecked(cpu_cost, memory_cost, parallelization_cost, key_length);
        params.validate()?;
        Ok(params)
    }

    pub(crate) fn unchecked(
        cpu_cost: u64,
        memory_cost: u32,
        parallelization_cost: u32,
        key_length: usize,
    ) -> Self {
        Self {
            cpu_cost,
            memory_cost,
            parallelization_cost,
            key_length,
        }
    }

    pub fn cpu_cost(&self) -> u64 {
        self.cpu_cost
    }

    pub fn memory_cost(&self) -> u32 {
        self.memory_cost
    }

    pub fn parallelization_cost(&self) -> u32 {
        self.parallelization_cost
    }

    pub fn key_length(&self) -> usize {
        self.key_length
    }

    /// `log2(cpu_cost)`, the form the scrypt crate takes N in.
    pub fn log_n(&self) -> u8 {
        // cpu_cost is a u64 so trailing_zeros() < 64
        self.cpu_cost.trailing_zeros() as u8
    }

    /// Checks the cost parameters alone, first failure wins.
    pub fn validate(&self) -> Result<(), HashError> {
        check_cpu_cost(self.cpu_cost)?;
        check_memory_cost(self.memory_cost)?;
        check_parallelization_cost(self.parallelization_cost)?;
        check_key_length(self.key_length)
    }
}

const CPU_COST_CONSTRAINT: &str = "not a power of two greater than 1";
const AT_LEAST_ONE_CONSTRAINT: &str = "is not >= 1";
const KEY_LENGTH_CONSTRAINT: &str = "is not >= 16";
const SALT_CONSTRAINT: &str = "length is not >= 16";

fn constraint(field: Field) -> &'static str {
    match field {
        Field::CpuCost => CPU_COST_CONSTRAINT,
        Field::MemoryCost | Field::ParallelizationCost => AT_LEAST_ONE_CONSTRAINT,
        Field::KeyLength => KEY_LENGTH_CONSTRAINT,
        Field::Salt => SALT_CONSTRAINT,
    }
}

fn invalid(field: Field) -> HashError {
    HashError::InvalidParameter {
        field,
        constraint: constraint(field),
    }
}

fn check_cpu_cost(cpu_cost: u64) -> Result<(), HashError> {
    // 1 passes the bitwise test but is not a usable work factor
    if cpu_cost <= 1 || cpu_cost & (cpu_cost - 1) != 0 {
        return Err(invalid(Field::CpuCost));
    }
    Ok(())
}

fn check_memory_cost(memory_cost: u32) -> Result<(), HashError> {
    if memory_cost < 1 {
        return Err(invalid(Field::MemoryCost));
    }
    Ok(())
}

fn check_parallelization_cost(parallelization_cost: u32) -> Result<(), HashError> {
    if parallelization_cost < 1 {
        return Err(invalid(Field::ParallelizationCost));
    }
    Ok(())
}

fn check_key_length(key_length: usize) -> Result<(), HashError> {
    if key_length < KEY_MIN_LEN {
        return Err(invalid(Field::KeyLength));
    }
    Ok(())
}

/// Checks parameters and the raw salt before any derivation.
pub fn validate(parameters: &HashParameters, salt: &[u8]) -> Result<(), HashError> {
    parameters.validate()?;
    if salt.len() < SALT_MIN_LEN {
        return Err(invalid(Field::Salt));
    }
    Ok(())
}

/// Caller supplied overrides, merged over [`HashParameters::default`].
///
/// ```
/// use scrypt_hash::HashOptions;
///
/// let params = HashOptions::new().cpu_cost(1 << 16).resolve().unwrap();
/// assert_eq!(params.cpu_cost(), 65536);
/// assert_eq!(params.memory_cost(), 8);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HashOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_cost: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_cost: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallelization_cost: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_length: Option<usize>,
}

impl From<HashParameters> for HashOptions {
    fn from(p: HashParameters) -> Self {
        Self {
            cpu_cost: Some(p.cpu_cost),
            memory_cost: Some(p.memory_cost),
            parallelization_cost: Some(p.parallelization_cost),
            key_length: Some(p.key_length),
        }
    }
}

impl HashOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cpu_cost(mut self, cpu_cost: u64) -> Self {
        self.cpu_cost = Some(cpu_cost);
        self
    }

    pub fn memory_cost(mut self, memory_cost: u32) -> Self {
        self.memory_cost = Some(memory_cost);
        self
    }

    pub fn parallelization_cost(mut self, parallelization_cost: u32) -> Self {
        self.parallelization_cost = Some(parallelization_cost);
        self
    }

    pub fn key_length(mut self, key_length: usize) -> Self {
        self.key_length = Some(key_length);
        self
    }

    /// Merges over the defaults and validates the result as a unit.
    pub fn resolve(&self) -> Result<HashParameters, HashError> {
        let default = HashParameters::default();

        HashParameters::new(
            self.cpu_cost.unwrap_or(default.cpu_cost),
            self.memory_cost.unwrap_or(default.memory_cost),
            self.parallelization_cost.unwrap_or(default.parallelization_cost),
            self.key_length.unwrap_or(default.key_length),
        )
    }

    /// Reads options from a JSON object such as `{"cpu_cost": 65536}`.
    ///
    /// # Errors
    ///
    /// - [`HashError::InvalidOptions`] if the text is not a JSON object
    /// - [`HashError::UnknownOption`] for the first unrecognised key
    /// - [`HashError::InvalidParameter`] for the first field, in validation
    ///   order, whose value is not a non-negative integer that fits the field
    ///   or that violates the policy
    pub fn from_json(json: &str) -> Result<Self, HashError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| HashError::InvalidOptions(e.to_string()))?;
        Self::from_json_value(&value)
    }

    /// Same as [`HashOptions::from_json`] for an already parsed document.
    pub fn from_json_value(value: &Value) -> Result<Self, HashError> {
        let map = value
            .as_object()
            .ok_or_else(|| HashError::InvalidOptions("expected a JSON object".to_string()))?;

        if let Some(key) = map.keys().find(|k| field_for_key(k).is_none()) {
            return Err(HashError::UnknownOption(key.clone()));
        }

        // each field is read and checked before the next one is looked at
        let cpu_cost = read_integer(map, Field::CpuCost)?;
        cpu_cost.map(check_cpu_cost).transpose()?;
        let memory_cost = read_integer(map, Field::MemoryCost)?;
        memory_cost.map(check_memory_cost).transpose()?;
        let parallelization_cost = read_integer(map, Field::ParallelizationCost)?;
        parallelization_cost
            .map(check_parallelization_cost)
            .transpose()?;
        let key_length = read_integer(map, Field::KeyLength)?;
        key_length.map(check_key_length).transpose()?;

        Ok(Self {
            cpu_cost,
            memory_cost,
            parallelization_cost,
            key_length,
        })
    }
}

fn field_for_key(key: &str) -> Option<Field> {
    match key {
        "cpu_cost" => Some(Field::CpuCost),
        "memory_cost" => Some(Field::MemoryCost),
        "parallelization_cost" => Some(Field::ParallelizationCost),
        "key_length" => Some(Field::KeyLength),
        _ => None,
    }
}

fn read_integer<T: TryFrom<u64>>(
    map: &Map<String, Value>,
    field: Field,
) -> Result<Option<T>, HashError> {
    let Some(value) = map.get(field.name()) else {
        return Ok(None);
    };

    value
        .as_u64()
        .and_then(|n| T::try_from(n).ok())
        .map(Some)
        .ok_or_else(|| invalid(field))
}
