//! Trusted key identifiers and hash types

use std::fmt;

use crate::error::{NtpdError, Result};

/// Largest value a key id must stay below
pub const KEY_ID_LIMIT: i64 = 65535;

/// An NTP trusted key number, always in `1..65535`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrustedKeyId(u16);

impl TrustedKeyId {
    /// Validate a raw key number
    pub fn new(id: i64) -> Result<Self> {
        if id > 0 && id < KEY_ID_LIMIT {
            Ok(Self(id as u16))
        } else {
            Err(NtpdError::precondition(format!(
                "trusted key id {} is outside 0 < id < {}",
                id, KEY_ID_LIMIT
            )))
        }
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl TryFrom<i64> for TrustedKeyId {
    type Error = NtpdError;

    fn try_from(id: i64) -> Result<Self> {
        Self::new(id)
    }
}

impl fmt::Display for TrustedKeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hash type column of an `ntp.keys` entry (`M` is MD5)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashType(String);

impl HashType {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() || value.chars().any(char::is_whitespace) {
            return Err(NtpdError::precondition(format!(
                "hash type {:?} must be a single non-empty word",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn md5() -> Self {
        Self("M".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HashType {
    fn default() -> Self {
        Self::md5()
    }
}

impl fmt::Display for HashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
