//! Record identifiers
//!
//! Store-assigned, immutable, totally ordered. Rendered on the wire as 24
//! lowercase hex digits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KeeperError;

/// Width of the hex rendering
pub const ID_HEX_WIDTH: usize = 24;

/// Unique record identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(u64);

impl RecordId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// The id following this one
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$x}", self.0, width = ID_HEX_WIDTH)
    }
}

impl FromStr for RecordId {
    type Err = KeeperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.len() > ID_HEX_WIDTH || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(KeeperError::Protocol(format!("Invalid record id: {:?}", s)));
        }
        // Up to 24 hex digits, but only the low 64 bits may be set
        let trimmed = s.trim_start_matches('0');
        if trimmed.len() > 16 {
            return Err(KeeperError::Protocol(format!("Record id out of range: {}", s)));
        }
        if trimmed.is_empty() {
            return Ok(Self(0));
        }
        u64::from_str_radix(trimmed, 16)
            .map(Self)
            .map_err(|_| KeeperError::Protocol(format!("Invalid record id: {:?}", s)))
    }
}
