use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// External platform account identifier (a numeric user id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub u64);

impl AccountId {
    /// Chat-style mention for this account (`<@id>`).
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }

    /// Resolve a free-form account reference.
    ///
    /// Accepts a raw numeric id (`466378653216014359`) or a mention
    /// (`<@466378653216014359>` / `<@!466378653216014359>`). Returns `None`
    /// for anything else, including zero.
    pub fn parse_reference(input: &str) -> Option<Self> {
        let input = input.trim();
        let digits = match input.strip_prefix("<@") {
            Some(rest) => {
                let rest = rest.strip_suffix('>')?;
                rest.strip_prefix('!').unwrap_or(rest)
            }
            None => input,
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        match digits.parse::<u64>() {
            Ok(0) | Err(_) => None,
            Ok(id) => Some(Self(id)),
        }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AccountId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl FromStr for AccountId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_reference(s).ok_or_else(|| format!("invalid account reference: '{s}'"))
    }
}
