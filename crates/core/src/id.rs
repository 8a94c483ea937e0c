//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Maximum length of an account name.
pub const MAX_ACCOUNT_NAME_LEN: usize = 12;

/// Identity of an account (holder, issuer, or the contract itself).
///
/// Account names are 1..=12 characters drawn from `a-z`, `1-5` and `.`,
/// and never end with a `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountName(String);

impl AccountName {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        validate_account_name(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate_account_name(name: &str) -> Result<(), DomainError> {
    if name.is_empty() || name.len() > MAX_ACCOUNT_NAME_LEN {
        return Err(DomainError::invalid_id(format!(
            "AccountName: '{name}' must be 1..={MAX_ACCOUNT_NAME_LEN} characters"
        )));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !matches!(c, 'a'..='z' | '1'..='5' | '.'))
    {
        return Err(DomainError::invalid_id(format!(
            "AccountName: '{name}' contains invalid character '{c}'"
        )));
    }
    if name.ends_with('.') {
        return Err(DomainError::invalid_id(format!(
            "AccountName: '{name}' must not end with '.'"
        )));
    }
    Ok(())
}

impl core::fmt::Display for AccountName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AccountName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountName> for String {
    fn from(value: AccountName) -> Self {
        value.0
    }
}

/// Identifier of one ledger transaction (one operation invocation).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

macro_rules! impl_uuid_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::from_str(s)
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(uuid))
            }
        }
    };
}

impl_uuid_newtype!(TransactionId, "TransactionId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_names_accept_the_name_alphabet() {
        for name in ["alice", "bob.token", "a", "rankblock", "user12345", "abcdefghijkl"] {
            assert!(AccountName::new(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn account_names_reject_bad_input() {
        for name in ["", "Alice", "user6", "trailing.", "abcdefghijklm", "a b"] {
            assert!(
                matches!(AccountName::new(name), Err(DomainError::InvalidId(_))),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn account_name_serde_validates() {
        let ok: AccountName = serde_json::from_str("\"alice\"").unwrap();
        assert_eq!(ok.as_str(), "alice");
        assert!(serde_json::from_str::<AccountName>("\"NOPE\"").is_err());
    }

    #[test]
    fn transaction_id_round_trips_through_text() {
        let id = TransactionId::new();
        let parsed: TransactionId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<TransactionId>().is_err());
    }
}
