//! Element identifiers.
//!
//! A [`Uid`] is either a non-negative integer (tracked per element type with a
//! high-water mark) or an RFC-4122 UUID. On the wire both are strings, which
//! lets them be used directly as JSON object keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::VcdError;

/// A unique identifier for an element within its element-type namespace.
///
/// Ordering places every integer UID before every UUID, integers compared
/// numerically, so maps keyed by `Uid` serialize in a stable order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Uid {
    Int(u64),
    Uuid(Uuid),
}

impl Uid {
    /// Parses a UID from its textual form.
    ///
    /// Decimal digits give an integer UID; the hyphenated 36-character UUID
    /// form gives a UUID. Anything else is rejected.
    pub fn parse(text: &str) -> Result<Self, VcdError> {
        let trimmed = text.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return trimmed
                .parse::<u64>()
                .map(Uid::Int)
                .map_err(|e| VcdError::InvalidUid(format!("'{}': {}", text, e)));
        }
        if trimmed.len() == 36 {
            if let Ok(uuid) = Uuid::try_parse(trimmed) {
                return Ok(Uid::Uuid(uuid));
            }
        }
        Err(VcdError::InvalidUid(format!(
            "'{}' is neither a non-negative integer nor a UUID",
            text
        )))
    }

    /// A freshly generated random (v4) UUID.
    pub fn new_uuid() -> Self {
        Uid::Uuid(Uuid::new_v4())
    }

    #[inline]
    pub fn as_int(&self) -> Option<u64> {
        match self {
            Uid::Int(n) => Some(*n),
            Uid::Uuid(_) => None,
        }
    }

    #[inline]
    pub fn is_uuid(&self) -> bool {
        matches!(self, Uid::Uuid(_))
    }
}

impl FromStr for Uid {
    type Err = VcdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uid::parse(s)
    }
}

impl From<u64> for Uid {
    fn from(n: u64) -> Self {
        Uid::Int(n)
    }
}

impl From<Uuid> for Uid {
    fn from(uuid: Uuid) -> Self {
        Uid::Uuid(uuid)
    }
}

impl fmt::Debug for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Uid::Int(n) => write!(f, "Uid({})", n),
            Uid::Uuid(u) => write!(f, "Uid({})", u),
        }
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Uid::Int(n) => write!(f, "{}", n),
            Uid::Uuid(u) => write!(f, "{}", u.hyphenated()),
        }
    }
}

impl Serialize for Uid {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Uid {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct UidVisitor;

        impl serde::de::Visitor<'_> for UidVisitor {
            type Value = Uid;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer or UUID string")
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Uid, E> {
                Ok(Uid::Int(v))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Uid, E> {
                u64::try_from(v)
                    .map(Uid::Int)
                    .map_err(|_| E::custom(format!("negative UID {}", v)))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Uid, E> {
                Uid::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(UidVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() {
        assert_eq!(Uid::parse("0").unwrap(), Uid::Int(0));
        assert_eq!(Uid::parse("42").unwrap(), Uid::Int(42));
    }

    #[test]
    fn test_parse_uuid() {
        let text = "ecb7a4c5-4a8f-4b5e-9b2c-7d0b1b6f6f3a";
        let uid = Uid::parse(text).unwrap();
        assert!(uid.is_uuid());
        assert_eq!(uid.to_string(), text);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Uid::parse("").is_err());
        assert!(Uid::parse("-1").is_err());
        assert!(Uid::parse("abc").is_err());
        assert!(Uid::parse("ecb7a4c54a8f4b5e9b2c7d0b1b6f6f3a").is_err());
    }

    #[test]
    fn test_ordering_int_before_uuid() {
        let mut uids = vec![Uid::new_uuid(), Uid::Int(10), Uid::Int(2)];
        uids.sort();
        assert_eq!(uids[0], Uid::Int(2));
        assert_eq!(uids[1], Uid::Int(10));
        assert!(uids[2].is_uuid());
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Uid::Int(3)).unwrap();
        assert_eq!(json, "\"3\"");
        let back: Uid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Uid::Int(3));
        let from_number: Uid = serde_json::from_str("7").unwrap();
        assert_eq!(from_number, Uid::Int(7));
    }
}
