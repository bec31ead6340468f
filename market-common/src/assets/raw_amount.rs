//! Serde adapter for raw `u128` contract amounts.
//!
//! Serializes as a decimal string. Deserializes from a string or a JSON
//! integer, since wei values routinely exceed what JSON tooling handles as
//! numbers.

use serde::de::Error;
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    Text(String),
    Number(u64),
}

pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
    match Repr::deserialize(deserializer)? {
        Repr::Text(text) => text
            .trim()
            .parse::<u128>()
            .map_err(|e| D::Error::custom(format!("invalid amount '{}': {}", text, e))),
        Repr::Number(n) => Ok(u128::from(n)),
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Holder {
        #[serde(with = "super")]
        amount: u128,
    }

    #[test]
    fn test_accepts_string_and_number() {
        let a: Holder = serde_json::from_str(r#"{"amount":"1000000000000000000000"}"#).unwrap();
        assert_eq!(a.amount, 1_000_000_000_000_000_000_000);

        let b: Holder = serde_json::from_str(r#"{"amount":250}"#).unwrap();
        assert_eq!(b.amount, 250);

        assert!(serde_json::from_str::<Holder>(r#"{"amount":"-1"}"#).is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Holder { amount: 42 }).unwrap();
        assert_eq!(json, r#"{"amount":"42"}"#);
    }
}
