// Config files write ids as numbers as often as strings (`diseaseid: 42`).
// Everything ends up as text in a hidden field, so scalars are read as strings.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Deserializer};

use super::ObjectScope;

#[derive(Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Uint(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Bool(b) => f.write_str(if *b { "1" } else { "0" }),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum RawScope {
    One(Scalar),
    Many(Vec<Scalar>),
}

impl From<RawScope> for ObjectScope {
    fn from(raw: RawScope) -> Self {
        match raw {
            RawScope::One(s) => ObjectScope::Single(s.to_string()),
            RawScope::Many(items) => {
                ObjectScope::List(items.into_iter().map(|s| s.to_string()).collect())
            }
        }
    }
}

pub(super) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(|s| s.to_string())
        .unwrap_or_default())
}

pub(super) fn optional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|s| s.to_string()))
}

pub(super) fn set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Scalar>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .map(|s| s.to_string())
        .collect())
}

pub(super) fn map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, Scalar>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect())
}
