//! # Aggregation Policies
//!
//! How a poll combines per-device outcomes. The choice is always explicit:
//! a gateway is configured with one policy and reports which one it used.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Poll aggregation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationPolicy {
    /// Stop at the first device that yields a valid credential. Polls still
    /// in flight are cancelled.
    FirstValid,
    /// Wait for every device to answer or time out, then report all of them.
    #[default]
    CollectAllValid,
}

impl AggregationPolicy {
    /// The configuration spelling of this policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstValid => "first-valid",
            Self::CollectAllValid => "collect-all-valid",
        }
    }
}

impl fmt::Display for AggregationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-valid" => Ok(Self::FirstValid),
            "collect-all-valid" => Ok(Self::CollectAllValid),
            other => Err(format!(
                "unknown policy {other:?}, expected first-valid or collect-all-valid"
            )),
        }
    }
}
