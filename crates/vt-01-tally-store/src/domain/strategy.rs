//! Increment strategy selection.

use std::fmt;
use std::str::FromStr;

/// How [`crate::TallyService`] applies one vote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IncrementStrategy {
    /// One atomic store call that inserts `count = 1` or adds 1.
    #[default]
    AtomicUpsert,
    /// `find`, bump in memory, `save`. Two concurrent votes for the same
    /// name can both read `n` and both write `n + 1`.
    ReadModifyWrite,
}

impl IncrementStrategy {
    /// Whether concurrent increments for one name are all counted.
    #[must_use]
    pub fn is_race_free(self) -> bool {
        matches!(self, Self::AtomicUpsert)
    }
}

impl FromStr for IncrementStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "atomic" | "atomic-upsert" | "upsert" => Ok(Self::AtomicUpsert),
            "read-modify-write" | "rmw" => Ok(Self::ReadModifyWrite),
            other => Err(format!("unknown increment strategy `{other}`")),
        }
    }
}

impl fmt::Display for IncrementStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtomicUpsert => f.write_str("atomic"),
            Self::ReadModifyWrite => f.write_str("read-modify-write"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_atomic() {
        assert_eq!(IncrementStrategy::default(), IncrementStrategy::AtomicUpsert);
        assert!(IncrementStrategy::default().is_race_free());
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "RMW".parse::<IncrementStrategy>().unwrap(),
            IncrementStrategy::ReadModifyWrite
        );
        assert_eq!(
            "atomic".parse::<IncrementStrategy>().unwrap(),
            IncrementStrategy::AtomicUpsert
        );
        assert!("lock".parse::<IncrementStrategy>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for strategy in [IncrementStrategy::AtomicUpsert, IncrementStrategy::ReadModifyWrite] {
            assert_eq!(strategy.to_string().parse::<IncrementStrategy>().unwrap(), strategy);
        }
    }
}
