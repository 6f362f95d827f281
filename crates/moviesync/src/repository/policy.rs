use std::fmt;
use std::str::FromStr;

/// What a repository does when only one of its two stores accepts a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    /// Leave both stores and the cache as they are and report the failure.
    #[default]
    BestEffort,
    /// Restore the cache entry and re-apply the pre-write value to the store
    /// that accepted the write, then report the failure.
    Compensate,
}

impl WritePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            WritePolicy::BestEffort => "best-effort",
            WritePolicy::Compensate => "compensate",
        }
    }
}

impl fmt::Display for WritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WritePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best-effort" | "best_effort" => Ok(WritePolicy::BestEffort),
            "compensate" => Ok(WritePolicy::Compensate),
            other => Err(format!(
                "unknown write policy '{other}', expected 'best-effort' or 'compensate'"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_write_policy() {
        assert_eq!("best-effort".parse(), Ok(WritePolicy::BestEffort));
        assert_eq!("Compensate".parse(), Ok(WritePolicy::Compensate));
        assert!("two-phase".parse::<WritePolicy>().is_err());
    }

    #[test]
    fn test_default_is_best_effort() {
        assert_eq!(WritePolicy::default(), WritePolicy::BestEffort);
    }
}
