//! Reconnection policies for the live feed

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// How the feed client waits between connection attempts.
///
/// `attempt` is 0-indexed and resets after every successful connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ReconnectPolicy {
    /// Same delay every time
    Fixed {
        #[serde(default = "default_delay_secs")]
        delay_secs: u64,
        #[serde(default)]
        max_attempts: Option<usize>,
    },
    /// `initial_delay * 2^attempt`, capped at `max_delay`
    Exponential {
        #[serde(default = "default_initial_delay_secs")]
        initial_delay_secs: u64,
        #[serde(default = "default_max_delay_secs")]
        max_delay_secs: u64,
        #[serde(default)]
        max_attempts: Option<usize>,
    },
    /// Give up after the first disconnect
    Never,
}

fn default_delay_secs() -> u64 {
    5
}

fn default_initial_delay_secs() -> u64 {
    1
}

fn default_max_delay_secs() -> u64 {
    60
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        ReconnectPolicy::Fixed {
            delay_secs: default_delay_secs(),
            max_attempts: None,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before reconnect number `attempt`, or `None` to stop
    pub fn next_delay(&self, attempt: usize) -> Option<Duration> {
        if !self.should_reconnect(attempt) {
            return None;
        }

        match self {
            ReconnectPolicy::Fixed { delay_secs, .. } => Some(Duration::from_secs(*delay_secs)),
            ReconnectPolicy::Exponential {
                initial_delay_secs,
                max_delay_secs,
                ..
            } => {
                let factor = u32::try_from(attempt)
                    .ok()
                    .and_then(|exp| 2u64.checked_pow(exp))
                    .unwrap_or(u64::MAX);
                let delay = initial_delay_secs.saturating_mul(factor).min(*max_delay_secs);
                Some(Duration::from_secs(delay))
            }
            ReconnectPolicy::Never => None,
        }
    }

    pub fn should_reconnect(&self, attempt: usize) -> bool {
        let max_attempts = match self {
            ReconnectPolicy::Fixed { max_attempts, .. }
            | ReconnectPolicy::Exponential { max_attempts, .. } => *max_attempts,
            ReconnectPolicy::Never => return false,
        };
        max_attempts.map_or(true, |max| attempt < max)
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            ReconnectPolicy::Fixed { delay_secs: 0, .. } => {
                Err("feed.reconnect.delay_secs must be greater than 0".to_string())
            }
            ReconnectPolicy::Exponential {
                initial_delay_secs,
                max_delay_secs,
                ..
            } if *initial_delay_secs == 0 || max_delay_secs < initial_delay_secs => Err(
                "feed.reconnect needs 0 < initial_delay_secs <= max_delay_secs".to_string(),
            ),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ReconnectPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let limit = |max: &Option<usize>| {
            max.map_or_else(|| "unlimited".to_string(), |m| format!("max {} attempts", m))
        };
        match self {
            ReconnectPolicy::Fixed {
                delay_secs,
                max_attempts,
            } => write!(f, "fixed {}s, {}", delay_secs, limit(max_attempts)),
            ReconnectPolicy::Exponential {
                initial_delay_secs,
                max_delay_secs,
                max_attempts,
            } => write!(
                f,
                "exponential {}s..{}s, {}",
                initial_delay_secs,
                max_delay_secs,
                limit(max_attempts)
            ),
            ReconnectPolicy::Never => f.write_str("never"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_fixed_five_seconds_forever() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.next_delay(0), Some(Duration::from_secs(5)));
        assert_eq!(policy.next_delay(10_000), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_exponential_backoff_caps() {
        let policy = ReconnectPolicy::Exponential {
            initial_delay_secs: 1,
            max_delay_secs: 30,
            max_attempts: Some(10),
        };
        assert_eq!(policy.next_delay(0), Some(Duration::from_secs(1)));
        assert_eq!(policy.next_delay(3), Some(Duration::from_secs(8)));
        assert_eq!(policy.next_delay(9), Some(Duration::from_secs(30)));
        assert_eq!(policy.next_delay(10), None);
    }

    #[test]
    fn test_exponential_huge_attempt_saturates() {
        let policy = ReconnectPolicy::Exponential {
            initial_delay_secs: 2,
            max_delay_secs: 120,
            max_attempts: None,
        };
        assert_eq!(policy.next_delay(200), Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_never() {
        assert_eq!(ReconnectPolicy::Never.next_delay(0), None);
    }

    #[test]
    fn test_yaml_shapes() {
        let fixed: ReconnectPolicy = serde_yaml::from_str("strategy: fixed\ndelay_secs: 3\n").unwrap();
        assert_eq!(
            fixed,
            ReconnectPolicy::Fixed {
                delay_secs: 3,
                max_attempts: None
            }
        );

        let never: ReconnectPolicy = serde_yaml::from_str("strategy: never\n").unwrap();
        assert_eq!(never, ReconnectPolicy::Never);
    }

    #[test]
    fn test_validate() {
        assert!(ReconnectPolicy::default().validate().is_ok());
        assert!(ReconnectPolicy::Fixed {
            delay_secs: 0,
            max_attempts: None
        }
        .validate()
        .is_err());
        assert!(ReconnectPolicy::Exponential {
            initial_delay_secs: 10,
            max_delay_secs: 5,
            max_attempts: None
        }
        .validate()
        .is_err());
    }
}
