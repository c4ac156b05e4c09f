use std::time::Duration;

use crate::core::error::BoardError;

pub const DEFAULT_MIN_TICKS: u32 = 5;
pub const DEFAULT_MAX_TICKS: u32 = 20;
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Inclusive lower bound of sampled job durations.
    pub min_ticks: u32,
    /// Exclusive upper bound of sampled job durations.
    pub max_ticks: u32,
    pub tick_interval: Duration,
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_ticks: DEFAULT_MIN_TICKS,
            max_ticks: DEFAULT_MAX_TICKS,
            tick_interval: DEFAULT_TICK_INTERVAL,
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), BoardError> {
        if self.min_ticks == 0 || self.min_ticks >= self.max_ticks {
            return Err(BoardError::InvalidRange {
                min: self.min_ticks,
                max: self.max_ticks,
            });
        }
        if self.tick_interval.is_zero() {
            return Err(BoardError::InvalidInterval {
                message: "interval must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!((config.min_ticks, config.max_ticks), (5, 20));
    }

    #[test]
    fn rejects_empty_or_zero_range() {
        let empty = SessionConfig {
            min_ticks: 8,
            max_ticks: 8,
            ..SessionConfig::default()
        };
        assert!(matches!(
            empty.validate(),
            Err(BoardError::InvalidRange { min: 8, max: 8 })
        ));

        let zero = SessionConfig {
            min_ticks: 0,
            ..SessionConfig::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn rejects_zero_interval() {
        let config = SessionConfig {
            tick_interval: Duration::ZERO,
            ..SessionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BoardError::InvalidInterval { .. })
        ));
    }
}
