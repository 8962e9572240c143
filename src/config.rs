use serde::Deserialize;
use static_assertions::const_assert;

pub const DEFAULT_DESTROY_THRESHOLD: usize = 3;
pub const DEFAULT_BOMB_THRESHOLD: usize = 4;

const_assert!(DEFAULT_DESTROY_THRESHOLD >= 1);
const_assert!(DEFAULT_BOMB_THRESHOLD >= DEFAULT_DESTROY_THRESHOLD);

/// Match rules. Deserializes from any serde format, missing keys take the
/// defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Smallest connected group that gets destroyed.
    pub destroy_threshold: usize,
    /// Groups strictly larger than this score as a bomb.
    pub bomb_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            destroy_threshold: DEFAULT_DESTROY_THRESHOLD,
            bomb_threshold: DEFAULT_BOMB_THRESHOLD,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
pub enum ConfigError {
    #[error("destroy threshold must be at least 1")]
    ZeroDestroyThreshold,
    #[error("bomb threshold {bomb} is below the destroy threshold {destroy}")]
    BombBelowDestroy { destroy: usize, bomb: usize },
}

impl EngineConfig {
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.destroy_threshold == 0 {
            return Err(ConfigError::ZeroDestroyThreshold);
        }
        if self.bomb_threshold < self.destroy_threshold {
            return Err(ConfigError::BombBelowDestroy {
                destroy: self.destroy_threshold,
                bomb: self.bomb_threshold,
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(EngineConfig::default()));
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let config = EngineConfig {
            destroy_threshold: 5,
            bomb_threshold: 2,
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::BombBelowDestroy {
                destroy: 5,
                bomb: 2
            })
        );
        assert_eq!(
            EngineConfig {
                destroy_threshold: 0,
                ..EngineConfig::default()
            }
            .validate(),
            Err(ConfigError::ZeroDestroyThreshold)
        );
    }
}
