pub mod background;
pub mod environment;
mod error;
pub mod hand;
pub mod policy;
pub mod qlearning;
pub mod report;
mod statearray;

use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use strum_macros::EnumIter;

pub use error::{ConfigError, DomainError, TrainingError};
pub use statearray::{State, StateActionArray, StateSpace};

/// Magnitude of the seed values written by `QInitialization::StickOnTwenty`.
pub const SEED_MAGNITUDE: f64 = 0.001;

/// All parameters of one training run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrainingConfig {
    pub episodes: u64,
    pub alpha: f64,
    pub discount: f64,
    pub epsilon: f64,
    pub draw_variant: DrawVariant,
    pub initialization: QInitialization,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            episodes: 10_000_000,
            alpha: 1.0,
            discount: 1.0,
            epsilon: 0.1,
            draw_variant: DrawVariant::UniformTen,
            initialization: QInitialization::StickOnTwenty,
        }
    }
}

impl TrainingConfig {
    /// Checks the learning parameters. The episode count is unsigned, and zero
    /// episodes is a valid (if useless) run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(ConfigError::InvalidAlpha(self.alpha));
        }
        if !(self.discount > 0.0 && self.discount <= 1.0) {
            return Err(ConfigError::InvalidDiscount(self.discount));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(ConfigError::InvalidEpsilon(self.epsilon));
        }
        Ok(())
    }
}

/// How a card value is sampled by the infinite shoe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_enum_str, Deserialize_enum_str)]
pub enum DrawVariant {
    /// Every value from 1 to 10 is equally likely.
    UniformTen,
    /// One of 13 ranks is drawn and J, Q, K collapse to 10, so 10 comes up
    /// 4 times in 13.
    ThirteenRanks,
}

/// Initial contents of the Q-table before any episode runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_enum_str, Deserialize_enum_str)]
pub enum QInitialization {
    Zero,
    /// Slightly favor hitting below 20 and sticking on 20 and 21.
    StickOnTwenty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Action {
    Stand = 0,
    Hit,
}

impl Action {
    pub fn is_hit(self) -> bool {
        self == Action::Hit
    }
}

impl From<bool> for Action {
    fn from(hit: bool) -> Self {
        if hit {
            Action::Hit
        } else {
            Action::Stand
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Stand => write!(f, "Stand"),
            Action::Hit => write!(f, "Hit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(TrainingConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_learning_parameters() {
        let config = TrainingConfig {
            alpha: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidAlpha(0.0)));

        let config = TrainingConfig {
            discount: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidDiscount(0.0)));

        let config = TrainingConfig {
            discount: 1.5,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidDiscount(1.5)));

        let config = TrainingConfig {
            epsilon: -0.1,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidEpsilon(-0.1)));
    }

    #[test]
    fn zero_episodes_and_discounting_are_accepted() {
        let config = TrainingConfig {
            episodes: 0,
            discount: 0.9,
            epsilon: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn variants_parse_from_strings() {
        assert_eq!(
            "ThirteenRanks".parse::<DrawVariant>().unwrap(),
            DrawVariant::ThirteenRanks
        );
        assert_eq!(
            "Zero".parse::<QInitialization>().unwrap(),
            QInitialization::Zero
        );
        assert!("Shoe".parse::<DrawVariant>().is_err());
        assert_eq!(DrawVariant::UniformTen.to_string(), "UniformTen");
    }

    #[test]
    fn action_from_bool() {
        assert_eq!(Action::from(true), Action::Hit);
        assert!(!Action::from(false).is_hit());
    }
}
