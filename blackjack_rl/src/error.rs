/// Rejected training parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    InvalidAlpha(f64),
    InvalidDiscount(f64),
    InvalidEpsilon(f64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidAlpha(alpha) => {
                write!(f, "alpha must be a positive number, got {}", alpha)
            }
            ConfigError::InvalidDiscount(discount) => {
                write!(f, "discount must be in (0, 1], got {}", discount)
            }
            ConfigError::InvalidEpsilon(epsilon) => {
                write!(f, "epsilon must be in [0, 1], got {}", epsilon)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// A policy lookup for a state that was never part of the training domain,
/// or a loaded policy table that does not cover exactly that domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainError {
    OutOfDomain {
        dealer_up_card: u8,
        player_value: u8,
        useable_ace: bool,
    },
    MalformedPolicy {
        useable_ace: bool,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::OutOfDomain {
                dealer_up_card,
                player_value,
                useable_ace,
            } => write!(
                f,
                "no policy entry for dealer card {}, player value {} (useable ace: {})",
                dealer_up_card, player_value, useable_ace
            ),
            DomainError::MalformedPolicy { useable_ace } => write!(
                f,
                "policy slice (useable ace: {}) does not cover the training domain",
                useable_ace
            ),
        }
    }
}

impl std::error::Error for DomainError {}

#[derive(Debug, Clone, PartialEq)]
pub enum TrainingError {
    Config(ConfigError),
    WorkerPanicked,
}

impl std::fmt::Display for TrainingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrainingError::Config(err) => write!(f, "invalid training config: {}", err),
            TrainingError::WorkerPanicked => {
                write!(f, "training worker stopped before publishing a policy")
            }
        }
    }
}

impl std::error::Error for TrainingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrainingError::Config(err) => Some(err),
            TrainingError::WorkerPanicked => None,
        }
    }
}

impl From<ConfigError> for TrainingError {
    fn from(err: ConfigError) -> Self {
        TrainingError::Config(err)
    }
}
