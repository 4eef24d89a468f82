use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use blackjack_rl::TrainingConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "~/.blackjack_rl.yml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub training: ConfigTraining,
    pub trainer: ConfigTrainer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigTraining {
    pub episodes: u64,
    pub alpha: f64,
    pub discount: f64,
    pub epsilon: f64,
    pub draw_variant: String,
    pub initialization: String,
}

impl TryInto<TrainingConfig> for ConfigTraining {
    type Error = serde::de::value::Error;

    fn try_into(self) -> Result<TrainingConfig, Self::Error> {
        let training_config = TrainingConfig {
            episodes: self.episodes,
            alpha: self.alpha,
            discount: self.discount,
            epsilon: self.epsilon,
            draw_variant: self.draw_variant.parse()?,
            initialization: self.initialization.parse()?,
        };

        Ok(training_config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigTrainer {
    /// 0 means one thread per available core.
    pub number_of_threads: usize,
    pub evaluation_games: u64,
    /// Train both draw variants side by side instead of only the configured
    /// one.
    #[serde(default)]
    pub compare_draw_variants: bool,
}

/// Expands the default path into the home directory and checks that the
/// file exists.
pub fn resolve_config_path(path: &str) -> anyhow::Result<PathBuf> {
    let path = if path == DEFAULT_CONFIG_PATH {
        let home_dir = home::home_dir().context("Cannot find home directory")?;
        home_dir.join(".blackjack_rl.yml")
    } else {
        PathBuf::from(path)
    };
    if !path.exists() {
        bail!("Config file {} does not exist", path.display());
    }
    if path.is_dir() {
        bail!("{} should be a file rather than a directory", path.display());
    }
    Ok(path)
}

pub fn parse_config(content: &str) -> anyhow::Result<Config> {
    serde_yaml::from_str(content).context("Cannot parse config")
}

/// Reads the content of a given config file and parses it to a Config.
pub fn parse_config_from_file(filename: &Path) -> anyhow::Result<Config> {
    let file_content = fs::read_to_string(filename)
        .with_context(|| format!("Cannot read config file {}", filename.display()))?;
    parse_config(&file_content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackjack_rl::{DrawVariant, QInitialization};

    const TYPICAL_CONFIG: &str = r#"
training:
  episodes: 10000000
  alpha: 1.0
  discount: 1.0
  epsilon: 0.1
  draw_variant: ThirteenRanks
  initialization: StickOnTwenty
trainer:
  number_of_threads: 0
  evaluation_games: 100000
"#;

    fn get_typical_config_training() -> ConfigTraining {
        ConfigTraining {
            episodes: 1000,
            alpha: 1.0,
            discount: 0.9,
            epsilon: 0.1,
            draw_variant: String::from("UniformTen"),
            initialization: String::from("Zero"),
        }
    }

    #[test]
    fn can_parse_yaml() {
        let config = parse_config(TYPICAL_CONFIG).unwrap();
        assert_eq!(config.training.episodes, 10_000_000);
        assert_eq!(config.trainer.evaluation_games, 100_000);
        assert!(!config.trainer.compare_draw_variants);
        let training: TrainingConfig = config.training.try_into().unwrap();
        assert_eq!(training.draw_variant, DrawVariant::ThirteenRanks);
        assert_eq!(training.initialization, QInitialization::StickOnTwenty);
    }

    #[test]
    fn can_convert_training() {
        let converted: TrainingConfig = get_typical_config_training().try_into().unwrap();
        assert_eq!(converted.episodes, 1000);
        assert_eq!(converted.discount, 0.9);
        assert_eq!(converted.draw_variant, DrawVariant::UniformTen);
        assert_eq!(converted.initialization, QInitialization::Zero);
    }

    #[test]
    fn should_return_error_when_converting_training() {
        let mut config_training = get_typical_config_training();
        config_training.draw_variant = String::from("Not a variant");
        let convert_result: Result<TrainingConfig, serde::de::value::Error> =
            config_training.try_into();
        assert!(convert_result.is_err());
    }

    #[test]
    fn missing_sections_fail_to_parse() {
        assert!(parse_config("training:\n  episodes: 5\n").is_err());
    }

    #[test]
    fn missing_file_is_reported() {
        assert!(resolve_config_path("/definitely/not/here.yml").is_err());
    }
}
