use std::fmt::Display;

use anyhow::{Result, bail};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Local,
    Development,
    Production,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stage = match self {
            Stage::Local => "local",
            Stage::Development => "development",
            Stage::Production => "production",
        };
        write!(f, "{}", stage)
    }
}

impl TryFrom<&String> for Stage {
    type Error = anyhow::Error;

    fn try_from(value: &String) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Stage::Local),
            "development" | "dev" => Ok(Stage::Development),
            "production" | "prod" => Ok(Stage::Production),
            other => bail!("Unknown stage: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_names() {
        assert_eq!(Stage::try_from(&"dev".to_string()).unwrap(), Stage::Development);
        assert_eq!(Stage::try_from(&" Production ".to_string()).unwrap(), Stage::Production);
    }

    #[test]
    fn unknown_stage_falls_back_to_local_default() {
        let stage = Stage::try_from(&"staging".to_string()).unwrap_or_default();
        assert_eq!(stage, Stage::Local);
        assert_eq!(stage.to_string(), "local");
    }
}
