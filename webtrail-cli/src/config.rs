// Copyright 2025 Webtrail (https://github.com/webtrail)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! TOML configuration file support. Command-line flags override
//! whatever the file provides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use webtrail_core::{MiningConfig, PredictionConfig, ReconstructionConfig};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebtrailConfig {
    #[serde(default)]
    pub reconstruction: ReconstructionConfig,
    #[serde(default)]
    pub mining: MiningConfig,
    #[serde(default)]
    pub prediction: PredictionConfig,
}

impl WebtrailConfig {
    /// Loads the configuration file when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: Self = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("parsing config file {}", path.display()))?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.reconstruction.validate()?;
        self.mining.validate()?;
        self.prediction.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: WebtrailConfig = toml::from_str("[mining]\nthreshold = 0.05\n").unwrap();
        assert_eq!(config.mining.threshold, 0.05);
        assert_eq!(config.prediction.predicted_items, 1);
        assert_eq!(config.reconstruction.duration_threshold_minutes, 30);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[prediction]").unwrap();
        writeln!(file, "predicted_items = 3").unwrap();
        writeln!(file, "max_tail_count = 2").unwrap();
        writeln!(file, "step_penalty = 0.2").unwrap();
        file.flush().unwrap();

        let config = WebtrailConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.prediction.predicted_items, 3);
        assert_eq!(config.prediction.max_tail_count, 2);
    }

    #[test]
    fn no_file_means_defaults() {
        let config = WebtrailConfig::load(None).unwrap();
        assert_eq!(config.mining.threshold, 0.01);
    }
}
