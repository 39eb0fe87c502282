use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::DEFAULT_VARIATIONS;
use crate::ranking::RankingParams;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub sensitivity: SensitivityConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Default method parameters, used whenever a request leaves them out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankingConfig {
    #[serde(default = "default_vikor_v")]
    pub vikor_v: f64,
    #[serde(default = "default_waspas_lambda")]
    pub waspas_lambda: f64,
    #[serde(default = "default_codas_tau")]
    pub codas_tau: f64,
    #[serde(default = "default_gra_zeta")]
    pub gra_zeta: f64,
    #[serde(default = "default_todim_theta")]
    pub todim_theta: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensitivityConfig {
    #[serde(default = "default_variations")]
    pub variations: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Display rounding for table and CSV output only.
    #[serde(default = "default_decimals")]
    pub decimals: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub variations: Option<Vec<f64>>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub decimals: Option<usize>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/mcdm-engine/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        parsed
            .ranking
            .params()
            .validate()
            .with_context(|| format!("invalid [ranking] section: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(variations) = overrides.variations {
            self.sensitivity.variations = variations;
        }
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(decimals) = overrides.decimals {
            self.output.decimals = decimals;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn default_template() -> String {
        let template = r#"[ranking]
vikor_v = 0.5
waspas_lambda = 0.5
codas_tau = 0.02
gra_zeta = 0.5
todim_theta = 1.0

[sensitivity]
variations = [-30.0, -20.0, -10.0, 0.0, 10.0, 20.0, 30.0]

[server]
host = "127.0.0.1"
port = 3001

[output]
decimals = 4
"#;
        template.to_string()
    }
}

impl RankingConfig {
    pub fn params(&self) -> RankingParams {
        RankingParams {
            vikor_v: self.vikor_v,
            waspas_lambda: self.waspas_lambda,
            codas_tau: self.codas_tau,
            gra_zeta: self.gra_zeta,
            todim_theta: self.todim_theta,
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            vikor_v: default_vikor_v(),
            waspas_lambda: default_waspas_lambda(),
            codas_tau: default_codas_tau(),
            gra_zeta: default_gra_zeta(),
            todim_theta: default_todim_theta(),
        }
    }
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            variations: default_variations(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            decimals: default_decimals(),
        }
    }
}

fn default_vikor_v() -> f64 {
    0.5
}

fn default_waspas_lambda() -> f64 {
    0.5
}

fn default_codas_tau() -> f64 {
    0.02
}

fn default_gra_zeta() -> f64 {
    0.5
}

fn default_todim_theta() -> f64 {
    1.0
}

fn default_variations() -> Vec<f64> {
    DEFAULT_VARIATIONS.to_vec()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_decimals() -> usize {
    4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_matches_defaults() {
        let parsed: Config = toml::from_str(&Config::default_template()).expect("template");
        assert_eq!(parsed, Config::default());
        assert_eq!(parsed.ranking.params(), RankingParams::default());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let parsed: Config = toml::from_str("[ranking]\nvikor_v = 0.8\n").expect("partial");
        assert_eq!(parsed.ranking.vikor_v, 0.8);
        assert_eq!(parsed.ranking.codas_tau, 0.02);
        assert_eq!(parsed.server.port, 3001);
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut config = Config::default();
        config.apply_overrides(ConfigOverrides {
            port: Some(8080),
            decimals: Some(2),
            ..ConfigOverrides::default()
        });
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.output.decimals, 2);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn missing_file_loads_defaults() {
        let path = std::env::temp_dir().join("mcdm-engine-missing/config.toml");
        let config = Config::load(Some(&path)).expect("defaults");
        assert_eq!(config, Config::default());
    }
}
