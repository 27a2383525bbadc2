/*
 * Copyright (c) 2025. Parlance Contributors
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use std::time::Duration;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Configuration for a Parlance deployment.
///
/// All values are optional in the file; anything absent falls back to the
/// defaults below. Loaded from TOML in XDG-compliant directories.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParlanceConfig {
    /// Timeout configuration.
    pub timeouts: TimeoutConfig,
    /// Limits and capacity configuration.
    pub limits: LimitsConfig,
    /// Tracing and logging configuration.
    pub tracing: TracingConfig,
    /// Path configuration for log output.
    pub paths: PathsConfig,
}

/// Timeout-related configuration values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// How long a router shutdown waits for in-flight deliveries, in
    /// milliseconds.
    pub router_shutdown_timeout_ms: u64,
}

/// Limits and capacity configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// MPSC channel size of a router's delivery inbox.
    pub router_inbox_capacity: usize,
}

/// Tracing and logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub default_level: String,
}

/// Path configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory for log files.
    pub log_directory: String,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            router_shutdown_timeout_ms: 10_000,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            router_inbox_capacity: 255,
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: "info".to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            log_directory: "~/.local/share/parlance/logs".to_string(),
        }
    }
}

impl ParlanceConfig {
    /// Convert the router shutdown timeout to a `Duration`.
    pub const fn router_shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.timeouts.router_shutdown_timeout_ms)
    }

    /// Load configuration from XDG-compliant locations.
    ///
    /// Looks for `$XDG_CONFIG_HOME/parlance/config.toml` (with the usual
    /// platform fallbacks). A missing file yields the defaults; a malformed
    /// file logs an error and yields the defaults.
    pub fn load() -> Self {
        use tracing::{error, info};

        let xdg_dirs = match xdg::BaseDirectories::with_prefix("parlance") {
            Ok(dirs) => dirs,
            Err(e) => {
                error!("Failed to initialize XDG directories: {}", e);
                return Self::default();
            }
        };

        let Some(path) = xdg_dirs.find_config_file("config.toml") else {
            info!("No configuration file found, using defaults");
            return Self::default();
        };

        info!("Loading configuration from: {}", path.display());
        match std::fs::read_to_string(&path) {
            Ok(config_str) => match toml::from_str::<Self>(&config_str) {
                Ok(config) => config,
                Err(e) => {
                    error!("Failed to parse configuration file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                error!("Failed to read configuration file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

lazy_static! {
    /// Global configuration instance loaded from XDG-compliant locations.
    pub static ref CONFIG: ParlanceConfig = ParlanceConfig::load();
}
