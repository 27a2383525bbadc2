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

#![allow(dead_code)]

use std::fs;
use std::time::Duration;

use tempfile::TempDir;

use parlance::prelude::ParlanceConfig;

use crate::setup::initialize_tracing;
mod setup;

/// Configuration loading, end to end against `XDG_CONFIG_HOME`.
///
/// One test covers all three phases because they share the process-wide
/// environment variable: defaults with no file present, a partial override,
/// and defaults again on a malformed file.
#[test]
fn configuration_loads_from_xdg_locations() {
    initialize_tracing();

    // Phase 1: no config file anywhere — every value is the default.
    let empty_dir = TempDir::new().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", empty_dir.path());
    let config = ParlanceConfig::load();
    assert_eq!(config.timeouts.router_shutdown_timeout_ms, 10_000);
    assert_eq!(config.limits.router_inbox_capacity, 255);
    assert_eq!(config.tracing.default_level, "info");
    assert_eq!(config.router_shutdown_timeout(), Duration::from_secs(10));

    // Phase 2: a partial file overrides what it names and leaves the rest.
    let override_dir = TempDir::new().unwrap();
    let config_dir = override_dir.path().join("parlance");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        r#"
            [timeouts]
            router_shutdown_timeout_ms = 2500

            [limits]
            router_inbox_capacity = 64
        "#,
    )
    .unwrap();
    std::env::set_var("XDG_CONFIG_HOME", override_dir.path());
    let config = ParlanceConfig::load();
    assert_eq!(config.timeouts.router_shutdown_timeout_ms, 2_500);
    assert_eq!(config.limits.router_inbox_capacity, 64);
    assert_eq!(config.tracing.default_level, "info");

    // Phase 3: a malformed file logs and falls back to defaults.
    let broken_dir = TempDir::new().unwrap();
    let config_dir = broken_dir.path().join("parlance");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "this is not toml = = =").unwrap();
    std::env::set_var("XDG_CONFIG_HOME", broken_dir.path());
    let config = ParlanceConfig::load();
    assert_eq!(config.timeouts.router_shutdown_timeout_ms, 10_000);

    std::env::remove_var("XDG_CONFIG_HOME");
}
