/* This file is part of FundForward (https://fundforward.app)
 *
 * Copyright (C) 2023-2026 FundForward contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use std::{
    env,
    fs::{self, File},
    io::Write,
    path::Path,
};

use simplelog::ConfigBuilder;

use crate::Result;

/// Map `-v` occurrences to a log level filter.
pub fn get_log_level(verbosity_level: u64) -> simplelog::LevelFilter {
    match verbosity_level {
        0 => simplelog::LevelFilter::Info,
        1 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    }
}

/// Build a logger config. `LOG_TARGETS` holds a comma-separated list of
/// targets to allow, prefix a target with `!` to ignore it instead.
pub fn get_log_config(verbosity_level: u64) -> simplelog::Config {
    let mut cfg = ConfigBuilder::new();

    match verbosity_level {
        0 | 1 => cfg.set_target_level(simplelog::LevelFilter::Off),
        _ => cfg.set_target_level(simplelog::LevelFilter::Error),
    };
    cfg.set_thread_level(simplelog::LevelFilter::Off);
    cfg.set_location_level(simplelog::LevelFilter::Off);

    if let Ok(targets) = env::var("LOG_TARGETS") {
        for target in targets.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match target.strip_prefix('!') {
                Some(t) => cfg.add_filter_ignore(t.to_string()),
                None => cfg.add_filter_allow(target.to_string()),
            };
        }
    }

    cfg.build()
}

/// Write the default config contents to `path` if nothing exists there yet.
/// Returns `true` when a new file was created.
pub fn spawn_config(path: &Path, contents: &[u8]) -> Result<bool> {
    if path.exists() {
        return Ok(false)
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    file.write_all(contents)?;
    println!("Config file created in {path:?}. Please review it.");

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_log_level() {
        assert_eq!(get_log_level(0), simplelog::LevelFilter::Info);
        assert_eq!(get_log_level(1), simplelog::LevelFilter::Debug);
        assert_eq!(get_log_level(5), simplelog::LevelFilter::Trace);
    }

    #[test]
    fn test_spawn_config() {
        let dir = env::temp_dir().join(format!("fundforward-spawn-{}", std::process::id()));
        let path = dir.join("nested/fundctl_config.toml");
        let _ = fs::remove_dir_all(&dir);

        assert!(spawn_config(&path, b"endpoint = \"http://127.0.0.1:1\"\n").unwrap());
        assert!(!spawn_config(&path, b"overwritten").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "endpoint = \"http://127.0.0.1:1\"\n");

        fs::remove_dir_all(&dir).unwrap();
    }
}
