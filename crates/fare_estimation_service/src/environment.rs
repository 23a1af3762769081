/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::tools::{
    error::AppError,
    logger::{LogLevel, LoggerConfig},
};
use serde::{Deserialize, Serialize};
use std::{env::var, thread::available_parallelism};

pub const DEFAULT_INPUT_PATH: &str = "./sample_data.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "fare_estimates.csv";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub logger_cfg: LoggerConfig,
    pub input_path: String,
    pub output_path: String,
    pub workers: usize,
    pub fare_cfg: FareConfig,
    pub filter_cfg: FilterConfig,
}

/// Pricing constants. Rates are per kilometer, the idle rate is per hour.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct FareConfig {
    pub flag_fare: f64,
    pub minimum_fare: f64,
    pub idle_rate_per_hour: f64,
    pub day_rate_per_km: f64,
    pub night_rate_per_km: f64,
    /// Day covers `[day_start_hour, day_end_hour)` in UTC, everything else is night.
    pub day_start_hour: u32,
    pub day_end_hour: u32,
    /// Segments strictly faster than this are billed by distance, the rest as idle time.
    pub moving_speed_threshold_kmph: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    pub max_speed_kmph: f64,
}

impl Default for FareConfig {
    fn default() -> Self {
        Self {
            flag_fare: 1.30,
            minimum_fare: 3.47,
            idle_rate_per_hour: 11.90,
            day_rate_per_km: 0.74,
            night_rate_per_km: 1.30,
            day_start_hour: 5,
            day_end_hour: 24,
            moving_speed_threshold_kmph: 10.0,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_speed_kmph: 100.0,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logger_cfg: LoggerConfig {
                level: LogLevel::INFO,
                log_to_file: false,
            },
            input_path: DEFAULT_INPUT_PATH.to_string(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            workers: available_parallelism().map(|n| n.get()).unwrap_or(1),
            fare_cfg: FareConfig::default(),
            filter_cfg: FilterConfig::default(),
        }
    }
}

pub fn read_dhall_config(config_path: &str) -> Result<AppConfig, AppError> {
    serde_dhall::from_file(config_path)
        .parse::<AppConfig>()
        .map_err(|err| AppError::ConfigReadFailed(err.to_string()))
}

/// Reads the dhall file named by `DHALL_CONFIG`, or falls back to the built-in defaults.
pub fn load_app_config() -> Result<AppConfig, AppError> {
    match var("DHALL_CONFIG") {
        Ok(dhall_config_path) => read_dhall_config(&dhall_config_path),
        Err(_) => Ok(AppConfig::default()),
    }
}
