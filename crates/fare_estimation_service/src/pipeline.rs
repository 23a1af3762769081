/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::{
    common::{scheduler::estimate_fares_blocking, types::FareEstimates},
    environment::AppConfig,
    outbound::{ingestion::read_delivery_pings, sink::write_fare_estimates},
    tools::{error::AppError, logger::*, prometheus::gather_metrics},
};

/// Ingests, estimates and writes one batch. Nothing is written when ingestion fails.
pub fn estimate_and_write(app_config: &AppConfig) -> Result<FareEstimates, AppError> {
    let deliveries = read_delivery_pings(&app_config.input_path)?;

    let fare_estimates = estimate_fares_blocking(
        deliveries,
        app_config.fare_cfg,
        app_config.filter_cfg,
        app_config.workers,
    )?;

    write_fare_estimates(&app_config.output_path, &fare_estimates)?;

    Ok(fare_estimates)
}

/// Process body: every failure is reported on stdout and in the logs, and
/// the run always returns normally.
pub fn run(app_config: &AppConfig) {
    info!(
        tag = "[Fare Estimation Started]",
        input = %app_config.input_path,
        output = %app_config.output_path,
        workers = app_config.workers
    );

    match estimate_and_write(app_config) {
        Ok(_) => println!("Fare estimates written to {}", app_config.output_path),
        Err(err) => {
            error!(tag = "[Fare Estimation Failed]", code = %err.code(), error = %err);
            println!("{}", err);
        }
    }

    debug!(tag = "[Run Metrics]", "{}", gather_metrics());
}
