/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::{
    common::types::*,
    tools::{error::AppError, logger::*},
};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Deserialize;
use std::{fs::File, io::Write};

pub const FARE_ESTIMATES_HEADER: [&str; 2] = ["id_delivery", "fare_estimate"];

#[derive(Debug, Deserialize)]
struct FareEstimateRow {
    id_delivery: String,
    fare_estimate: f64,
}

fn output_error(err: impl ToString) -> AppError {
    AppError::OutputWriteFailed(err.to_string())
}

/// Writes one `id_delivery,fare_estimate` row per delivery, sorted by id,
/// with fares rounded to two decimals.
pub fn write_fare_estimates_to_writer<W: Write>(
    writer: W,
    fare_estimates: &FareEstimates,
) -> Result<(), AppError> {
    let mut writer = WriterBuilder::new().from_writer(writer);

    writer
        .write_record(FARE_ESTIMATES_HEADER)
        .map_err(output_error)?;

    let mut entries: Vec<(&DeliveryId, &Fare)> = fare_estimates.iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));

    for (DeliveryId(delivery_id), Fare(fare)) in entries {
        writer
            .write_record([delivery_id.as_str(), format!("{fare:.2}").as_str()])
            .map_err(output_error)?;
    }

    writer.flush().map_err(output_error)
}

pub fn write_fare_estimates(file_path: &str, fare_estimates: &FareEstimates) -> Result<(), AppError> {
    let file = File::create(file_path).map_err(output_error)?;
    write_fare_estimates_to_writer(file, fare_estimates)?;
    info!(
        tag = "[Fare Estimates Written]",
        path = %file_path,
        deliveries = fare_estimates.len()
    );
    Ok(())
}

/// Parses a file produced by [`write_fare_estimates`] back into a mapping.
pub fn read_fare_estimates(file_path: &str) -> Result<FareEstimates, AppError> {
    let file = File::open(file_path).map_err(|err| AppError::InputOpenFailed(err.to_string()))?;
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    reader
        .deserialize::<FareEstimateRow>()
        .map(|row| {
            let row = row?;
            Ok::<_, AppError>((DeliveryId(row.id_delivery), Fare(row.fare_estimate)))
        })
        .collect()
}
