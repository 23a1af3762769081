/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::{
    common::types::*,
    tools::{error::AppError, logger::*, prometheus::TOTAL_PINGS_INGESTED},
};
use csv::{ByteRecord, ReaderBuilder};
use std::{borrow::Cow, fmt::Display, fs::File, io::Read, str::FromStr};

const HEADER_ROWS: usize = 1;

/// Missing fields read as empty, invalid UTF-8 is replaced rather than rejected.
fn field_at(record: &ByteRecord, column: usize) -> Cow<'_, str> {
    String::from_utf8_lossy(record.get(column).unwrap_or_default())
}

/// Parses a numeric field, falling back to the type's zero value when the
/// field is missing or malformed.
fn parse_or_default<T>(record: &ByteRecord, column: usize, row: usize) -> T
where
    T: FromStr + Default,
    T::Err: Display,
{
    let field = field_at(record, column);
    field.parse::<T>().unwrap_or_else(|err| {
        warn!(
            tag = "[Malformed Field Defaulted]",
            row = row,
            column = column,
            field = %field,
            error = %err
        );
        T::default()
    })
}

fn parse_ping(record: &ByteRecord, row: usize) -> Ping {
    Ping {
        delivery_id: DeliveryId(field_at(record, 0).into_owned()),
        location: Point {
            lat: Latitude(parse_or_default(record, 1, row)),
            lon: Longitude(parse_or_default(record, 2, row)),
        },
        timestamp: TimeStamp(parse_or_default(record, 3, row)),
    }
}

/// Groups `(id_delivery, lat, lng, timestamp)` rows by delivery, in file order.
///
/// The first row is treated as a header. Rows may carry any number of fields.
pub fn read_delivery_pings_from_reader<R: Read>(reader: R) -> Result<DeliveryGroups, AppError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut deliveries = DeliveryGroups::default();
    let mut rows: usize = 0;

    for (row, record) in reader.byte_records().enumerate().skip(HEADER_ROWS) {
        let ping = parse_ping(&record?, row);
        deliveries
            .entry(ping.delivery_id.to_owned())
            .or_insert_with(Vec::new)
            .push(ping);
        rows += 1;
    }

    TOTAL_PINGS_INGESTED.inc_by(rows as u64);
    info!(
        tag = "[Delivery Pings Ingested]",
        rows = rows,
        deliveries = deliveries.len()
    );

    Ok(deliveries)
}

pub fn read_delivery_pings(file_path: &str) -> Result<DeliveryGroups, AppError> {
    let file = File::open(file_path).map_err(|err| AppError::InputOpenFailed(err.to_string()))?;
    read_delivery_pings_from_reader(file)
}
