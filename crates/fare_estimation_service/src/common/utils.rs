/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use super::types::*;
use chrono::{DateTime, Timelike, Utc};
use std::f64::consts::PI;

const EARTH_RADIUS_IN_KMS: f64 = 6371.0;
const SECONDS_PER_HOUR: f64 = 3600.0;
const SECONDS_PER_DAY: i64 = 86_400;

fn deg2rad(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

pub fn distance_between_in_kms(latlong1: &Point, latlong2: &Point) -> Kilometers {
    // Calculating using haversine formula
    let Latitude(lat1) = latlong1.lat;
    let Longitude(lon1) = latlong1.lon;
    let Latitude(lat2) = latlong2.lat;
    let Longitude(lon2) = latlong2.lon;

    let dlat = deg2rad(lat2 - lat1);
    let dlon = deg2rad(lon2 - lon1);

    let rlat1 = deg2rad(lat1);
    let rlat2 = deg2rad(lat2);

    let sq = |x: f64| x * x;

    // Rounding can push h marginally outside [0, 1] for antipodal points
    let h = (sq((dlat / 2.0).sin()) + rlat1.cos() * rlat2.cos() * sq((dlon / 2.0).sin()))
        .clamp(0.0, 1.0);

    Kilometers(2.0 * EARTH_RADIUS_IN_KMS * h.sqrt().atan2((1.0 - h).sqrt()))
}

pub fn segment_between(previous: &Ping, current: &Ping) -> Segment {
    let TimeStamp(start) = previous.timestamp;
    let TimeStamp(end) = current.timestamp;
    Segment {
        distance: distance_between_in_kms(&previous.location, &current.location),
        elapsed: Hours(end.wrapping_sub(start) as f64 / SECONDS_PER_HOUR),
        start: previous.timestamp,
    }
}

/// Hour of day in UTC, total over every `i64`.
pub fn get_hour_of_day(TimeStamp(ts): TimeStamp) -> u32 {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|datetime| datetime.hour())
        .unwrap_or_else(|| (ts.rem_euclid(SECONDS_PER_DAY) / 3600) as u32)
}
