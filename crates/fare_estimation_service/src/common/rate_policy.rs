/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use super::{types::TimeStamp, utils::get_hour_of_day};
use crate::environment::FareConfig;

/// Per kilometer rate for a segment starting at `timestamp`.
pub fn moving_rate_per_km(timestamp: TimeStamp, fare_cfg: &FareConfig) -> f64 {
    let hour = get_hour_of_day(timestamp);
    if hour >= fare_cfg.day_start_hour && hour < fare_cfg.day_end_hour {
        fare_cfg.day_rate_per_km
    } else {
        fare_cfg.night_rate_per_km
    }
}
