/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use super::{rate_policy::moving_rate_per_km, types::*, utils::segment_between};
use crate::environment::FareConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
struct FareAccumulator {
    metered_fare: f64,
    idle_hours: f64,
}

/// Fare for one delivery from its (already filtered) pings, in order.
///
/// Moving segments are billed by distance at the rate of their start time.
/// Slow segments only accumulate idle time, billed once at the end. Segments
/// with a non-positive elapsed time contribute nothing. The result never
/// drops below `minimum_fare`.
pub fn calculate_fare(pings: &[Ping], fare_cfg: &FareConfig) -> Fare {
    let accumulated = pings.windows(2).fold(
        FareAccumulator {
            metered_fare: fare_cfg.flag_fare,
            idle_hours: 0.0,
        },
        |mut acc, window| {
            let segment = segment_between(&window[0], &window[1]);
            match segment.speed() {
                Some(SpeedInKmPerHour(speed)) if speed > fare_cfg.moving_speed_threshold_kmph => {
                    acc.metered_fare +=
                        segment.distance.inner() * moving_rate_per_km(segment.start, fare_cfg);
                }
                Some(_) => acc.idle_hours += segment.elapsed.inner(),
                None => {}
            }
            acc
        },
    );

    let total_fare =
        accumulated.metered_fare + accumulated.idle_hours * fare_cfg.idle_rate_per_hour;

    Fare(total_fare.max(fare_cfg.minimum_fare))
}
