/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use super::{types::*, utils::segment_between};
use crate::environment::FilterConfig;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilteredPings {
    pub retained: Vec<Ping>,
    pub dropped: Vec<DropReason>,
}

fn check_ping(previous: &Ping, current: &Ping, filter_cfg: &FilterConfig) -> Option<DropReason> {
    match segment_between(previous, current).speed() {
        None => Some(DropReason::NonPositiveElapsed),
        // NaN speeds fail the comparison and are dropped with the outliers
        Some(SpeedInKmPerHour(speed)) if speed <= filter_cfg.max_speed_kmph => None,
        Some(_) => Some(DropReason::OverSpeed),
    }
}

/// Drops pings that cannot be reached from the ping just before them in `pings`.
///
/// The first ping is always kept. Every later ping is judged against its
/// immediate predecessor in the input, whether or not that predecessor was
/// kept, so a single outlier never becomes the reference for the next ping.
pub fn filter_pings(pings: &[Ping], filter_cfg: &FilterConfig) -> FilteredPings {
    let Some(first) = pings.first() else {
        return FilteredPings::default();
    };

    pings.windows(2).fold(
        FilteredPings {
            retained: vec![first.to_owned()],
            dropped: vec![],
        },
        |mut filtered, window| {
            let (previous, current) = (&window[0], &window[1]);
            match check_ping(previous, current, filter_cfg) {
                Some(reason) => filtered.dropped.push(reason),
                None => filtered.retained.push(current.to_owned()),
            }
            filtered
        },
    )
}
