/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(Deserialize, Serialize, Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct DeliveryId(pub String);
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Copy, Default)]
pub struct Latitude(pub f64);
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Copy, Default)]
pub struct Longitude(pub f64);
/// Seconds since the unix epoch, UTC.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Hash, Ord, Default)]
pub struct TimeStamp(pub i64);
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, PartialOrd, Copy)]
pub struct Kilometers(pub f64);
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, PartialOrd, Copy)]
pub struct Hours(pub f64);
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, PartialOrd, Copy)]
pub struct SpeedInKmPerHour(pub f64);
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, PartialOrd, Copy)]
pub struct Fare(pub f64);

impl DeliveryId {
    pub fn inner(&self) -> String {
        self.0.to_owned()
    }
}

macro_rules! impl_inner_copy {
    ($($name:ident => $ty:ty),* $(,)?) => {
        $(
            impl $name {
                pub fn inner(&self) -> $ty {
                    self.0
                }
            }
        )*
    };
}

impl_inner_copy!(
    Latitude => f64,
    Longitude => f64,
    TimeStamp => i64,
    Kilometers => f64,
    Hours => f64,
    SpeedInKmPerHour => f64,
    Fare => f64,
);

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Copy, Default)]
pub struct Point {
    pub lat: Latitude,
    pub lon: Longitude,
}

/// One GPS observation of a delivery.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Ping {
    pub delivery_id: DeliveryId,
    pub location: Point,
    pub timestamp: TimeStamp,
}

/// Derived quantities between two consecutive pings.
#[derive(Clone, Debug, PartialEq, Copy)]
pub struct Segment {
    pub distance: Kilometers,
    pub elapsed: Hours,
    pub start: TimeStamp,
}

impl Segment {
    /// `None` when the elapsed time is zero or negative, since no speed can be derived.
    pub fn speed(&self) -> Option<SpeedInKmPerHour> {
        let Hours(elapsed) = self.elapsed;
        if elapsed > 0.0 {
            Some(SpeedInKmPerHour(self.distance.inner() / elapsed))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Display, Eq, Hash, PartialEq)]
pub enum DropReason {
    #[strum(serialize = "non_positive_elapsed")]
    NonPositiveElapsed,
    #[strum(serialize = "over_speed")]
    OverSpeed,
}

pub type DeliveryGroups = FxHashMap<DeliveryId, Vec<Ping>>;
pub type FareEstimates = FxHashMap<DeliveryId, Fare>;
