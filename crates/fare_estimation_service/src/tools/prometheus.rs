/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
#![allow(clippy::expect_used)]

use prometheus::{
    opts, register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder,
    HistogramVec, IntCounter, IntCounterVec, TextEncoder,
};

pub static TOTAL_PINGS_INGESTED: once_cell::sync::Lazy<IntCounter> =
    once_cell::sync::Lazy::new(|| {
        register_int_counter!("total_pings_ingested", "Total Pings Ingested")
            .expect("Failed to register total pings ingested metrics")
    });

pub static TOTAL_PINGS_DROPPED: once_cell::sync::Lazy<IntCounterVec> =
    once_cell::sync::Lazy::new(|| {
        register_int_counter_vec!(
            opts!("total_pings_dropped", "Pings Rejected By Point Filter"),
            &["reason"]
        )
        .expect("Failed to register total pings dropped metrics")
    });

pub static TOTAL_FARES_COMPUTED: once_cell::sync::Lazy<IntCounter> =
    once_cell::sync::Lazy::new(|| {
        register_int_counter!("total_fares_computed", "Total Fares Computed")
            .expect("Failed to register total fares computed metrics")
    });

pub static GROUP_COMPUTATION_FAILURES: once_cell::sync::Lazy<IntCounter> =
    once_cell::sync::Lazy::new(|| {
        register_int_counter!(
            "group_computation_failures",
            "Delivery Groups Whose Fare Task Failed"
        )
        .expect("Failed to register group computation failure metrics")
    });

pub static FARE_COMPUTATION_DURATION: once_cell::sync::Lazy<HistogramVec> =
    once_cell::sync::Lazy::new(|| {
        register_histogram_vec!(
            opts!(
                "fare_computation_duration_seconds",
                "Filter And Fare Computation Per Delivery Group"
            )
            .into(),
            &[]
        )
        .expect("Failed to register fare computation duration metrics")
    });

/// Observes the time spent on one delivery group since `$start`.
#[macro_export]
macro_rules! fare_computation_duration {
    ($start:expr) => {
        let duration = $start.elapsed().as_secs_f64();
        $crate::tools::prometheus::FARE_COMPUTATION_DURATION
            .with_label_values(&[])
            .observe(duration);
    };
}

/// Renders every registered metric in the prometheus text format.
pub fn gather_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if encoder.encode(&prometheus::gather(), &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
