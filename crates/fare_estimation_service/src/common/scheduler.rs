/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use super::{fare::calculate_fare, filter::filter_pings, types::*};
use crate::{
    environment::{FareConfig, FilterConfig},
    fare_computation_duration,
    tools::{
        error::AppError,
        logger::*,
        prometheus::{GROUP_COMPUTATION_FAILURES, TOTAL_FARES_COMPUTED, TOTAL_PINGS_DROPPED},
    },
};
use futures::future::join_all;
use std::{sync::Arc, time::Instant};
use tokio::{
    runtime::Builder,
    sync::{mpsc, Semaphore},
};

/// Runs the point filter and fare accumulator for a single delivery group.
pub fn estimate_group_fare(
    delivery_id: &DeliveryId,
    pings: &[Ping],
    fare_cfg: &FareConfig,
    filter_cfg: &FilterConfig,
) -> Fare {
    let start = Instant::now();

    let filtered = filter_pings(pings, filter_cfg);
    for reason in filtered.dropped.iter() {
        TOTAL_PINGS_DROPPED
            .with_label_values(&[reason.to_string().as_str()])
            .inc();
    }

    let fare = calculate_fare(&filtered.retained, fare_cfg);

    debug!(
        tag = "[Fare Computed]",
        delivery_id = %delivery_id.inner(),
        retained = filtered.retained.len(),
        dropped = filtered.dropped.len(),
        fare = fare.inner()
    );

    fare_computation_duration!(start);
    TOTAL_FARES_COMPUTED.inc();

    fare
}

/// Fans every non-empty group out to its own task and fans the fares back in
/// through a single channel.
///
/// At most `workers` groups (minimum one) are computed at a time. A task that
/// panics is logged and its delivery is left out, every other group still
/// completes.
pub async fn run_groups<F>(groups: DeliveryGroups, workers: usize, compute: F) -> FareEstimates
where
    F: Fn(&DeliveryId, &[Ping]) -> Fare + Send + Sync + 'static,
{
    let compute = Arc::new(compute);
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let (sender, mut receiver) = mpsc::channel::<(DeliveryId, Fare)>(groups.len().max(1));

    let mut delivery_ids = Vec::with_capacity(groups.len());
    let mut handles = Vec::with_capacity(groups.len());

    for (delivery_id, pings) in groups {
        if pings.is_empty() {
            debug!(tag = "[Skipping Empty Delivery Group]", delivery_id = %delivery_id.inner());
            continue;
        }

        let sender = sender.clone();
        let semaphore = semaphore.clone();
        let compute = compute.clone();

        delivery_ids.push(delivery_id.to_owned());
        handles.push(tokio::spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(err) => {
                    GROUP_COMPUTATION_FAILURES.inc();
                    error!(
                        tag = "[Worker Permit Unavailable]",
                        delivery_id = %delivery_id.inner(),
                        error = %err
                    );
                    return;
                }
            };
            let fare = compute(&delivery_id, pings.as_slice());
            if let Err(err) = sender.send((delivery_id, fare)).await {
                error!(tag = "[Fare Result Dropped]", error = %err);
            }
        }));
    }

    // The aggregator stops once every task has dropped its sender.
    drop(sender);

    let mut fare_estimates = FareEstimates::default();
    while let Some((delivery_id, fare)) = receiver.recv().await {
        fare_estimates.insert(delivery_id, fare);
    }

    for (delivery_id, result) in delivery_ids.into_iter().zip(join_all(handles).await) {
        if let Err(err) = result {
            GROUP_COMPUTATION_FAILURES.inc();
            let err = AppError::GroupComputationFailed(delivery_id.inner(), err.to_string());
            error!(tag = "[Delivery Group Failed]", code = %err.code(), error = %err);
        }
    }

    fare_estimates
}

pub async fn estimate_fares(
    groups: DeliveryGroups,
    fare_cfg: FareConfig,
    filter_cfg: FilterConfig,
    workers: usize,
) -> FareEstimates {
    run_groups(groups, workers, move |delivery_id, pings| {
        estimate_group_fare(delivery_id, pings, &fare_cfg, &filter_cfg)
    })
    .await
}

/// Same as [`estimate_fares`], on a dedicated runtime with `workers` threads.
pub fn estimate_fares_blocking(
    groups: DeliveryGroups,
    fare_cfg: FareConfig,
    filter_cfg: FilterConfig,
    workers: usize,
) -> Result<FareEstimates, AppError> {
    let runtime = Builder::new_multi_thread()
        .worker_threads(workers.max(1))
        .thread_name("fare-worker")
        .build()
        .map_err(|err| AppError::RuntimeStartFailed(err.to_string()))?;

    Ok(runtime.block_on(estimate_fares(groups, fare_cfg, filter_cfg, workers)))
}
