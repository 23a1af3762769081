/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use fare_estimation_service::{
    common::{
        fare::calculate_fare,
        filter::filter_pings,
        scheduler::{estimate_fares, estimate_fares_blocking, run_groups},
        types::*,
    },
    environment::{AppConfig, FareConfig, FilterConfig},
    outbound::{
        ingestion::{read_delivery_pings, read_delivery_pings_from_reader},
        sink::{read_fare_estimates, write_fare_estimates},
    },
    pipeline::{estimate_and_write, run},
    tools::error::AppError,
};
use std::path::Path;
use rand::{rngs::StdRng, Rng, SeedableRng};

// 2023-09-30T22:00:00Z
const DAY_TS: i64 = 1696111200;

fn ping(id: &str, lat: f64, lon: f64, ts: i64) -> Ping {
    Ping {
        delivery_id: DeliveryId(id.to_string()),
        location: Point {
            lat: Latitude(lat),
            lon: Longitude(lon),
        },
        timestamp: TimeStamp(ts),
    }
}

/// A courier wandering around a start point with occasional GPS jumps,
/// stalls and repeated timestamps.
fn random_walk(rng: &mut StdRng, id: &str, len: usize) -> Vec<Ping> {
    let (mut lat, mut lon) = (rng.gen_range(-60.0..60.0), rng.gen_range(-170.0..170.0));
    let mut ts: i64 = rng.gen_range(1_600_000_000..1_700_000_000);
    (0..len)
        .map(|_| {
            ts += rng.gen_range(-5..120);
            if rng.gen_bool(0.05) {
                lat += rng.gen_range(-1.0..1.0);
            } else {
                lat += rng.gen_range(-0.002..0.002);
                lon += rng.gen_range(-0.002..0.002);
            }
            ping(id, lat, lon, ts)
        })
        .collect()
}

fn random_groups(seed: u64, groups: usize) -> DeliveryGroups {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..groups)
        .map(|n| {
            let id = format!("delivery-{n}");
            let len = rng.gen_range(0..60);
            let pings = random_walk(&mut rng, &id, len);
            (DeliveryId(id), pings)
        })
        .collect()
}

fn assert_bit_identical(left: &FareEstimates, right: &FareEstimates) {
    assert_eq!(left.len(), right.len());
    for (delivery_id, Fare(fare)) in left.iter() {
        let Fare(other) = right[delivery_id];
        assert_eq!(fare.to_bits(), other.to_bits(), "{delivery_id:?}");
    }
}

#[test]
fn two_point_day_trip_is_metered() {
    let pings = vec![
        ping("1", 51.5007, 0.1246, DAY_TS),
        ping("1", 40.6892, 74.0445, DAY_TS + 3600),
    ];
    let Fare(fare) = calculate_fare(&pings, &FareConfig::default());
    assert!((fare - (1.30 + 5574.840456848555 * 0.74)).abs() < 0.01);
}

#[test]
fn group_reduced_to_one_point_pays_minimum() {
    // The jump is far beyond the speed limit, leaving only the anchor.
    let groups: DeliveryGroups = [(
        DeliveryId("1".to_string()),
        vec![
            ping("1", 51.5007, 0.1246, DAY_TS),
            ping("1", 40.6892, 74.0445, DAY_TS + 3600),
        ],
    )]
    .into_iter()
    .collect();

    let fare_estimates =
        estimate_fares_blocking(groups, FareConfig::default(), FilterConfig::default(), 2)
            .unwrap();
    assert_eq!(fare_estimates[&DeliveryId("1".to_string())], Fare(3.47));
}

#[test]
fn filter_never_grows_and_keeps_anchor() {
    let filter_cfg = FilterConfig::default();
    for (_, pings) in random_groups(7, 200) {
        let filtered = filter_pings(&pings, &filter_cfg);
        assert!(filtered.retained.len() <= pings.len());
        assert_eq!(
            filtered.retained.len() + filtered.dropped.len(),
            pings.len()
        );
        if let Some(first) = pings.first() {
            assert_eq!(filtered.retained.first(), Some(first));
        }
    }
}

#[test]
fn fares_never_fall_below_minimum() {
    let fare_estimates = estimate_fares_blocking(
        random_groups(11, 300),
        FareConfig::default(),
        FilterConfig::default(),
        4,
    )
    .unwrap();
    assert!(fare_estimates.values().all(|Fare(fare)| *fare >= 3.47));
}

#[test]
fn empty_groups_are_absent_from_output() {
    let groups = random_groups(3, 100);
    let non_empty = groups.values().filter(|pings| !pings.is_empty()).count();
    let empty_ids: Vec<DeliveryId> = groups
        .iter()
        .filter(|(_, pings)| pings.is_empty())
        .map(|(id, _)| id.to_owned())
        .collect();

    let fare_estimates =
        estimate_fares_blocking(groups, FareConfig::default(), FilterConfig::default(), 3)
            .unwrap();

    assert_eq!(fare_estimates.len(), non_empty);
    assert!(empty_ids.iter().all(|id| !fare_estimates.contains_key(id)));
}

#[test]
fn pipeline_is_idempotent() {
    let groups = random_groups(19, 150);
    let first = estimate_fares_blocking(
        groups.clone(),
        FareConfig::default(),
        FilterConfig::default(),
        4,
    )
    .unwrap();
    let second =
        estimate_fares_blocking(groups, FareConfig::default(), FilterConfig::default(), 4)
            .unwrap();
    assert_bit_identical(&first, &second);
}

#[test]
fn result_does_not_depend_on_parallelism() {
    let groups = random_groups(23, 250);
    let sequential = estimate_fares_blocking(
        groups.clone(),
        FareConfig::default(),
        FilterConfig::default(),
        1,
    )
    .unwrap();
    for workers in [2, 4, 16] {
        let parallel = estimate_fares_blocking(
            groups.clone(),
            FareConfig::default(),
            FilterConfig::default(),
            workers,
        )
        .unwrap();
        assert_bit_identical(&sequential, &parallel);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn async_scheduler_matches_direct_computation() {
    let groups = random_groups(29, 80);
    let fare_cfg = FareConfig::default();
    let filter_cfg = FilterConfig::default();

    let expected: FareEstimates = groups
        .iter()
        .filter(|(_, pings)| !pings.is_empty())
        .map(|(id, pings)| {
            let filtered = filter_pings(pings, &filter_cfg);
            (id.to_owned(), calculate_fare(&filtered.retained, &fare_cfg))
        })
        .collect();

    let fare_estimates = estimate_fares(groups, fare_cfg, filter_cfg, 8).await;
    assert_bit_identical(&expected, &fare_estimates);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failing_group_does_not_abort_others() {
    let groups: DeliveryGroups = ["ok-1", "boom", "ok-2"]
        .into_iter()
        .map(|id| (DeliveryId(id.to_string()), vec![ping(id, 1.0, 1.0, DAY_TS)]))
        .collect();

    let fare_estimates = run_groups(groups, 2, |delivery_id, _pings| {
        if delivery_id.0 == "boom" {
            panic!("computation failed");
        }
        Fare(42.0)
    })
    .await;

    assert_eq!(fare_estimates.len(), 2);
    assert_eq!(fare_estimates[&DeliveryId("ok-1".to_string())], Fare(42.0));
    assert_eq!(fare_estimates[&DeliveryId("ok-2".to_string())], Fare(42.0));
    assert!(!fare_estimates.contains_key(&DeliveryId("boom".to_string())));
}

#[test]
fn overridden_rates_flow_through_the_pipeline() {
    let pings = vec![
        ping("x", 0.0, 0.0, DAY_TS),
        ping("x", 0.1, 0.0, DAY_TS + 600),
    ];
    let groups: DeliveryGroups = [(DeliveryId("x".to_string()), pings.clone())]
        .into_iter()
        .collect();
    let fare_cfg = FareConfig {
        flag_fare: 10.0,
        day_rate_per_km: 2.0,
        ..FareConfig::default()
    };

    let fare_estimates =
        estimate_fares_blocking(groups, fare_cfg, FilterConfig::default(), 1).unwrap();
    let Fare(fare) = fare_estimates[&DeliveryId("x".to_string())];
    let Fare(default_fare) = calculate_fare(&pings, &FareConfig::default());

    assert!(fare > default_fare);
    assert_eq!(Fare(fare), calculate_fare(&pings, &fare_cfg));
}

#[test]
fn csv_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("sample_data.csv");
    let output_path = dir.path().join("fare_estimates.csv");

    let input = "id_delivery,lat,lng,timestamp
1,37.966660,23.728308,1405594957
1,37.966627,23.728263,1405594966
1,37.961515,23.730893,1405595041
2,37.946545,23.754918,1405591065
2,37.945351,23.753531,1405591114
3,37.934444,23.712221,1405591200
";
    std::fs::write(&input_path, input).unwrap();

    let groups = read_delivery_pings(input_path.to_str().unwrap()).unwrap();
    assert_eq!(
        groups,
        read_delivery_pings_from_reader(input.as_bytes()).unwrap()
    );

    let fare_estimates =
        estimate_fares_blocking(groups, FareConfig::default(), FilterConfig::default(), 2)
            .unwrap();
    write_fare_estimates(output_path.to_str().unwrap(), &fare_estimates).unwrap();

    let read_back = read_fare_estimates(output_path.to_str().unwrap()).unwrap();
    assert_eq!(read_back.len(), 3);
    for (delivery_id, Fare(fare)) in fare_estimates.iter() {
        assert!((read_back[delivery_id].inner() - fare).abs() <= 0.01);
    }
}

fn app_config(input_path: &Path, output_path: &Path) -> AppConfig {
    AppConfig {
        input_path: input_path.to_string_lossy().into_owned(),
        output_path: output_path.to_string_lossy().into_owned(),
        workers: 2,
        ..AppConfig::default()
    }
}

#[test]
fn missing_input_writes_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("fare_estimates.csv");
    let app_config = app_config(&dir.path().join("missing.csv"), &output_path);

    let err = estimate_and_write(&app_config).unwrap_err();
    assert!(matches!(err, AppError::InputOpenFailed(_)));

    run(&app_config);
    assert!(!output_path.exists());
}

#[test]
fn unwritable_output_is_reported_and_run_returns() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("sample_data.csv");
    let output_path = dir.path().join("no_such_dir").join("fare_estimates.csv");
    std::fs::write(&input_path, "id_delivery,lat,lng,timestamp\n1,1.0,1.0,100\n").unwrap();
    let app_config = app_config(&input_path, &output_path);

    let err = estimate_and_write(&app_config).unwrap_err();
    assert!(matches!(err, AppError::OutputWriteFailed(_)));

    run(&app_config);
    assert!(!output_path.exists());
}

#[test]
fn successful_run_writes_every_delivery() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("sample_data.csv");
    let output_path = dir.path().join("fare_estimates.csv");
    std::fs::write(
        &input_path,
        "id_delivery,lat,lng,timestamp\n1,1.0,1.0,100\n2,2.0,2.0,100\n2,2.0,2.0,3700\n",
    )
    .unwrap();

    run(&app_config(&input_path, &output_path));

    let written = std::fs::read_to_string(&output_path).unwrap();
    assert_eq!(
        written,
        "id_delivery,fare_estimate\n1,3.47\n2,13.20\n"
    );
}
