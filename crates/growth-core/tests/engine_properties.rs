mod common;

use approx::assert_abs_diff_eq;
use growth_core::{
    build_engine, GenderSelector, GrowthError, Group, PercentileResult, ReferenceRow,
    ReferenceTable, TableBuilder, RANKS,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_points(n: usize) -> Vec<(f64, f64)> {
    let mut rng = StdRng::seed_from_u64(0x5eed_2024);
    (0..n)
        .map(|_| (rng.gen_range(0.0..19.0), rng.gen_range(40.0..200.0)))
        .collect()
}

#[test]
fn single_group_results_stay_within_rank_bounds() {
    let engine = common::engine();
    for (age, height) in random_points(500) {
        for gender in [GenderSelector::Boys, GenderSelector::Girls] {
            let p = engine.percentile_of(age, height, gender).unwrap().average();
            assert!((0.1..=99.9).contains(&p), "age={age} height={height} p={p}");
        }
    }
}

#[test]
fn both_is_consistent_with_single_group_queries() {
    let engine = common::engine();
    for (age, height) in random_points(200) {
        let both = engine.percentile_of(age, height, GenderSelector::Both).unwrap();
        let boys = engine.percentile_of(age, height, GenderSelector::Boys).unwrap();
        let girls = engine.percentile_of(age, height, GenderSelector::Girls).unwrap();
        assert_eq!(both.boys(), boys.boys());
        assert_eq!(both.girls(), girls.girls());
        assert!(matches!(both, PercentileResult::Both { .. }));
    }
}

#[test]
fn repeated_queries_are_bit_identical() {
    let engine = common::engine();
    for (age, height) in random_points(50) {
        let a = engine.percentile_of(age, height, GenderSelector::Both).unwrap();
        let b = engine.percentile_of(age, height, GenderSelector::Both).unwrap();
        assert_eq!(a.boys().map(f64::to_bits), b.boys().map(f64::to_bits));
        assert_eq!(a.girls().map(f64::to_bits), b.girls().map(f64::to_bits));
        assert_eq!(a.average().to_bits(), b.average().to_bits());
    }
}

#[test]
fn taller_never_ranks_lower_at_the_same_age() {
    let engine = common::engine();
    for age in [0.0, 0.75, 2.5, 4.9, 5.0, 8.3, 13.0, 18.5] {
        for group in Group::ALL {
            let mut last = 0.0;
            for step in 0..=800 {
                let height = 40.0 + step as f64 * 0.2;
                let p = engine.percentile_of(age, height, group.into()).unwrap().average();
                assert!(p >= last, "age={age} group={group} height={height}: {p} < {last}");
                last = p;
            }
        }
    }
}

#[test]
fn median_curve_value_ranks_fiftieth_and_extremes_clamp() {
    let (boys, girls) = common::tables();
    let engine = build_engine(&boys, &girls).unwrap();
    for &age in boys.ages() {
        let p50 = boys.heights_at(age).unwrap()[7];
        let result = engine.percentile_of(age, p50, GenderSelector::Boys).unwrap();
        assert_abs_diff_eq!(result.average(), 50.0, epsilon = 0.1);

        let row = boys.heights_at(age).unwrap();
        let below = engine.percentile_of(age, row[0] - 1.0, GenderSelector::Boys).unwrap();
        let above = engine.percentile_of(age, row[14] + 1.0, GenderSelector::Boys).unwrap();
        assert_eq!(below.average(), 0.1);
        assert_eq!(above.average(), 99.9);
    }
}

#[test]
fn end_to_end_median_at_three_years() {
    // P50 rises 12 cm a year from 60 cm, so it is 96.0 cm at 3 years.
    let rows = (0..=120).map(|m| {
        let years = m as f64 / 12.0;
        let p50 = 60.0 + 12.0 * years;
        let heights = RANKS.map(|r| p50 + (r - 50.0) * 0.2);
        ReferenceRow::new(m as f64, heights).unwrap()
    });
    let table = ReferenceTable::from_rows(rows).unwrap();
    let engine = build_engine(&table, &table).unwrap();

    let result = engine.percentile_of(3.0, 96.0, GenderSelector::Boys).unwrap();
    let json = serde_json::to_value(result).unwrap();
    assert_eq!(json, serde_json::json!({ "boys": 50.0, "girls": null, "average": 50.0 }));
}

#[test]
fn malformed_rows_do_not_abort_table_construction() {
    let mut text = common::reference_csv(49.9);
    text.push_str("240;not;a;row\n");
    text = text.replacen("\n6;", "\n6;oops", 1);
    let table = TableBuilder::default().parse_str(&text).unwrap();
    assert_eq!(table.skipped_rows(), 2);
    // 6 months was the only grid row lost.
    assert_eq!(table.len(), 24);
    assert!(table.heights_at(0.5).is_none());
}

#[test]
fn inverse_query_round_trips_through_forward_query() {
    let engine = common::engine();
    for (age, _) in random_points(100) {
        for &rank in &[3.0, 25.0, 50.0, 85.0, 97.0] {
            let height = engine.height_at(age, rank, Group::Girls).unwrap();
            let p = engine.percentile_of(age, height, GenderSelector::Girls).unwrap();
            assert_abs_diff_eq!(p.average(), rank, epsilon = 1e-9);
        }
    }
}

#[test]
fn gender_text_outside_selectors_is_rejected() {
    assert!(matches!(
        "unknown".parse::<GenderSelector>(),
        Err(GrowthError::InvalidArgument(_))
    ));
}

#[test]
fn engine_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<growth_core::PercentileEngine>();

    let engine = std::sync::Arc::new(common::engine());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = engine.clone();
            std::thread::spawn(move || {
                engine.percentile_of(2.0 + i as f64, 95.0, GenderSelector::Both).unwrap()
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let expected = engine.percentile_of(2.0 + i as f64, 95.0, GenderSelector::Both).unwrap();
        assert_eq!(handle.join().unwrap(), expected);
    }
}
