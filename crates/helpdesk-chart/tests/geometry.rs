use proptest::prelude::*;
use proptest::test_runner::Config;

use helpdesk_chart::{compute_bar_geometry, compute_line_geometry, effective_max, BarDatum, BarOptions, LineOptions, Point};
use helpdesk_core::config::AppConfig;
use helpdesk_core::seed;

#[test]
fn weekly_conversation_bars() {
    let reports = seed::reports().expect("reports");
    let data: Vec<BarDatum> = reports.weekly_conversations.iter().copied().map(BarDatum::from).collect();
    let opts = BarOptions::default().with_labels(reports.weekdays.clone());

    assert!((effective_max(&reports.weekly_conversations, &opts) - 121.0).abs() < 1e-9);

    let bars = compute_bar_geometry(&data, &opts);
    assert_eq!(bars.len(), 7);
    let tallest = bars.iter().max_by(|a, b| a.height.total_cmp(&b.height)).expect("bars");
    let shortest = bars.iter().min_by(|a, b| a.height.total_cmp(&b.height)).expect("bars");
    assert_eq!(tallest.value, 110.0);
    assert_eq!(tallest.label, "Fri");
    assert_eq!(shortest.value, 45.0);
    assert!(shortest.height >= 12.0);
    assert!((tallest.height - 110.0 / 121.0 * 220.0).abs() < 1e-9);
}

#[test]
fn two_point_line_spans_width_with_inverted_y() {
    let data = vec![Point::new(0.0, 30.0), Point::new(6.0, 85.0)];
    let g = compute_line_geometry(&data, &LineOptions { width: 280.0, height: 150.0 });
    assert_eq!(g.points.len(), 2);
    assert_eq!(g.points[0].x, 0.0);
    assert_eq!(g.points[1].x, 280.0);
    assert!(g.points[1].y < g.points[0].y);
    assert_eq!(g.line_path, "M 0,150 L 280,0");
    assert_eq!(g.area_path, "M 0,150 L 280,0 L 280,150 L 0,150 Z");
    assert_eq!(g.latest_value, 85.0);
}

#[test]
fn engagement_series_from_seed() {
    let reports = seed::reports().expect("reports");
    let data: Vec<Point> = reports.user_engagement.iter().map(|p| Point::new(p.x, p.y)).collect();
    let g = compute_line_geometry(&data, &LineOptions::from(&AppConfig::default().charts));
    assert_eq!(g.points.len(), 7);
    assert_eq!(g.points[6].y, 0.0);
    assert_eq!(g.points[0].y, 150.0);
    assert!(g.axis_labels.is_none());
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn bar_height_is_monotone(values in prop::collection::vec(0.0_f64..1_000.0, 2..20), max in prop::option::of(1.0_f64..2_000.0)) {
        let mut opts = BarOptions::default();
        opts.max_value = max;
        let data: Vec<BarDatum> = values.iter().copied().map(BarDatum::from).collect();
        let bars = compute_bar_geometry(&data, &opts);
        for (a, b) in bars.iter().zip(bars.iter().skip(1)) {
            if a.value < b.value {
                prop_assert!(a.height <= b.height);
            }
            prop_assert!(a.height >= opts.min_bar_height);
        }
    }

    #[test]
    fn line_keeps_one_point_per_input(ys in prop::collection::vec(-1_000.0_f64..1_000.0, 2..30), width in 1.0_f64..2_000.0) {
        let data: Vec<Point> = ys.iter().enumerate().map(|(i, y)| Point::new(i as f64, *y)).collect();
        let g = compute_line_geometry(&data, &LineOptions { width, height: 150.0 });
        prop_assert_eq!(g.points.len(), data.len());
        prop_assert_eq!(g.points[0].x, 0.0);
        prop_assert!((g.points[data.len() - 1].x - width).abs() < 1e-9);
        for p in &g.points {
            prop_assert!(p.y >= -1e-9 && p.y <= 150.0 + 1e-9);
        }
    }

    #[test]
    fn line_points_are_finite_for_any_finite_input(
        pts in prop::collection::vec((prop::num::f64::NORMAL, prop::num::f64::NORMAL), 1..20)
    ) {
        let data: Vec<Point> = pts.iter().map(|&(x, y)| Point::new(x, y)).collect();
        let g = compute_line_geometry(&data, &LineOptions::default());
        for p in &g.points {
            prop_assert!(p.x.is_finite() && p.y.is_finite());
            prop_assert!(p.x >= 0.0 && p.x <= 280.0 + 1e-9);
            prop_assert!(p.y >= 0.0 && p.y <= 150.0 + 1e-9);
        }
        prop_assert!(!g.line_path.contains("NaN") && !g.line_path.contains("inf"));
    }
}
