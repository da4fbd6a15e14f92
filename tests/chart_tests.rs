use benchplot::aggregator::grouping::Grouping;
use benchplot::chart::cone::{build_cone, ConeRegion, ConeSpec};
use benchplot::chart::layout::{render_chart, ChartSpec, Threshold};
use benchplot::chart::style::StyleTable;
use benchplot::chart::trend::fit_power_law;
use benchplot::parser::schema::{Column, Field, Metric};
use benchplot::parser::table::{parse_benchmarks, BenchmarkTable};
use benchplot::utils::error::{ChartError, LookupError};
use pretty_assertions::assert_eq;

/// sh and csh at n = 10^3..10^7, runtime proportional to n
fn proportional_table() -> BenchmarkTable {
    let mut tsv = String::from("alg\tr\tn\te\ts\tnr\texit_status\n");
    for (alg, rank, factor) in [("sh", 1, 1e-6), ("csh", 1, 2e-7)] {
        for exp in 3..=7 {
            let n = 10f64.powi(exp);
            tsv.push_str(&format!(
                "{}\t{}\t{}\t0.05\t{}\t10\tok\n",
                alg,
                rank,
                n,
                factor * n * 10.0
            ));
        }
    }
    parse_benchmarks(tsv.as_bytes()).unwrap()
}

fn scaling_spec() -> ChartSpec {
    let mut spec = ChartSpec::new(
        Field::Raw(Column::SequenceLength),
        Field::Derived(Metric::TimePerUnit),
    )
    .with_filename("tools_e0.05");
    spec.xlog = true;
    spec.ylog = true;
    spec.trend_line = true;
    spec
}

#[test]
fn test_end_to_end_log_log_chart() {
    let table = proportional_table().successful();
    let report = render_chart(&table, &scaling_spec(), &StyleTable::default()).unwrap();

    assert_eq!(report.filename, "tools_e0.05");
    assert_eq!(report.series, vec!["SH", "CSH"]);
    assert_eq!(report.exponents.len(), 2);
    assert_eq!(report.exponents["SH"], "1.00");
    assert_eq!(report.exponents["CSH"], "1.00");
    assert!(report.skipped.is_empty());

    let svg = &report.svg;
    assert_eq!(svg.matches(r#"class="series-label""#).count(), 2);
    assert!(svg.contains(">SH ~n<tspan"));
    assert!(svg.contains(">CSH ~n<tspan"));
    // Trend lines, no connecting lines
    assert_eq!(svg.matches("<polyline").count(), 2);
    // Powers of ten on the x axis from 10^3 to 10^7
    assert!(svg.contains(r#"10<tspan baseline-shift="super" font-size="9">3</tspan>"#));
    assert!(svg.contains(r#"10<tspan baseline-shift="super" font-size="9">7</tspan>"#));
}

#[test]
fn test_legend_replaces_labels() {
    let table = proportional_table();
    let mut spec = scaling_spec();
    spec.legend = true;

    let report = render_chart(&table, &spec, &StyleTable::default()).unwrap();
    assert_eq!(report.svg.matches(r#"class="series-label""#).count(), 0);
    assert!(report.svg.contains("fill-opacity=\"0.8\""));
}

#[test]
fn test_chart_with_cone_and_threshold() {
    let table = proportional_table();
    let mut spec = scaling_spec();
    spec.group_by = Grouping::AlgorithmRank;
    spec.cone = Some(ConeSpec {
        reference: "csh".to_string(),
        rank: None,
        x: 10_000.0,
        x_max: None,
    });
    spec.threshold = Some(Threshold {
        value: 1.0,
        label: "1 s".to_string(),
    });

    let report = render_chart(&table, &spec, &StyleTable::default()).unwrap();
    assert_eq!(report.series, vec!["SH (exact)", "CSH (exact)"]);
    assert!(report.svg.contains(r#"fill="grey" fill-opacity="0.15""#));
    assert!(report.svg.contains(">1 s</text>"));
}

#[test]
fn test_cone_anchor_missing() {
    let table = proportional_table();
    let spec = ConeSpec {
        reference: "csh".to_string(),
        rank: None,
        x: 12_345.0,
        x_max: None,
    };

    let err = build_cone(
        &table,
        Field::Raw(Column::SequenceLength),
        Field::Raw(Column::ElapsedSeconds),
        Grouping::Algorithm,
        &spec,
    )
    .unwrap_err();
    assert!(matches!(err, LookupError::NoAnchorPoint { .. }));
}

#[test]
fn test_cone_unknown_group_fails_chart() {
    let table = proportional_table();
    let mut spec = scaling_spec();
    spec.cone = Some(ConeSpec {
        reference: "wfa".to_string(),
        rank: None,
        x: 1000.0,
        x_max: None,
    });

    let err = render_chart(&table, &spec, &StyleTable::default()).unwrap_err();
    assert!(matches!(
        err,
        ChartError::Lookup(LookupError::UnknownGroup(ref group)) if group == "wfa"
    ));
}

#[test]
fn test_cone_uses_max_on_ties_and_default_extent() {
    let table = parse_benchmarks(
        "alg\tn\ts\n\
         csh\t100\t5\n\
         csh\t100\t3\n\
         csh\t1000\t50\n"
            .as_bytes(),
    )
    .unwrap();
    let spec = ConeSpec {
        reference: "csh".to_string(),
        rank: None,
        x: 100.0,
        x_max: None,
    };

    let cone = build_cone(
        &table,
        Field::Raw(Column::SequenceLength),
        Field::Raw(Column::ElapsedSeconds),
        Grouping::Algorithm,
        &spec,
    )
    .unwrap();

    assert_eq!(cone.y0, 5.0);
    assert_eq!(cone.x_max, 3000.0);
}

#[test]
fn test_cone_region_values() {
    let cone = ConeRegion::new(100.0, 5.0, 300.0);
    assert!((cone.quadratic_at(300.0) - 45.0).abs() < 1e-9);
    assert!((cone.linear_at(300.0) - 15.0).abs() < 1e-9);
}

#[test]
fn test_fit_quadratic() {
    let points = vec![(10.0, 100.0), (100.0, 10_000.0), (1000.0, 1_000_000.0)];
    let trend = fit_power_law(&points, None).unwrap();
    assert!((trend.slope - 2.0).abs() < 0.01);
    assert_eq!(trend.exponent(), 2.0);
}

#[test]
fn test_error_rate_axis() {
    let table = parse_benchmarks(
        "alg\tr\tn\te\ts\tnr\n\
         csh\t1\t10000\t0.01\t1\t1\n\
         csh\t1\t10000\t0.05\t2\t1\n\
         csh\t1\t10000\t0.15\t4\t1\n"
            .as_bytes(),
    )
    .unwrap();
    let mut spec = ChartSpec::new(
        Field::Derived(Metric::ErrorRatePct),
        Field::Derived(Metric::TimePerUnit),
    )
    .with_filename("scaling_e");
    spec.group_by = Grouping::AlgorithmRank;
    spec.connect = true;

    let report = render_chart(&table, &spec, &StyleTable::default()).unwrap();
    assert!(report.svg.contains(">0%</text>"));
    assert!(report.svg.contains(">15%</text>"));
    assert_eq!(report.svg.matches("<polyline").count(), 1);
}
