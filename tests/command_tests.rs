use benchplot::aggregator::summary::SummaryConfig;
use benchplot::chart::layout::ChartSpec;
use benchplot::commands::{execute_figures, execute_plot, execute_table, PlotArgs, TableArgs};
use benchplot::output::read_summary;
use benchplot::parser::schema::{Column, Field, Metric};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

const TOOLS: &str = "alg\tn\te\ts\tnr\tmax_uss\texit_status\n\
                     edlib\t1000\t0.01\t2\t10\t10240\tok\n\
                     edlib\t1000\t0.05\t8\t10\t10240\tok\n\
                     biwfa\t1000\t0.05\t4\t10\t2048\tok\n\
                     sh\t1000\t0.01\t1\t10\t20480\tok\n\
                     sh\t1000\t0.05\t1\t10\t20480\tok\n\
                     csh\t1000\t0.05\t0.5\t10\t20480\tok\n\
                     csh\t1000\t0.05\t100\t10\t20480\ttimeout\n\
                     sh\t10000\t0.05\t10\t10\t20480\tok\n";

fn write_table(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("tools.tsv");
    fs::write(&path, TOOLS).unwrap();
    path
}

#[test]
fn test_plot_writes_one_chart_per_error_rate() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_table(temp_dir.path());
    let out_dir = temp_dir.path().join("imgs");

    let mut chart = ChartSpec::new(
        Field::Raw(Column::SequenceLength),
        Field::Derived(Metric::TimePerUnit),
    )
    .with_filename("tools");
    chart.xlog = true;
    chart.ylog = true;

    let args = PlotArgs {
        input,
        chart,
        out_dir: out_dir.clone(),
        split_by_error_rate: true,
        ..Default::default()
    };

    let written = execute_plot(args).unwrap();
    assert_eq!(
        written,
        vec![out_dir.join("tools_e0.01.svg"), out_dir.join("tools_e0.05.svg")]
    );
    for path in &written {
        let svg = fs::read_to_string(path).unwrap();
        assert!(svg.starts_with("<svg"));
    }
}

#[test]
fn test_plot_missing_input() {
    let temp_dir = tempfile::tempdir().unwrap();
    let args = PlotArgs {
        input: temp_dir.path().join("missing.tsv"),
        out_dir: temp_dir.path().to_path_buf(),
        ..Default::default()
    };
    assert!(execute_plot(args).is_err());
}

#[test]
fn test_plot_unknown_cone_reference_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_table(temp_dir.path());

    let mut chart = ChartSpec::default();
    chart.cone = Some(benchplot::chart::cone::ConeSpec {
        reference: "astarpa".to_string(),
        rank: None,
        x: 1000.0,
        x_max: None,
    });
    let args = PlotArgs {
        input,
        chart,
        out_dir: temp_dir.path().join("imgs"),
        ..Default::default()
    };

    let err = execute_plot(args).unwrap_err();
    assert!(format!("{:#}", err).contains("astarpa"));
    assert!(!temp_dir.path().join("imgs").join("scaling.svg").exists());
}

#[test]
fn test_table_outputs() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_table(temp_dir.path());
    let out_dir = temp_dir.path().join("results");

    let args = TableArgs {
        input,
        summary: SummaryConfig {
            sequence_length: 1000,
            ..Default::default()
        },
        out_dir: out_dir.clone(),
        print_summary: false,
    };

    let summary = execute_table(args).unwrap();
    assert_eq!(summary.error_rates, vec![0.01, 0.05]);

    let algorithms: Vec<&str> = summary.rows.iter().map(|r| r.algorithm.as_str()).collect();
    assert_eq!(algorithms, vec!["edlib", "biwfa", "sh", "csh"]);

    // The failed csh run is ignored
    let csh = &summary.rows[3];
    assert_eq!(csh.time_per_unit, vec![None, Some(0.05)]);

    // Best competitor 0.4 over best of ours 0.05
    let speedups: Vec<f64> = summary.speedups.iter().filter_map(|s| s.speedup).collect();
    assert_eq!(speedups.len(), 2);
    assert!((speedups[0] - 2.0).abs() < 1e-9);
    assert!((speedups[1] - 8.0).abs() < 1e-9);

    let speedup = fs::read_to_string(out_dir.join("speedup")).unwrap();
    assert_eq!(
        speedup,
        "Speedup at n = 10^3:\nSpeedup at 0.01: 2.0\nSpeedup at 0.05: 8.0\n"
    );

    let csv = fs::read_to_string(out_dir.join("table.csv")).unwrap();
    assert!(csv.starts_with("algorithm,"));
    assert_eq!(csv.lines().count(), 5);

    let report = read_summary(out_dir.join("summary.json")).unwrap();
    assert_eq!(report.summary["sequence_length"], 1000);
}

#[test]
fn test_table_wrong_length() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_table(temp_dir.path());

    let args = TableArgs {
        input,
        summary: SummaryConfig {
            sequence_length: 123,
            ..Default::default()
        },
        out_dir: temp_dir.path().join("results"),
        print_summary: false,
    };
    assert!(execute_table(args).is_err());
}

#[test]
fn test_figures_manifest_resolves_relative_paths() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_table(temp_dir.path());
    let manifest = temp_dir.path().join("figures.toml");
    fs::write(
        &manifest,
        r#"
out_dir = "out"

[[figure]]
input = "tools.tsv"
filename = "tools_n"
x = "n"
y = "s"
xlog = true
ylog = true
"#,
    )
    .unwrap();

    let written = execute_figures(&manifest, None).unwrap();
    assert_eq!(written, vec![temp_dir.path().join("out").join("tools_n.svg")]);
    assert!(written[0].exists());
}
