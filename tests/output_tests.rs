use benchplot::aggregator::summary::{Speedup, Summary, SummaryRow};
use benchplot::output::{
    chart_path, read_summary, write_speedup, write_summary, write_summary_csv, write_svg,
    SummaryReport,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::NamedTempFile;

fn create_test_summary() -> Summary {
    Summary {
        sequence_length: 10_000_000,
        error_rates: vec![0.05, 0.15],
        rows: vec![
            SummaryRow {
                algorithm: "biwfa".to_string(),
                time_per_unit: vec![Some(20.0), None],
                memory_mb: vec![Some(100.0), None],
            },
            SummaryRow {
                algorithm: "csh".to_string(),
                time_per_unit: vec![Some(2.0), Some(4.0)],
                memory_mb: vec![None, None],
            },
        ],
        speedups: vec![
            Speedup {
                error_rate: 0.05,
                ours: Some(2.0),
                theirs: Some(20.0),
                speedup: Some(10.0),
            },
            Speedup {
                error_rate: 0.15,
                ours: Some(4.0),
                theirs: None,
                speedup: None,
            },
        ],
    }
}

#[test]
fn test_write_and_read_summary() {
    let summary = create_test_summary();
    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    // Write
    let report = SummaryReport::new(&summary, "table/tools_N1e7.tsv").unwrap();
    write_summary(&report, path).unwrap();

    // Read back
    let loaded = read_summary(path).unwrap();

    assert_eq!(loaded.version, report.version);
    assert_eq!(loaded.input, "table/tools_N1e7.tsv");
    assert_eq!(loaded.summary["rows"][1]["algorithm"], "csh");
}

#[test]
fn test_write_summary_to_directory_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let report = SummaryReport::new(&create_test_summary(), "x.tsv").unwrap();
    assert!(write_summary(&report, temp_dir.path()).is_err());
}

#[test]
fn test_write_svg_empty_path() {
    assert!(write_svg("<svg></svg>", Path::new("")).is_err());
}

#[test]
fn test_chart_path_and_nested_dirs() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = chart_path(temp_dir.path().join("imgs").join("scaling"), "tools_e0.05");
    assert!(path.ends_with("imgs/scaling/tools_e0.05.svg"));

    write_svg("<svg></svg>", &path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "<svg></svg>");
}

#[test]
fn test_csv_and_speedup_files() {
    let temp_dir = tempfile::tempdir().unwrap();
    let summary = create_test_summary();

    let csv_path = temp_dir.path().join("table.csv");
    write_summary_csv(&summary, &csv_path).unwrap();
    let csv = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "algorithm,time_per_unit_e0.05,time_per_unit_e0.15,memory_mb_e0.05,memory_mb_e0.15",
            "biwfa,20,,100,",
            "csh,2,4,,",
        ]
    );

    let speedup_path = temp_dir.path().join("speedup");
    write_speedup(&summary, &speedup_path).unwrap();
    assert_eq!(
        fs::read_to_string(&speedup_path).unwrap(),
        "Speedup at n = 10^7:\nSpeedup at 0.05: 10.0\nSpeedup at 0.15: n/a\n"
    );
}
