//! Runs of the time-series generator, from the command line to the statistics of its output.

use antares_acceptance::checks::{
    OUTAGE_STATS_TOLERANCE, check_ts_outage_stats, check_ts_shape, expected_average_power,
};
use antares_acceptance::{Error, StudyInput, TsGeneratorTargets, generate_time_series};
use claims::{assert_matches, assert_ok};
use tempfile::TempDir;

use crate::fake_binaries::{
    FAILING_TS_GENERATOR, SILENT_TS_GENERATOR, TS_GENERATOR, exclusive, write_file, write_script,
};

const ALL_THERMAL: TsGeneratorTargets = TsGeneratorTargets {
    all_thermal: true,
    all_links: false,
};

fn study() -> TempDir {
    let dir = TempDir::new().expect("failed to create study dir");
    write_file(
        dir.path(),
        "thermal/clusters/fr/list.ini",
        "[base]\nname = base\nunitcount = 4\nnominalcapacity = 100.000000\n",
    );
    dir
}

#[test]
fn generated_series_match_outage_rates() {
    let _guard = exclusive();
    let bin = TempDir::new().unwrap();
    let generator = write_script(bin.path(), "ts-generator", TS_GENERATOR);
    let study = study();

    let (run, output) = assert_ok!(generate_time_series(&generator, study.path(), ALL_THERMAL));
    assert!(run.succeeded());
    let mut output = assert_ok!(output);
    assert_eq!(output.root(), study.path().join("output").join("ts-generator"));

    let mut input = StudyInput::new(study.path());
    let n_units = assert_ok!(input.cluster_unit_count("fr", "base"));
    let max_p = assert_ok!(input.cluster_nominal_capacity("fr", "base"));
    let expected = expected_average_power(n_units, max_p, 10.0, 0.0);

    let ts = assert_ok!(output.generated_ts("fr", "base"));
    assert_ok!(check_ts_shape(ts, 3));
    assert_ok!(check_ts_outage_stats(ts, expected, OUTAGE_STATS_TOLERANCE));
}

#[test]
fn study_path_comes_after_flags() {
    let _guard = exclusive();
    let bin = TempDir::new().unwrap();
    let generator = write_script(bin.path(), "ts-generator", TS_GENERATOR);
    let study = study();

    let targets = TsGeneratorTargets {
        all_thermal: true,
        all_links: true,
    };
    let (run, _) = assert_ok!(generate_time_series(&generator, study.path(), targets));
    assert!(run.succeeded());

    let args = std::fs::read_to_string(study.path().join("args.txt")).unwrap();
    assert_eq!(
        args.trim_end(),
        format!("--all-thermal --all-links {}", study.path().display())
    );
}

#[test]
fn failing_generator_reports_its_return_code() {
    let _guard = exclusive();
    let bin = TempDir::new().unwrap();
    let generator = write_script(bin.path(), "ts-generator", FAILING_TS_GENERATOR);
    let study = study();

    let (run, output) = assert_ok!(generate_time_series(&generator, study.path(), ALL_THERMAL));
    assert_eq!(run.return_code, 3);
    assert_matches!(output, Err(Error::OutputFolderNotFound { .. }));
}

#[test]
fn success_without_output_folder_is_a_lookup_error() {
    let _guard = exclusive();
    let bin = TempDir::new().unwrap();
    let generator = write_script(bin.path(), "ts-generator", SILENT_TS_GENERATOR);
    let study = study();

    let (run, output) = assert_ok!(generate_time_series(&generator, study.path(), ALL_THERMAL));
    assert!(run.succeeded());
    assert_matches!(output, Err(Error::OutputFolderNotFound { .. }));
}
