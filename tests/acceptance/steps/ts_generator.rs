use antares_acceptance::checks::{
    OUTAGE_STATS_TOLERANCE, check_ts_outage_stats, check_ts_shape, expected_average_power,
};
use antares_acceptance::{TsGeneratorTargets, generate_time_series};
use cucumber::{then, when};
use tracing::info;

use crate::world::AntaresWorld;

#[when("I run timeseries generation on all thermal clusters")]
async fn run_on_all_thermal_clusters(world: &mut AntaresWorld) -> anyhow::Result<()> {
    let generator = world.config.ts_generator()?.to_path_buf();
    let study = world.study_path()?;
    let targets = TsGeneratorTargets {
        all_thermal: true,
        all_links: false,
    };

    let (run, output) = generate_time_series(&generator, &study, targets)?;
    world.record_ts_generation(&run, output)
}

#[then(regex = r#"^in area "([^"]*)", (\d+) TS are generated for thermal cluster "([^"]*)"$"#)]
async fn ts_are_generated(
    world: &mut AntaresWorld,
    area: String,
    n_ts: usize,
    cluster: String,
) -> anyhow::Result<()> {
    let ts = world.ts_generator_output()?.generated_ts(&area, &cluster)?;
    check_ts_shape(ts, n_ts)?;
    Ok(())
}

#[then(
    regex = r#"^in area "([^"]*)", the generated TS for thermal cluster "([^"]*)" respects a forced outage of ([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)% and a planned outage of ([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)%$"#
)]
async fn ts_respect_outage_rates(
    world: &mut AntaresWorld,
    area: String,
    cluster: String,
    fo: f64,
    po: f64,
) -> anyhow::Result<()> {
    let study = world.study()?;
    let n_units = study.cluster_unit_count(&area, &cluster)?;
    let max_p_per_unit = study.cluster_nominal_capacity(&area, &cluster)?;
    let expected = expected_average_power(n_units, max_p_per_unit, fo, po);
    info!(area = %area, cluster = %cluster, n_units, max_p_per_unit, expected, "expected average available power");

    let ts = world.ts_generator_output()?.generated_ts(&area, &cluster)?;
    // TODO: narrow the tolerance once the generator's variance per cluster size is characterised
    check_ts_outage_stats(ts, expected, OUTAGE_STATS_TOLERANCE)?;
    Ok(())
}
