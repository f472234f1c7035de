use anyhow::ensure;
use cucumber::{given, then};

use crate::world::AntaresWorld;

#[given(expr = "the study path is {string}")]
async fn study_path_is(world: &mut AntaresWorld, path: String) {
    world.set_study(&path);
}

#[then("the execution succeeds")]
async fn execution_succeeds(world: &mut AntaresWorld) -> anyhow::Result<()> {
    let return_code = world.return_code()?;
    ensure!(return_code == 0, "return code is {return_code} (expected 0)");
    Ok(())
}

#[then("the execution fails")]
async fn execution_fails(world: &mut AntaresWorld) -> anyhow::Result<()> {
    let return_code = world.return_code()?;
    ensure!(return_code != 0, "return code is 0 (expected a failure)");
    Ok(())
}
