//! Values command - show the effective data values

use dytty_core::Kind;

use super::GlobalOptions;
use crate::error::Result;

pub fn run(global: &GlobalOptions, kind: Kind, name: &str, env: &str) -> Result<()> {
    let engine = global.engine()?;
    let app = engine.application(kind, name, env)?;

    tracing::info!("inspecting data values of {}/{} for {}", kind, name, app.env.name);
    let values = engine.inspect_values(&app)?;

    print!("{}", values.to_yaml()?);
    Ok(())
}
