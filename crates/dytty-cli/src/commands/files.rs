//! Files command - list every file ytt reads for a render

use dytty_core::Kind;

use super::GlobalOptions;
use crate::error::Result;

pub fn run(global: &GlobalOptions, kind: Kind, name: &str, env: &str) -> Result<()> {
    let engine = global.engine()?;
    let mut app = engine.application(kind, name, env)?;

    tracing::info!("inspecting files of {}/{} for {}", kind, name, app.env.name);
    let files = engine.inspect_files(&mut app)?;

    if !files.is_empty() {
        println!("{}", files.join("\n"));
    }
    Ok(())
}
