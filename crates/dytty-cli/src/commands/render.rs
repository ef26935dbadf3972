//! Render command - produce manifests for one application

use console::style;
use dytty_core::Kind;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use super::GlobalOptions;
use crate::error::Result;

pub fn run(
    global: &GlobalOptions,
    kind: Kind,
    name: &str,
    env: &str,
    output: Option<&Path>,
) -> Result<()> {
    let engine = global.engine()?;
    let mut app = engine.application(kind, name, env)?;

    tracing::info!("rendering {}/{} for {}", kind, name, app.env.name);
    let manifests = engine.render(&mut app)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &manifests)?;
            eprintln!("{} {}", style("wrote").green(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&manifests)?;
            stdout.flush()?;
        }
    }

    Ok(())
}
