//! Precedence ordering of resolved files
//!
//! Files are handed to ytt lowest precedence first; later files override
//! earlier ones:
//!
//! 1. global directory
//! 2. environment `requiredValues`
//! 3. application `requiredValues`
//! 4. environment `required`
//! 5. application `required`
//! 6. application `optional` (render only)
//! 7. application templates (render only)

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::application::Application;

/// Ordered list of files for one ytt invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedFileOrdering(Vec<PathBuf>);

impl ResolvedFileOrdering {
    /// Files for the data-values pass: optional files and templates excluded
    pub fn for_values(global_dir: &Path, app: &Application) -> Self {
        let mut files = vec![global_dir.to_path_buf()];
        files.extend(app.env.paths.required_values.iter().cloned());
        files.extend(app.paths.required_values.iter().cloned());
        files.extend(app.env.paths.required.iter().cloned());
        files.extend(app.paths.required.iter().cloned());
        Self(files)
    }

    /// Every layer, including optional files and resolved templates
    pub fn for_render(global_dir: &Path, app: &Application) -> Self {
        let mut ordering = Self::for_values(global_dir, app);
        ordering.0.extend(app.paths.optional.iter().cloned());
        ordering.0.extend(app.templates().iter().cloned());
        ordering
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ResolvedFileOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, file) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", file.display())?;
        }
        Ok(())
    }
}
