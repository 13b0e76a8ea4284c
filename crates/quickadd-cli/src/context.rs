use quickadd_core::{Clock, FixedClock, QuickAddConfig, QuickAddResult, SystemClock};
use quickadd_domain::Directory;
use std::path::Path;
use std::sync::Arc;

use crate::cli::ContextArgs;

/// Everything a command needs besides its own arguments.
pub struct CliContext {
    pub config: QuickAddConfig,
    pub clock: Arc<dyn Clock>,
    pub directory: Arc<Directory>,
}

impl CliContext {
    pub fn load(
        config_path: Option<&Path>,
        debounce_ms: Option<u64>,
        args: &ContextArgs,
    ) -> QuickAddResult<Self> {
        let mut config = match config_path {
            Some(path) => QuickAddConfig::load_from(path)?,
            None => QuickAddConfig::load(),
        };
        if let Some(debounce_ms) = debounce_ms {
            config.debounce_ms = debounce_ms;
        }

        let clock: Arc<dyn Clock> = match args.now {
            Some(now) => Arc::new(FixedClock(now)),
            None => Arc::new(SystemClock),
        };

        let directory = match &args.directory {
            Some(path) => load_directory(path)?,
            None => Directory::default(),
        };

        Ok(Self {
            config,
            clock,
            directory: Arc::new(directory),
        })
    }
}

fn load_directory(path: &Path) -> QuickAddResult<Directory> {
    let directory = Directory::load(path)?;
    tracing::debug!(
        path = %path.display(),
        projects = directory.projects.len(),
        labels = directory.labels.len(),
        "loaded directory snapshot"
    );
    Ok(directory)
}
