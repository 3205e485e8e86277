use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use eyre::{Result, bail};
use mimic_codegen::Pipeline;
use mimic_watch::WatchTarget;

use super::load_config;
use crate::ops;

#[derive(Args)]
pub struct WatchCommand {
    /// Also watch every subdirectory
    #[arg(short, long)]
    pub recursive: bool,

    /// Milliseconds between scans (defaults to watch.interval_ms, 2000)
    #[arg(long, value_name = "N")]
    pub interval_ms: Option<u64>,

    /// Directories to watch
    #[arg(value_name = "DIRS", default_value = ".")]
    pub dirs: Vec<PathBuf>,
}

impl WatchCommand {
    pub fn run(&self) -> Result<()> {
        let (cwd, config) = load_config()?;
        let interval_ms = self.interval_ms.unwrap_or(config.watch.interval_ms);
        if interval_ms == 0 {
            bail!("--interval-ms must be greater than zero");
        }

        let targets = self
            .dirs
            .iter()
            .map(|dir| {
                WatchTarget::new(cwd.join(dir))
                    .recursive(self.recursive)
                    .with_list_file(&config.watch.list_file)
            })
            .collect();

        ops::watch(
            Pipeline::new(&config),
            targets,
            Duration::from_millis(interval_ms),
        )
    }
}
