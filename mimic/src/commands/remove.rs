use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use super::{UnwrapOrExit, load_config};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct RemoveCommand {
    /// Also remove list files in every subdirectory
    #[arg(short, long)]
    pub recursive: bool,

    /// Directories to clean up
    #[arg(value_name = "DIRS", default_value = ".")]
    pub dirs: Vec<PathBuf>,
}

impl RemoveCommand {
    pub fn run(&self) -> Result<()> {
        let (cwd, config) = load_config()?;
        let roots: Vec<PathBuf> = self.dirs.iter().map(|dir| cwd.join(dir)).collect();

        let report = ops::remove(
            &roots,
            ops::remove::RemoveOptions {
                recursive: self.recursive,
                list_file: &config.watch.list_file,
                base: &cwd,
            },
        )
        .unwrap_or_exit();

        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
