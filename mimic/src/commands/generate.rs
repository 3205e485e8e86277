use clap::Args;
use eyre::Result;
use mimic_codegen::Pipeline;
use mimic_watch::GenerateArgs;

use super::{UnwrapOrExit, load_config};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub args: GenerateArgs,

    /// Print the generated files instead of writing them
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    pub fn run(&self) -> Result<()> {
        let (cwd, config) = load_config()?;
        let request = self.args.to_request(&cwd).unwrap_or_exit();
        let pipeline = Pipeline::new(&config);

        let report = ops::generate(
            &pipeline,
            ops::generate::GenerateOptions {
                request: &request,
                dry_run: self.dry_run,
            },
        )
        .unwrap_or_exit();

        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
