//! Flags shared by `mimic generate` and watch list lines.

use std::path::{Path, PathBuf};

use clap::{Args, Parser};
use mimic_model::GenerationRequest;
use mimic_source::{Error, Result, resolve_args};

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateArgs {
    /// Output file for the mock (defaults to mock_<name>_test.go)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Package clause of the generated mock
    #[arg(long, value_name = "NAME")]
    pub package: Option<String>,

    /// Import path of the package the mock lives in
    #[arg(long, value_name = "PATH")]
    pub self_package: Option<String>,

    /// Print the extraction trace to stderr
    #[arg(short, long)]
    pub debug: bool,

    /// Also generate argument matchers
    #[arg(short = 'm', long)]
    pub generate_matchers: bool,

    /// Parse Go sources instead of running a reflection program
    #[arg(long, alias = "use-experimental-model-gen")]
    pub use_static_model_gen: bool,

    /// Name of the mock type (single interface only)
    #[arg(long, value_name = "NAME")]
    pub mock_name: Option<String>,

    /// Regenerate matcher files that already exist
    #[arg(long)]
    pub overwrite_matchers: bool,

    /// A Go file, interface names, or a package path followed by interface names
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,
}

impl GenerateArgs {
    /// Resolve the positionals and build a request rooted at `working_dir`.
    pub fn to_request(&self, working_dir: &Path) -> Result<GenerationRequest> {
        let spec = resolve_args(&self.args)?;
        let mut request = GenerationRequest::new(spec, working_dir);
        request.output_path = self.output.clone();
        request.output_package_name = self.package.clone();
        request.self_package_path = self.self_package.clone();
        request.mock_name = self.mock_name.clone();
        request.debug = self.debug;
        request.generate_matchers = self.generate_matchers;
        request.overwrite_matchers = self.overwrite_matchers;
        request.use_static_analysis_model_gen = self.use_static_model_gen;
        Ok(request)
    }
}

#[derive(Parser)]
#[command(name = "interfaces_to_mock", no_binary_name = true)]
struct ListLine {
    #[command(flatten)]
    args: GenerateArgs,
}

/// Parse one list-file line as `generate` arguments.
///
/// A line is split on whitespace; quoting is not supported.
pub fn parse_list_line(line: &str) -> Result<GenerateArgs> {
    ListLine::try_parse_from(line.split_whitespace())
        .map(|l| l.args)
        .map_err(|e| {
            let rendered = e.to_string();
            let message = rendered.lines().next().unwrap_or_default().trim();
            Error::invalid_arguments(format!(
                "'{}': {}",
                line.trim(),
                message.trim_start_matches("error: ")
            ))
        })
}
