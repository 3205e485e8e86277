//! One generation: extract, render, write.

use std::io::Write;

use mimic_core::{Overwrite, Signature};
use mimic_model::{GenerationRequest, InterfaceModel};
use mimic_source::{Config, Error, ExtractOptions, GoTool, Result, extract};

use crate::generator::{Destination, generate_mock_file};
use crate::matcher::generate_matchers;
use crate::output::OutputPlan;
use crate::registry::{FileEntry, FileRegistry, WriteStats};

/// Runs generation requests with one configuration.
#[derive(Debug, Clone)]
pub struct Pipeline {
    runtime: String,
    go: GoTool,
}

impl Pipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            runtime: config.generate.runtime.clone(),
            go: GoTool::new(config.go.command.clone()),
        }
    }

    pub fn runtime(&self) -> &str {
        &self.runtime
    }

    pub fn go(&self) -> &GoTool {
        &self.go
    }

    /// Extract and render, without touching the destination.
    ///
    /// With `request.debug` set, the extraction trace goes to `trace`.
    pub fn render(
        &self,
        request: &GenerationRequest,
        watch_mode: bool,
        trace: &mut dyn Write,
    ) -> Result<Generation> {
        let options = ExtractOptions::new(&request.working_dir)
            .with_static_analysis(request.use_static_analysis_model_gen)
            .with_debug(request.debug)
            .with_watch_mode(watch_mode)
            .with_go(self.go.clone());
        let models = extract(&request.source_spec, &options, trace)?;
        tracing::debug!(interfaces = models.len(), "extracted interface models");

        if request.mock_name.is_some() && models.len() > 1 {
            return Err(Error::invalid_arguments(format!(
                "--mock-name can only be used with a single interface, got {}",
                models.len()
            )));
        }

        let mut registry = FileRegistry::new();
        let mut plans = Vec::new();
        for group in mock_file_groups(request, &models) {
            let plan = OutputPlan::for_request(request, group)?;
            let destination = Destination::new(&plan.package_name, &self.runtime)
                .with_self_package(plan.self_package.clone())
                .with_mock_name(request.mock_name.clone());
            registry.register(FileEntry::mock(
                &plan.mock_path,
                generate_mock_file(group, &destination)?,
            ));

            if request.generate_matchers {
                for (file, content) in generate_matchers(group, &self.runtime) {
                    let path = plan.matchers_dir.join(file);
                    if registry.contains(&path) {
                        continue;
                    }
                    let entry = FileEntry::matcher(path, content);
                    registry.register(if request.overwrite_matchers {
                        entry.with_overwrite(Overwrite::Always)
                    } else {
                        entry
                    });
                }
            }
            plans.push(plan);
        }

        Ok(Generation {
            models,
            plans,
            registry,
        })
    }

    /// Render and write.
    pub fn run(
        &self,
        request: &GenerationRequest,
        watch_mode: bool,
        trace: &mut dyn Write,
    ) -> Result<(Generation, WriteStats)> {
        let generation = self.render(request, watch_mode, trace)?;
        let stats = generation.write(request)?;
        Ok((generation, stats))
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

/// Models grouped by the mock file they are written to.
///
/// An explicit output path or a Go file argument puts every mock in one file;
/// otherwise each interface gets its own.
fn mock_file_groups<'m>(
    request: &GenerationRequest,
    models: &'m [InterfaceModel],
) -> Vec<&'m [InterfaceModel]> {
    if request.output_path.is_some() || request.source_spec.is_go_file() {
        vec![models]
    } else {
        models.chunks(1).collect()
    }
}

/// The rendered output of one request.
#[derive(Debug, Clone)]
pub struct Generation {
    pub models: Vec<InterfaceModel>,
    /// One plan per mock file.
    pub plans: Vec<OutputPlan>,
    pub registry: FileRegistry,
}

impl Generation {
    pub fn signature(&self) -> Signature {
        self.registry.signature()
    }

    pub fn write(&self, request: &GenerationRequest) -> Result<WriteStats> {
        let stats = self.registry.write_all(&request.working_dir)?;
        for plan in &self.plans {
            tracing::info!(mock = %plan.mock_path.display(), package = %plan.package_name, "generated mock");
        }
        tracing::debug!(written = stats.written, skipped = stats.skipped, "write finished");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use mimic_model::SourceSpec;

    use super::*;

    fn fixture() -> tempfile::TempDir {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("go.mod"), "module example.com/pegomocktest\n").unwrap();
        fs::write(
            temp.path().join("display.go"),
            "package pegomocktest\n\nimport \"net/http\"\n\ntype MyDisplay interface {\n\tShow(something string)\n\tServe(r *http.Request) error\n}\n",
        )
        .unwrap();
        temp
    }

    fn request(dir: &Path) -> GenerationRequest {
        GenerationRequest::new(
            SourceSpec::BareInterfaceNames {
                names: vec!["MyDisplay".into()],
            },
            dir,
        )
        .with_static_analysis(true)
    }

    #[test]
    fn test_run_writes_mock_into_test_package() {
        let temp = fixture();
        let (generation, stats) = Pipeline::default()
            .run(&request(temp.path()), false, &mut std::io::sink())
            .unwrap();

        assert_eq!(stats.written, 1);
        assert_eq!(generation.plans[0].mock_path, PathBuf::from("mock_mydisplay_test.go"));
        let mock = fs::read_to_string(temp.path().join("mock_mydisplay_test.go")).unwrap();
        assert!(mock.contains("\npackage pegomocktest_test\n"));
        assert!(mock.contains("func (mock *MockMyDisplay) Show(something string) {"));
        assert!(mock.contains("func (mock *MockMyDisplay) Serve(r *http.Request) error {"));
    }

    #[test]
    fn test_render_does_not_write() {
        let temp = fixture();
        let generation = Pipeline::default()
            .render(&request(temp.path()), false, &mut std::io::sink())
            .unwrap();
        assert_eq!(generation.registry.len(), 1);
        assert!(!temp.path().join("mock_mydisplay_test.go").exists());
    }

    #[test]
    fn test_matchers_are_written_once() {
        let temp = fixture();
        let pipeline = Pipeline::default();
        let request = request(temp.path()).with_matchers(true);

        let (_, first) = pipeline.run(&request, false, &mut std::io::sink()).unwrap();
        assert_eq!(first.written, 3);
        let matcher = temp.path().join("matchers/ptr_to_http_request.go");
        fs::write(&matcher, "// customised\n").unwrap();

        let (_, second) = pipeline.run(&request, false, &mut std::io::sink()).unwrap();
        assert_eq!(second.written, 1);
        assert_eq!(second.skipped, 2);
        assert_eq!(fs::read_to_string(&matcher).unwrap(), "// customised\n");
        assert!(!temp.path().join("matchers/string.go").exists());
    }

    #[test]
    fn test_overwrite_matchers() {
        let temp = fixture();
        let pipeline = Pipeline::default();
        let mut request = request(temp.path()).with_matchers(true);
        request.overwrite_matchers = true;

        pipeline.run(&request, false, &mut std::io::sink()).unwrap();
        let matcher = temp.path().join("matchers/error.go");
        fs::write(&matcher, "// customised\n").unwrap();
        pipeline.run(&request, false, &mut std::io::sink()).unwrap();
        assert!(fs::read_to_string(&matcher).unwrap().starts_with("// Code generated by mimic."));
    }

    #[test]
    fn test_signature_is_stable_across_runs() {
        let temp = fixture();
        let pipeline = Pipeline::default();
        let a = pipeline.render(&request(temp.path()), false, &mut std::io::sink()).unwrap();
        let b = pipeline.render(&request(temp.path()), false, &mut std::io::sink()).unwrap();
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn test_one_mock_file_per_interface_without_output() {
        let models = vec![
            InterfaceModel::new("Reader", "io", "io"),
            InterfaceModel::new("Writer", "io", "io"),
        ];
        let spec = SourceSpec::PackageAndInterfaces {
            package_path: "io".into(),
            interface_names: vec!["Reader".into(), "Writer".into()],
        };
        let request = GenerationRequest::new(spec, "/tmp");
        assert_eq!(mock_file_groups(&request, &models).len(), 2);

        let request = request.with_output_path("mocks/io.go");
        assert_eq!(mock_file_groups(&request, &models).len(), 1);
    }

    #[test]
    fn test_static_analysis_rejected_in_watch_mode() {
        let temp = fixture();
        let err = Pipeline::default()
            .render(&request(temp.path()), true, &mut std::io::sink())
            .unwrap_err();
        assert!(matches!(*err, mimic_source::Error::UnsupportedModelGenMode { .. }));
    }
}
