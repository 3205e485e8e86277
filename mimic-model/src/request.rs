//! Generation requests.

use std::path::PathBuf;

/// The resolved meaning of the positional `generate` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// A single Go source file; every interface it declares is mocked.
    GoFile { path: PathBuf },
    /// An importable package path plus interfaces declared there.
    PackageAndInterfaces {
        package_path: String,
        interface_names: Vec<String>,
    },
    /// Interfaces declared in the package of the working directory.
    BareInterfaceNames { names: Vec<String> },
}

impl SourceSpec {
    /// Interface names named by the spec. Empty for [`SourceSpec::GoFile`],
    /// whose interfaces are only known after parsing.
    pub fn interface_names(&self) -> &[String] {
        match self {
            Self::GoFile { .. } => &[],
            Self::PackageAndInterfaces {
                interface_names, ..
            } => interface_names,
            Self::BareInterfaceNames { names } => names,
        }
    }

    pub fn is_go_file(&self) -> bool {
        matches!(self, Self::GoFile { .. })
    }
}

/// Everything needed to run one extraction + generation + write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub source_spec: SourceSpec,
    /// Directory the request is rooted at (the current directory for a
    /// one-shot run, the watched directory in watch mode).
    pub working_dir: PathBuf,
    /// Explicit mock file; relative paths are resolved against `working_dir`.
    pub output_path: Option<PathBuf>,
    /// Package clause of the mock file.
    pub output_package_name: Option<String>,
    /// Import path of the package the mock lives in; its types are not qualified.
    pub self_package_path: Option<String>,
    /// Mock type name override (single interface only).
    pub mock_name: Option<String>,
    pub debug: bool,
    pub generate_matchers: bool,
    /// Rewrite matcher files even if they already exist.
    pub overwrite_matchers: bool,
    pub use_static_analysis_model_gen: bool,
}

impl GenerationRequest {
    /// A request with default flags.
    pub fn new(source_spec: SourceSpec, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_spec,
            working_dir: working_dir.into(),
            output_path: None,
            output_package_name: None,
            self_package_path: None,
            mock_name: None,
            debug: false,
            generate_matchers: false,
            overwrite_matchers: false,
            use_static_analysis_model_gen: false,
        }
    }

    pub fn with_matchers(mut self, generate: bool) -> Self {
        self.generate_matchers = generate;
        self
    }

    pub fn with_static_analysis(mut self, enabled: bool) -> Self {
        self.use_static_analysis_model_gen = enabled;
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn with_package(mut self, name: impl Into<String>) -> Self {
        self.output_package_name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interface_names() {
        let bare = SourceSpec::BareInterfaceNames {
            names: vec!["Display".into()],
        };
        assert_eq!(bare.interface_names(), ["Display".to_string()]);

        let file = SourceSpec::GoFile {
            path: "display.go".into(),
        };
        assert!(file.interface_names().is_empty());
        assert!(file.is_go_file());
    }

    #[test]
    fn test_request_defaults() {
        let request = GenerationRequest::new(
            SourceSpec::BareInterfaceNames {
                names: vec!["Display".into()],
            },
            "/tmp/pkg",
        );

        assert!(!request.debug);
        assert!(!request.generate_matchers);
        assert!(!request.use_static_analysis_model_gen);
        assert!(request.output_path.is_none());
    }
}
