use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for mimic operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Holds the text and file name of a Go file or config file so that parse
/// errors can point into it.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    /// Create a new source context.
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    /// Get the source content.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Get the filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// A Go syntax error at the given byte range.
    pub fn syntax_error(&self, span: impl Into<SourceSpan>) -> Box<Error> {
        Box::new(Error::Parse {
            src: self.named_source(),
            span: Some(span.into()),
            path: PathBuf::from(&self.filename),
        })
    }

    /// A `mimic.toml` error.
    pub fn config_error(&self, source: toml::de::Error) -> Box<Error> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Config {
            src: self.named_source(),
            span,
            source,
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("{message}")]
    #[diagnostic(
        code(mimic::invalid_arguments),
        help(
            "pass a Go file, `<package path> <Interface[,Interface...]>`, or `<Interface[,Interface...]>`"
        )
    )]
    InvalidArguments { message: String },

    #[error("package '{package}' not found")]
    #[diagnostic(code(mimic::package_not_found))]
    PackageNotFound {
        package: String,
        #[help]
        detail: Option<String>,
    },

    #[error("interface '{name}' not found in package '{package}'")]
    #[diagnostic(code(mimic::interface_not_found))]
    InterfaceNotFound {
        name: String,
        package: String,
        #[help]
        detail: Option<String>,
    },

    #[error("'{name}' in package '{package}' is not an interface type")]
    #[diagnostic(code(mimic::not_an_interface))]
    NotAnInterfaceType { name: String, package: String },

    #[error("static model generation {reason}")]
    #[diagnostic(
        code(mimic::unsupported_model_gen_mode),
        help(
            "static model generation supports exactly one interface given by package path or bare name, outside watch mode; drop --use-static-model-gen otherwise"
        )
    )]
    UnsupportedModelGenMode { reason: String },

    #[error("type {ty} cannot be referenced from package '{package}'")]
    #[diagnostic(code(mimic::unresolvable_type), help("{reason}"))]
    UnresolvableType {
        ty: String,
        package: String,
        reason: String,
    },

    #[error("failed to access '{path}'")]
    #[diagnostic(code(mimic::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", .path.display())]
    #[diagnostic(code(mimic::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("syntax error here")]
        span: Option<SourceSpan>,
        path: PathBuf,
    },

    #[error("failed to parse mimic.toml")]
    #[diagnostic(code(mimic::config_error))]
    Config {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("go toolchain failed: {message}")]
    #[diagnostic(
        code(mimic::toolchain),
        help("reflection-based model generation needs a working `go` command; try --use-static-model-gen")
    )]
    Toolchain { message: String },
}

impl Error {
    /// Create an invalid-arguments error
    pub fn invalid_arguments(message: impl Into<String>) -> Box<Self> {
        Box::new(Error::InvalidArguments {
            message: message.into(),
        })
    }

    /// Create an unsupported-mode error
    pub fn unsupported_mode(reason: impl Into<String>) -> Box<Self> {
        Box::new(Error::UnsupportedModelGenMode {
            reason: reason.into(),
        })
    }

    /// Create an unresolvable-type error
    pub fn unresolvable(
        ty: impl Into<String>,
        package: impl Into<String>,
        reason: impl Into<String>,
    ) -> Box<Self> {
        Box::new(Error::UnresolvableType {
            ty: ty.into(),
            package: package.into(),
            reason: reason.into(),
        })
    }

    /// Wrap an I/O error with the path it concerns
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Box<Self> {
        Box::new(Error::Io {
            path: path.into(),
            source,
        })
    }

    pub fn package_not_found(package: impl Into<String>, detail: Option<String>) -> Box<Self> {
        Box::new(Error::PackageNotFound {
            package: package.into(),
            detail,
        })
    }

    pub fn interface_not_found(
        name: impl Into<String>,
        package: impl Into<String>,
        detail: Option<String>,
    ) -> Box<Self> {
        Box::new(Error::InterfaceNotFound {
            name: name.into(),
            package: package.into(),
            detail,
        })
    }

    pub fn not_an_interface(name: impl Into<String>, package: impl Into<String>) -> Box<Self> {
        Box::new(Error::NotAnInterfaceType {
            name: name.into(),
            package: package.into(),
        })
    }

    pub fn toolchain(message: impl Into<String>) -> Box<Self> {
        Box::new(Error::Toolchain {
            message: message.into(),
        })
    }

    /// Whether the user can fix this by changing the command line.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Error::InvalidArguments { .. })
    }
}
