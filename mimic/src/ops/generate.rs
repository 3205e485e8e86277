//! Generate operation - extract interfaces and write their mocks.

use std::io::{self, Write};

use mimic_codegen::Pipeline;
use mimic_model::GenerationRequest;
use mimic_source::Result;

use crate::reports::{GenerateReport, GenerationResult, MockSummary, PreviewFile};

/// Options for the generate operation.
pub struct GenerateOptions<'a> {
    pub request: &'a GenerationRequest,
    /// Whether to preview without writing.
    pub dry_run: bool,
}

/// Execute the generate operation.
pub fn generate(pipeline: &Pipeline, opts: GenerateOptions) -> Result<GenerateReport> {
    let request = opts.request;
    let mut trace: Box<dyn Write> = if request.debug {
        Box::new(io::stderr())
    } else {
        Box::new(io::sink())
    };

    let generation = pipeline.render(request, false, &mut *trace)?;

    let mocks = generation
        .plans
        .iter()
        .map(|plan| MockSummary {
            path: plan.mock_path.clone(),
            package: plan.package_name.clone(),
        })
        .collect();
    let interfaces = generation.models.iter().map(|m| m.name.clone()).collect();

    let result = if opts.dry_run {
        GenerationResult::Preview(
            generation
                .registry
                .preview()
                .into_iter()
                .map(|entry| PreviewFile {
                    path: entry.path,
                    content: entry.content,
                })
                .collect(),
        )
    } else {
        GenerationResult::Written(generation.write(request)?)
    };

    Ok(GenerateReport {
        interfaces,
        mocks,
        result,
    })
}
