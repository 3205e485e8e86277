//! One list line's regeneration.

use std::io::{self, Write};

use mimic_codegen::Pipeline;
use mimic_core::Signature;
use mimic_model::GenerationRequest;
use mimic_source::Result;

/// What a regeneration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Files were written.
    Written(Signature),
    /// Output matched the previous signature and the mocks were still there.
    Unchanged(Signature),
}

impl Outcome {
    pub fn signature(&self) -> Signature {
        match self {
            Outcome::Written(s) | Outcome::Unchanged(s) => *s,
        }
    }
}

/// Runs one watch-mode request.
pub trait Regenerate {
    /// Regenerate, skipping the write when the output still has signature `last`.
    fn regenerate(&self, request: &GenerationRequest, last: Option<Signature>) -> Result<Outcome>;
}

impl Regenerate for Pipeline {
    fn regenerate(&self, request: &GenerationRequest, last: Option<Signature>) -> Result<Outcome> {
        let mut trace: Box<dyn Write> = if request.debug {
            Box::new(io::stderr())
        } else {
            Box::new(io::sink())
        };
        let generation = self.render(request, true, &mut *trace)?;
        let signature = generation.signature();

        let mocks_present = generation
            .plans
            .iter()
            .all(|plan| request.working_dir.join(&plan.mock_path).is_file());
        if last == Some(signature) && mocks_present {
            return Ok(Outcome::Unchanged(signature));
        }

        generation.write(request)?;
        Ok(Outcome::Written(signature))
    }
}
