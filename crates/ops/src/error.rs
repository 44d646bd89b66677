//! Operation failures.

use stencil_platform::PlatformError;

use crate::options::Stage;

/// A convenient type alias for `Result` with `E` = [`OperationError`].
pub type Result<T, E = OperationError> = std::result::Result<T, E>;

/// Why a copy/insert operation did not complete.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum OperationError {
	/// The address names no template in the current hierarchy.
	#[error("template not found: {0}")]
	TemplateNotFound(String),
	/// A host capability failed at `stage`.
	#[error("{source}")]
	Platform {
		stage: Stage,
		#[source]
		source: PlatformError,
	},
}

impl OperationError {
	pub(crate) fn at(stage: Stage) -> impl FnOnce(PlatformError) -> Self {
		move |source| Self::Platform { stage, source }
	}

	/// Stage the operation had reached when it failed.
	pub fn stage(&self) -> Stage {
		match self {
			Self::TemplateNotFound(_) => Stage::Resolving,
			Self::Platform { stage, .. } => *stage,
		}
	}
}
