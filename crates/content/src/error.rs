//! Errors raised while building a hierarchy from a snapshot.

/// A convenient type alias for `Result` with `E` = [`HierarchyError`].
pub type Result<T, E = HierarchyError> = std::result::Result<T, E>;

/// Reasons a snapshot is rejected.
///
/// A rejected snapshot leaves the previously loaded hierarchy in place.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum HierarchyError {
	/// A topic, template, or link name is not a usable path segment.
	#[error("invalid {kind} name {name:?} under {parent:?}")]
	InvalidName {
		kind: &'static str,
		name: String,
		parent: String,
	},
	/// A topic is named like an address marker (`templates`, `links`).
	#[error("topic name {name:?} under {parent:?} is reserved")]
	ReservedName { name: String, parent: String },
	/// Two sibling topics share a name.
	#[error("duplicate topic {0}")]
	DuplicateTopic(String),
	/// Two templates in one topic share a name.
	#[error("duplicate template {0}")]
	DuplicateTemplate(String),
	/// Two links in one topic share a name.
	#[error("duplicate link {0}")]
	DuplicateLink(String),
	/// The snapshot could not be decoded.
	#[error("malformed snapshot: {0}")]
	Decode(String),
}

impl From<serde_json::Error> for HierarchyError {
	fn from(err: serde_json::Error) -> Self {
		Self::Decode(err.to_string())
	}
}
