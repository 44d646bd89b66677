//! Entity types stored in the content hierarchy.
//!
//! None of these types carry a stored identifier. Identity is the address
//! computed from tree position, see [`crate::address`].

use serde::{Deserialize, Serialize};

/// A reusable code snippet owned by a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
	/// Filesystem-safe slug, unique within the owning topic.
	pub name: String,
	/// Human readable title.
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub description: String,
	/// Template body.
	pub code: String,
	/// Language key, matches [`Language::name`].
	#[serde(default)]
	pub language: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub documentation: Option<String>,
}

impl Template {
	/// Returns the title, or the slug when the title is blank.
	pub fn label(&self) -> &str {
		if self.title.trim().is_empty() { &self.name } else { &self.title }
	}
}

/// Presentation settings of a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopicDisplay {
	pub icon: String,
	pub color: String,
	/// Sort key among siblings. Lower sorts first.
	pub order: i32,
	pub collapsed: bool,
	pub show_in_navigation: bool,
}

impl Default for TopicDisplay {
	fn default() -> Self {
		Self {
			icon: String::new(),
			color: String::new(),
			order: 0,
			collapsed: false,
			show_in_navigation: true,
		}
	}
}

/// Configuration of a single topic node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicConfig {
	/// Path segment of this topic.
	pub name: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub description: String,
	/// Child order hint. Children not listed here keep declaration order.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub subtopics: Option<Vec<String>>,
	#[serde(default)]
	pub display: TopicDisplay,
}

impl TopicConfig {
	/// Creates a config with default presentation settings.
	pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			title: title.into(),
			description: String::new(),
			subtopics: None,
			display: TopicDisplay::default(),
		}
	}
}

/// A cross-reference to another hierarchy entry or an external resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicLink {
	pub name: String,
	#[serde(default)]
	pub title: String,
	/// Hierarchy address or external URL.
	pub target: String,
	#[serde(default)]
	pub description: String,
}

/// Classification of a [`TopicLink::target`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
	/// Absolute URL with a scheme, opened outside the hierarchy.
	External,
	/// Address inside the hierarchy.
	Internal,
}

impl TopicLink {
	/// Returns whether the target points outside the hierarchy.
	pub fn target_kind(&self) -> LinkTarget {
		match url::Url::parse(&self.target) {
			// Single-letter schemes are drive letters, not URLs.
			Ok(url) if url.scheme().len() > 1 => LinkTarget::External,
			_ => LinkTarget::Internal,
		}
	}
}

/// A language templates can be written in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
	/// Stable key referenced by [`Template::language`].
	pub name: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub tag_name: String,
	#[serde(default)]
	pub file_extensions: Vec<String>,
	#[serde(default)]
	pub description: String,
}

impl Language {
	/// Returns true if `ext` (with or without a leading dot) belongs to this language.
	pub fn matches_extension(&self, ext: &str) -> bool {
		let ext = ext.trim_start_matches('.');
		self.file_extensions
			.iter()
			.any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn link(target: &str) -> TopicLink {
		TopicLink {
			name: "l".into(),
			title: String::new(),
			target: target.into(),
			description: String::new(),
		}
	}

	#[test]
	fn link_targets_are_classified_by_scheme() {
		assert_eq!(link("https://example.com/x").target_kind(), LinkTarget::External);
		assert_eq!(link("c/basic/templates/hello").target_kind(), LinkTarget::Internal);
		assert_eq!(link("C:/work/file").target_kind(), LinkTarget::Internal);
	}

	#[test]
	fn extension_match_ignores_dot_and_case() {
		let rust = Language {
			name: "rust".into(),
			title: "Rust".into(),
			tag_name: "rs".into(),
			file_extensions: vec![".rs".into()],
			description: String::new(),
		};
		assert!(rust.matches_extension("RS"));
		assert!(rust.matches_extension(".rs"));
		assert!(!rust.matches_extension("py"));
	}

	#[test]
	fn topic_display_defaults_to_visible() {
		let cfg: TopicConfig = serde_json::from_str(r#"{"name":"c"}"#).unwrap();
		assert!(cfg.display.show_in_navigation);
		assert_eq!(cfg.subtopics, None);
	}
}
