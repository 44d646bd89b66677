//! Human readable labels for languages and topic paths.

use rustc_hash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};

use crate::address::{SEGMENT_SEPARATOR, path_prefixes};
use crate::hierarchy::Hierarchy;
use crate::model::Language;

/// Separator placed between segments by [`DisplayNames::full_display_path`].
pub const DEFAULT_PATH_SEPARATOR: &str = " / ";

/// What to return when no title is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fallback {
	/// Uppercase the first character of the input.
	Capitalize,
	/// Return the input unchanged.
	Original,
	/// Return an empty string.
	Empty,
}

impl Fallback {
	/// Default for language lookups.
	pub const LANGUAGE: Self = Self::Capitalize;
	/// Default for topic lookups. An unknown path is still worth showing verbatim.
	pub const TOPIC: Self = Self::Original;

	pub fn apply(self, input: &str) -> String {
		match self {
			Self::Capitalize => capitalize(input),
			Self::Original => input.to_string(),
			Self::Empty => String::new(),
		}
	}
}

fn capitalize(input: &str) -> String {
	let mut chars = input.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

/// Title lookup tables built from one snapshot.
#[derive(Debug, Clone)]
pub struct DisplayNames {
	languages: HashMap<String, String>,
	/// Keyed by full topic path.
	topic_paths: HashMap<String, String>,
	/// Keyed by bare topic name. First topic with a given name wins.
	topic_names: HashMap<String, String>,
	separator: String,
}

impl Default for DisplayNames {
	fn default() -> Self {
		Self {
			languages: HashMap::default(),
			topic_paths: HashMap::default(),
			topic_names: HashMap::default(),
			separator: DEFAULT_PATH_SEPARATOR.to_string(),
		}
	}
}

impl DisplayNames {
	/// Indexes every titled language and topic.
	pub fn build(languages: &[Language], hierarchy: &Hierarchy) -> Self {
		let mut names = Self::default();
		for language in languages {
			if !language.title.is_empty() {
				names
					.languages
					.insert(language.name.clone(), language.title.clone());
			}
		}
		for topic in hierarchy.topics() {
			if topic.config.title.is_empty() {
				continue;
			}
			names
				.topic_paths
				.insert(topic.path.clone(), topic.config.title.clone());
			names
				.topic_names
				.entry(topic.config.name.clone())
				.or_insert_with(|| topic.config.title.clone());
		}
		names
	}

	#[must_use]
	pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
		self.separator = separator.into();
		self
	}

	pub fn separator(&self) -> &str {
		&self.separator
	}

	pub fn language_display_name(&self, name: &str, fallback: Fallback) -> String {
		match self.languages.get(name) {
			Some(title) => title.clone(),
			None => fallback.apply(name),
		}
	}

	/// Resolves a topic title by full path, then by bare name.
	pub fn topic_display_name(&self, path: &str, fallback: Fallback) -> String {
		let path = path.trim_matches(SEGMENT_SEPARATOR);
		self.topic_paths
			.get(path)
			.or_else(|| self.topic_names.get(path))
			.cloned()
			.unwrap_or_else(|| fallback.apply(path))
	}

	/// Renders every prefix of `path` by its title, keeping raw segments that
	/// have none.
	///
	/// Prefixes are looked up by full path only, so unrelated topics sharing a
	/// segment name cannot change the result.
	pub fn full_display_path(&self, path: &str) -> String {
		let path = path.trim_matches(SEGMENT_SEPARATOR);
		if path.is_empty() {
			return String::new();
		}
		path_prefixes(path)
			.map(|(prefix, segment)| {
				self.topic_paths
					.get(prefix)
					.map_or(segment, String::as_str)
			})
			.collect::<Vec<_>>()
			.join(&self.separator)
	}
}
