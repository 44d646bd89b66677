//! Data snapshots delivered by the host.
//!
//! The host owns persistence. It hands over the complete content tree as one
//! [`ContentSnapshot`], which is validated and indexed into a
//! [`Hierarchy`](crate::Hierarchy) in a single step.

use serde::{Deserialize, Serialize};

use crate::address::SEGMENT_SEPARATOR;
use crate::model::{Language, Template, TopicConfig, TopicLink};

/// A full copy of the content tree plus the language table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentSnapshot {
	pub languages: Vec<Language>,
	pub topics: Vec<TopicEntry>,
}

/// One topic with everything it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicEntry {
	#[serde(flatten)]
	pub config: TopicConfig,
	#[serde(default)]
	pub templates: Vec<Template>,
	#[serde(default)]
	pub links: Vec<TopicLink>,
	#[serde(default)]
	pub children: Vec<TopicEntry>,
}

impl TopicEntry {
	pub fn new(config: TopicConfig) -> Self {
		Self {
			config,
			templates: Vec::new(),
			links: Vec::new(),
			children: Vec::new(),
		}
	}

	#[must_use]
	pub fn with_template(mut self, template: Template) -> Self {
		self.templates.push(template);
		self
	}

	#[must_use]
	pub fn with_link(mut self, link: TopicLink) -> Self {
		self.links.push(link);
		self
	}

	#[must_use]
	pub fn with_child(mut self, child: TopicEntry) -> Self {
		self.children.push(child);
		self
	}
}

impl ContentSnapshot {
	/// Decodes a snapshot from its JSON form.
	pub fn from_json(json: &str) -> crate::Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	/// Returns the entry at `path`, if present.
	pub fn topic_mut(&mut self, path: &str) -> Option<&mut TopicEntry> {
		let mut segments = path.split(SEGMENT_SEPARATOR);
		let first = segments.next()?;
		let mut entry = self.topics.iter_mut().find(|t| t.config.name == first)?;
		for segment in segments {
			entry = entry.children.iter_mut().find(|t| t.config.name == segment)?;
		}
		Some(entry)
	}

	/// Removes the topic at `path` together with its subtree.
	///
	/// Returns false if nothing was removed.
	pub fn remove_topic(&mut self, path: &str) -> bool {
		let (siblings, name) = match path.rsplit_once(SEGMENT_SEPARATOR) {
			Some((parent, name)) => match self.topic_mut(parent) {
				Some(parent) => (&mut parent.children, name),
				None => return false,
			},
			None => (&mut self.topics, path),
		};
		let before = siblings.len();
		siblings.retain(|t| t.config.name != name);
		before != siblings.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const JSON: &str = r#"{
		"languages": [{ "name": "c", "title": "C", "tagName": "c", "fileExtensions": [".c", ".h"] }],
		"topics": [{
			"name": "c",
			"title": "C",
			"subtopics": ["basic"],
			"display": { "icon": "book", "order": 2, "showInNavigation": false },
			"children": [{
				"name": "basic",
				"templates": [{ "name": "hello", "title": "Hello", "code": "int main() {}", "language": "c" }],
				"links": [{ "name": "docs", "target": "https://example.com" }]
			}]
		}]
	}"#;

	#[test]
	fn decodes_nested_topics() {
		let snapshot = ContentSnapshot::from_json(JSON).unwrap();
		let c = &snapshot.topics[0];
		assert_eq!(c.config.subtopics.as_deref(), Some(&["basic".to_string()][..]));
		assert_eq!(c.config.display.order, 2);
		assert!(!c.config.display.show_in_navigation);
		assert_eq!(c.children[0].templates[0].name, "hello");
		assert_eq!(c.children[0].links[0].target, "https://example.com");
		assert_eq!(snapshot.languages[0].file_extensions, vec![".c", ".h"]);
	}

	#[test]
	fn malformed_json_is_a_decode_error() {
		let err = ContentSnapshot::from_json("{\"topics\": 3}").unwrap_err();
		assert!(matches!(err, crate::HierarchyError::Decode(_)));
	}

	#[test]
	fn removes_nested_topics() {
		let mut snapshot = ContentSnapshot::from_json(JSON).unwrap();
		assert!(snapshot.remove_topic("c/basic"));
		assert!(snapshot.topic_mut("c").unwrap().children.is_empty());
		assert!(!snapshot.remove_topic("c/basic"));
		assert!(snapshot.remove_topic("c"));
		assert!(snapshot.topics.is_empty());
	}
}
