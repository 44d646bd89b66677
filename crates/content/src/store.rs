//! Atomically swapped content catalog.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{info, warn};

use crate::display::{DEFAULT_PATH_SEPARATOR, DisplayNames};
use crate::error::Result;
use crate::hierarchy::Hierarchy;
use crate::model::{Language, Template};
use crate::snapshot::ContentSnapshot;

/// Everything derived from one snapshot.
///
/// The hierarchy, the language table, and the display-name indices always
/// come from the same snapshot.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
	pub hierarchy: Hierarchy,
	pub languages: Vec<Language>,
	pub display: DisplayNames,
	/// Incremented on every successful reload.
	pub generation: u64,
}

impl Catalog {
	fn build(snapshot: ContentSnapshot, separator: &str, generation: u64) -> Result<Self> {
		let ContentSnapshot { languages, topics } = snapshot;
		let hierarchy = Hierarchy::build(topics)?;
		let display = DisplayNames::build(&languages, &hierarchy).with_separator(separator);
		Ok(Self {
			hierarchy,
			languages,
			display,
			generation,
		})
	}

	pub fn language_for_extension(&self, ext: &str) -> Option<&Language> {
		self.languages.iter().find(|l| l.matches_extension(ext))
	}
}

/// Shared, read-mostly owner of the current [`Catalog`].
///
/// Readers take a snapshot with [`ContentStore::load`] and keep using it even
/// if a reload happens meanwhile; they never observe a half-built catalog.
#[derive(Debug)]
pub struct ContentStore {
	snap: ArcSwap<Catalog>,
	separator: String,
}

impl Default for ContentStore {
	fn default() -> Self {
		Self::new()
	}
}

impl ContentStore {
	pub fn new() -> Self {
		Self::with_separator(DEFAULT_PATH_SEPARATOR)
	}

	/// Creates an empty store whose display paths use `separator`.
	pub fn with_separator(separator: impl Into<String>) -> Self {
		Self {
			snap: ArcSwap::from_pointee(Catalog::default()),
			separator: separator.into(),
		}
	}

	/// Returns the current catalog.
	pub fn load(&self) -> Arc<Catalog> {
		self.snap.load_full()
	}

	/// Replaces the catalog with one built from `snapshot`.
	///
	/// On error the current catalog stays in place.
	pub fn reload(&self, snapshot: ContentSnapshot) -> Result<u64> {
		let generation = self.snap.load().generation + 1;
		let catalog = match Catalog::build(snapshot, &self.separator, generation) {
			Ok(catalog) => catalog,
			Err(err) => {
				warn!(error = %err, "content.reload_rejected");
				return Err(err);
			}
		};
		info!(
			generation,
			topics = catalog.hierarchy.topic_count(),
			templates = catalog.hierarchy.template_count(),
			"content.reloaded"
		);
		self.snap.store(Arc::new(catalog));
		Ok(generation)
	}

	/// Clones the template at `address` out of the current catalog.
	pub fn template(&self, address: &str) -> Option<Template> {
		self.snap.load().hierarchy.template(address).cloned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::TopicConfig;
	use crate::snapshot::TopicEntry;

	fn hello() -> Template {
		Template {
			name: "hello".into(),
			title: "Hello".into(),
			description: String::new(),
			code: "printf(\"hello\");".into(),
			language: "c".into(),
			documentation: None,
		}
	}

	fn snapshot() -> ContentSnapshot {
		ContentSnapshot {
			languages: Vec::new(),
			topics: vec![
				TopicEntry::new(TopicConfig::new("c", "C"))
					.with_child(TopicEntry::new(TopicConfig::new("basic", "")).with_template(hello())),
			],
		}
	}

	#[test]
	fn deleting_a_topic_makes_its_templates_unresolvable() {
		let store = ContentStore::new();
		store.reload(snapshot()).unwrap();
		let address = crate::address::template_address("c/basic", &hello().name);
		assert_eq!(address, "c/basic/templates/hello");
		assert_eq!(store.template(&address), Some(hello()));

		let mut next = snapshot();
		assert!(next.remove_topic("c"));
		store.reload(next).unwrap();
		assert_eq!(store.template(&address), None);
	}

	#[test]
	fn rejected_reload_keeps_previous_catalog() {
		let store = ContentStore::new();
		assert_eq!(store.reload(snapshot()).unwrap(), 1);

		let mut bad = snapshot();
		bad.topics.push(TopicEntry::new(TopicConfig::new("c", "again")));
		assert!(store.reload(bad).is_err());

		let catalog = store.load();
		assert_eq!(catalog.generation, 1);
		assert!(catalog.hierarchy.template("c/basic/templates/hello").is_some());
	}

	#[test]
	fn readers_keep_their_snapshot_across_reloads() {
		let store = ContentStore::new();
		store.reload(snapshot()).unwrap();
		let held = store.load();

		let mut next = snapshot();
		next.topic_mut("c/basic").unwrap().templates.clear();
		store.reload(next).unwrap();

		assert!(held.hierarchy.template("c/basic/templates/hello").is_some());
		assert!(store.template("c/basic/templates/hello").is_none());
	}

	#[test]
	fn display_names_follow_reloads() {
		let store = ContentStore::with_separator(" > ");
		store.reload(snapshot()).unwrap();
		assert_eq!(store.load().display.full_display_path("c/basic"), "C > basic");

		let mut next = snapshot();
		next.topic_mut("c").unwrap().config.title = "C Language".into();
		store.reload(next).unwrap();
		assert_eq!(store.load().display.full_display_path("c/basic"), "C Language > basic");
	}
}
