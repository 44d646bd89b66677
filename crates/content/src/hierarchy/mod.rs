//! In-memory topic tree.
//!
//! A [`Hierarchy`] is built once per snapshot and never patched. Topic paths
//! are computed during the build and indexed, so every lookup reflects the
//! tree as it was when the snapshot arrived.
//!
//! # Invariants
//!
//! - Acyclic: topics own their children, so no topic can be its own ancestor.
//! - Sibling topics, and templates/links within one topic, have unique names.
//! - Every indexed path equals the `/`-joined names from the root down.

use rustc_hash::FxHashMap as HashMap;
use tracing::debug;

use crate::address::{self, AddressKind, ParsedAddress};
use crate::card::Card;
use crate::error::{HierarchyError, Result};
use crate::model::{LinkTarget, Template, TopicConfig, TopicLink};
use crate::snapshot::TopicEntry;

/// Index of a topic inside one [`Hierarchy`]. Meaningless across rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TopicId(u32);

/// A topic with its resolved path.
#[derive(Debug, Clone)]
pub struct TopicNode {
	pub path: String,
	pub parent: Option<TopicId>,
	pub children: Vec<TopicId>,
	pub config: TopicConfig,
	pub templates: Vec<Template>,
	pub links: Vec<TopicLink>,
}

impl TopicNode {
	pub fn template(&self, name: &str) -> Option<&Template> {
		self.templates.iter().find(|t| t.name == name)
	}

	pub fn link(&self, name: &str) -> Option<&TopicLink> {
		self.links.iter().find(|l| l.name == name)
	}
}

/// Result of resolving an address against the tree.
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
	Topic(&'a TopicNode),
	Template {
		topic: &'a TopicNode,
		template: &'a Template,
	},
	Link {
		topic: &'a TopicNode,
		link: &'a TopicLink,
	},
}

/// Topic tree indexed by path.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
	nodes: Vec<TopicNode>,
	roots: Vec<TopicId>,
	by_path: HashMap<String, TopicId>,
}

impl Hierarchy {
	/// Validates and indexes a list of root topics.
	pub fn build(topics: Vec<TopicEntry>) -> Result<Self> {
		let mut hierarchy = Self::default();
		hierarchy.roots = hierarchy.insert_siblings(None, "", topics)?;
		debug!(
			topics = hierarchy.nodes.len(),
			templates = hierarchy.template_count(),
			"hierarchy.built"
		);
		Ok(hierarchy)
	}

	fn insert_siblings(
		&mut self,
		parent: Option<TopicId>,
		parent_path: &str,
		entries: Vec<TopicEntry>,
	) -> Result<Vec<TopicId>> {
		let mut ids = Vec::with_capacity(entries.len());
		for entry in entries {
			let name = entry.config.name.clone();
			if !address::is_valid_segment(&name) {
				return Err(HierarchyError::InvalidName {
					kind: "topic",
					name,
					parent: parent_path.to_string(),
				});
			}
			if address::is_reserved_topic_name(&name) {
				return Err(HierarchyError::ReservedName {
					name,
					parent: parent_path.to_string(),
				});
			}
			let path = address::child_topic_address(parent_path, &name);
			if self.by_path.contains_key(&path) {
				return Err(HierarchyError::DuplicateTopic(path));
			}
			ids.push(self.insert_topic(parent, path, entry)?);
		}
		Ok(ids)
	}

	fn insert_topic(
		&mut self,
		parent: Option<TopicId>,
		path: String,
		entry: TopicEntry,
	) -> Result<TopicId> {
		let TopicEntry {
			config,
			templates,
			links,
			children,
		} = entry;

		check_leaves(
			&path,
			"template",
			templates.iter().map(|t| t.name.as_str()),
			HierarchyError::DuplicateTemplate,
			address::template_address,
		)?;
		check_leaves(
			&path,
			"link",
			links.iter().map(|l| l.name.as_str()),
			HierarchyError::DuplicateLink,
			address::link_address,
		)?;

		let children = order_children(&path, config.subtopics.as_deref(), children);

		let id = TopicId(self.nodes.len() as u32);
		self.nodes.push(TopicNode {
			path: path.clone(),
			parent,
			children: Vec::new(),
			config,
			templates,
			links,
		});
		self.by_path.insert(path.clone(), id);

		let child_ids = self.insert_siblings(Some(id), &path, children)?;
		self.nodes[id.0 as usize].children = child_ids;
		Ok(id)
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn topic_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn template_count(&self) -> usize {
		self.nodes.iter().map(|n| n.templates.len()).sum()
	}

	pub fn node(&self, id: TopicId) -> &TopicNode {
		&self.nodes[id.0 as usize]
	}

	pub fn roots(&self) -> impl Iterator<Item = &TopicNode> {
		self.roots.iter().map(|id| self.node(*id))
	}

	pub fn children<'a>(&'a self, topic: &'a TopicNode) -> impl Iterator<Item = &'a TopicNode> {
		topic.children.iter().map(|id| self.node(*id))
	}

	/// Iterates every topic, parents before children.
	pub fn topics(&self) -> impl Iterator<Item = &TopicNode> {
		self.nodes.iter()
	}

	pub fn topic(&self, path: &str) -> Option<&TopicNode> {
		self.by_path.get(path).map(|id| self.node(*id))
	}

	/// Looks up a template by address. Unknown addresses are never guessed.
	pub fn template(&self, address: &str) -> Option<&Template> {
		match self.resolve(address)? {
			Entity::Template { template, .. } => Some(template),
			_ => None,
		}
	}

	pub fn link(&self, address: &str) -> Option<&TopicLink> {
		match self.resolve(address)? {
			Entity::Link { link, .. } => Some(link),
			_ => None,
		}
	}

	/// Resolves any address to the entity it names.
	pub fn resolve(&self, address: &str) -> Option<Entity<'_>> {
		let ParsedAddress {
			kind,
			topic_path,
			name,
		} = address::parse_address(address)?;
		let topic = self.topic(&topic_path)?;
		match kind {
			AddressKind::Topic => Some(Entity::Topic(topic)),
			AddressKind::Template => topic
				.template(&name)
				.map(|template| Entity::Template { topic, template }),
			AddressKind::Link => topic.link(&name).map(|link| Entity::Link { topic, link }),
		}
	}

	/// Iterates `(address, template)` over the whole tree.
	pub fn templates(&self) -> impl Iterator<Item = (String, &Template)> {
		self.nodes.iter().flat_map(|node| {
			node.templates
				.iter()
				.map(move |t| (address::template_address(&node.path, &t.name), t))
		})
	}

	/// Finds the template whose body is exactly `code`.
	pub fn template_by_code(&self, code: &str) -> Option<(String, &Template)> {
		self.templates().find(|(_, t)| t.code == code)
	}

	/// Cards for the root level.
	pub fn root_cards(&self) -> Vec<Card> {
		let mut topics: Vec<&TopicNode> = self.roots().collect();
		sort_topics(&mut topics);
		topics.into_iter().map(topic_card).collect()
	}

	/// Cards for one topic: sub-topics, then templates, then links.
	///
	/// Returns `None` if the topic does not exist.
	pub fn cards(&self, topic_path: &str) -> Option<Vec<Card>> {
		let topic = self.topic(topic_path)?;

		let mut children: Vec<&TopicNode> = self.children(topic).collect();
		sort_topics(&mut children);
		let mut templates: Vec<&Template> = topic.templates.iter().collect();
		templates.sort_by(|a, b| a.name.cmp(&b.name));
		let mut links: Vec<&TopicLink> = topic.links.iter().collect();
		links.sort_by(|a, b| a.name.cmp(&b.name));

		let mut cards = Vec::with_capacity(children.len() + templates.len() + links.len());
		cards.extend(children.into_iter().map(topic_card));
		cards.extend(templates.into_iter().map(|t| Card::Template {
			address: address::template_address(&topic.path, &t.name),
			name: t.name.clone(),
			title: t.label().to_string(),
			description: t.description.clone(),
			language: t.language.clone(),
		}));
		cards.extend(links.into_iter().map(|l| Card::Link {
			address: address::link_address(&topic.path, &l.name),
			name: l.name.clone(),
			title: if l.title.is_empty() { l.name.clone() } else { l.title.clone() },
			description: l.description.clone(),
			target: l.target.clone(),
			external: l.target_kind() == LinkTarget::External,
		}));
		Some(cards)
	}
}

fn check_leaves<'a>(
	topic_path: &str,
	kind: &'static str,
	names: impl Iterator<Item = &'a str>,
	duplicate: fn(String) -> HierarchyError,
	build: fn(&str, &str) -> String,
) -> Result<()> {
	let mut seen = rustc_hash::FxHashSet::default();
	for name in names {
		if !address::is_valid_segment(name) {
			return Err(HierarchyError::InvalidName {
				kind,
				name: name.to_string(),
				parent: topic_path.to_string(),
			});
		}
		if !seen.insert(name) {
			return Err(duplicate(build(topic_path, name)));
		}
	}
	Ok(())
}

/// Applies the `subtopics` order hint. Unlisted children keep their order after listed ones.
fn order_children(path: &str, hint: Option<&[String]>, children: Vec<TopicEntry>) -> Vec<TopicEntry> {
	let Some(hint) = hint else {
		return children;
	};

	let mut remaining: Vec<Option<TopicEntry>> = children.into_iter().map(Some).collect();
	let mut ordered = Vec::with_capacity(remaining.len());
	for name in hint {
		let slot = remaining
			.iter_mut()
			.find(|c| c.as_ref().is_some_and(|c| &c.config.name == name));
		match slot.and_then(Option::take) {
			Some(child) => ordered.push(child),
			None => debug!(topic = path, subtopic = %name, "hierarchy.subtopic_missing"),
		}
	}
	ordered.extend(remaining.into_iter().flatten());
	ordered
}

fn sort_topics(topics: &mut [&TopicNode]) {
	topics.sort_by(|a, b| {
		a.config
			.display
			.order
			.cmp(&b.config.display.order)
			.then_with(|| a.config.name.cmp(&b.config.name))
	});
}

fn topic_card(node: &TopicNode) -> Card {
	let title = if node.config.title.is_empty() {
		node.config.name.clone()
	} else {
		node.config.title.clone()
	};
	Card::Topic {
		address: node.path.clone(),
		name: node.config.name.clone(),
		title,
		description: node.config.description.clone(),
		icon: node.config.display.icon.clone(),
		color: node.config.display.color.clone(),
		template_count: node.templates.len(),
	}
}

#[cfg(test)]
mod tests;
