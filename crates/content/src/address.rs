//! Path-derived addressing.
//!
//! Every entity in the hierarchy is identified by where it sits:
//!
//! - topic: `a/b/c` (the chain of ancestor names)
//! - template: `{topic}/templates/{name}`
//! - link: `{topic}/links/{name}`
//!
//! Addresses are recomputed from the current tree. Renaming or moving a topic
//! changes the address of everything beneath it, so addresses must not be
//! held across a reload.

use std::fmt;

/// Separator between path segments.
pub const SEGMENT_SEPARATOR: char = '/';

const TEMPLATES_INFIX: &str = "/templates/";
const LINKS_INFIX: &str = "/links/";

/// Kind of entity an address refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
	Topic,
	Template,
	Link,
}

/// A parsed address.
///
/// For topic addresses `name` is the last segment and `topic_path` the full
/// path, so `topic_path` always names the topic that owns (or is) the entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedAddress {
	pub kind: AddressKind,
	pub topic_path: String,
	pub name: String,
}

impl fmt::Display for ParsedAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.kind {
			AddressKind::Topic => f.write_str(&self.topic_path),
			AddressKind::Template => write!(f, "{}{TEMPLATES_INFIX}{}", self.topic_path, self.name),
			AddressKind::Link => write!(f, "{}{LINKS_INFIX}{}", self.topic_path, self.name),
		}
	}
}

/// Returns true if `name` can be used as a single path segment.
pub fn is_valid_segment(name: &str) -> bool {
	!name.is_empty() && !name.contains(SEGMENT_SEPARATOR) && name.trim() == name
}

/// Returns true if a topic called `name` would make its descendants'
/// addresses parse as template or link addresses.
pub fn is_reserved_topic_name(name: &str) -> bool {
	let marker = |infix: &str| infix.trim_matches(SEGMENT_SEPARATOR) == name;
	marker(TEMPLATES_INFIX) || marker(LINKS_INFIX)
}

fn is_valid_topic_path(path: &str) -> bool {
	!path.is_empty() && path.split(SEGMENT_SEPARATOR).all(is_valid_segment)
}

/// Joins ancestor names into a topic address.
///
/// Returns an empty string if any segment is malformed.
pub fn topic_address<S: AsRef<str>>(ancestors: &[S]) -> String {
	if ancestors.is_empty() || !ancestors.iter().all(|s| is_valid_segment(s.as_ref())) {
		return String::new();
	}
	ancestors
		.iter()
		.map(AsRef::as_ref)
		.collect::<Vec<_>>()
		.join("/")
}

/// Appends a child segment to a topic path.
pub fn child_topic_address(parent: &str, name: &str) -> String {
	if !is_valid_segment(name) {
		return String::new();
	}
	if parent.is_empty() {
		return name.to_string();
	}
	if !is_valid_topic_path(parent) {
		return String::new();
	}
	format!("{parent}/{name}")
}

/// Builds the address of a template named `name` under `topic_path`.
pub fn template_address(topic_path: &str, name: &str) -> String {
	leaf_address(topic_path, TEMPLATES_INFIX, name)
}

/// Builds the address of a link named `name` under `topic_path`.
pub fn link_address(topic_path: &str, name: &str) -> String {
	leaf_address(topic_path, LINKS_INFIX, name)
}

fn leaf_address(topic_path: &str, infix: &str, name: &str) -> String {
	if !is_valid_topic_path(topic_path) || !is_valid_segment(name) {
		return String::new();
	}
	format!("{topic_path}{infix}{name}")
}

/// Splits an address into its owning topic path and leaf name.
///
/// The split happens on the last `/templates/` or `/links/` so topics that
/// happen to be named `templates` or `links` still resolve. Anything else is
/// treated as a topic path. Returns `None` for malformed input.
pub fn parse_address(address: &str) -> Option<ParsedAddress> {
	let address = address.trim_matches(SEGMENT_SEPARATOR);
	if address.is_empty() {
		return None;
	}

	let leaf = [
		(AddressKind::Template, TEMPLATES_INFIX),
		(AddressKind::Link, LINKS_INFIX),
	]
	.into_iter()
	.filter_map(|(kind, infix)| {
		address
			.rfind(infix)
			.map(|idx| (idx, kind, &address[..idx], &address[idx + infix.len()..]))
	})
	.max_by_key(|(idx, ..)| *idx);

	match leaf {
		Some((_, kind, topic, name)) => {
			if !is_valid_topic_path(topic) || !is_valid_segment(name) {
				return None;
			}
			Some(ParsedAddress {
				kind,
				topic_path: topic.to_string(),
				name: name.to_string(),
			})
		}
		None => {
			if !is_valid_topic_path(address) {
				return None;
			}
			let name = address
				.rsplit(SEGMENT_SEPARATOR)
				.next()
				.unwrap_or(address)
				.to_string();
			Some(ParsedAddress {
				kind: AddressKind::Topic,
				topic_path: address.to_string(),
				name,
			})
		}
	}
}

/// Returns each prefix of a topic path, shortest first.
///
/// `"a/b/c"` yields `"a"`, `"a/b"`, `"a/b/c"`.
pub fn path_prefixes(path: &str) -> impl Iterator<Item = (&str, &str)> {
	let mut end = 0usize;
	path.split(SEGMENT_SEPARATOR).map(move |segment| {
		end += segment.len();
		let prefix = &path[..end];
		end += 1;
		(prefix, segment)
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builds_canonical_addresses() {
		assert_eq!(template_address("c/basic", "hello"), "c/basic/templates/hello");
		assert_eq!(link_address("c", "docs"), "c/links/docs");
		assert_eq!(topic_address(&["c", "basic"]), "c/basic");
		assert_eq!(child_topic_address("", "c"), "c");
		assert_eq!(child_topic_address("c", "basic"), "c/basic");
	}

	#[test]
	fn malformed_input_yields_empty_address() {
		assert_eq!(template_address("", "hello"), "");
		assert_eq!(template_address("c", ""), "");
		assert_eq!(template_address("c", "a/b"), "");
		assert_eq!(link_address("c//basic", "x"), "");
		assert_eq!(topic_address::<&str>(&[]), "");
		assert_eq!(child_topic_address("c", "x/y"), "");
	}

	#[test]
	fn round_trips_templates_and_links() {
		for (topic, name) in [("c/basic", "hello"), ("rust", "main"), ("a/templates", "x")] {
			let parsed = parse_address(&template_address(topic, name)).unwrap();
			assert_eq!(parsed.kind, AddressKind::Template);
			assert_eq!((parsed.topic_path.as_str(), parsed.name.as_str()), (topic, name));

			let parsed = parse_address(&link_address(topic, name)).unwrap();
			assert_eq!(parsed.kind, AddressKind::Link);
			assert_eq!((parsed.topic_path.as_str(), parsed.name.as_str()), (topic, name));
		}
	}

	#[test]
	fn parse_splits_on_last_infix() {
		let parsed = parse_address("a/links/templates/x").unwrap();
		assert_eq!(parsed.kind, AddressKind::Template);
		assert_eq!(parsed.topic_path, "a/links");
		assert_eq!(parsed.to_string(), "a/links/templates/x");
	}

	#[test]
	fn plain_paths_parse_as_topics() {
		let parsed = parse_address("c/basic").unwrap();
		assert_eq!(parsed.kind, AddressKind::Topic);
		assert_eq!(parsed.name, "basic");
		assert_eq!(parse_address(""), None);
		assert_eq!(parse_address("c/templates//x"), None);
	}

	#[test]
	fn prefixes_walk_left_to_right() {
		let got: Vec<_> = path_prefixes("a/b/c").collect();
		assert_eq!(got, vec![("a", "a"), ("a/b", "b"), ("a/b/c", "c")]);
	}
}
