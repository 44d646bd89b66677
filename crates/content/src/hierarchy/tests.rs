use pretty_assertions::assert_eq;

use super::*;

fn template(name: &str, code: &str) -> Template {
	Template {
		name: name.into(),
		title: String::new(),
		description: String::new(),
		code: code.into(),
		language: "c".into(),
		documentation: None,
	}
}

fn topic(name: &str) -> TopicEntry {
	TopicEntry::new(TopicConfig::new(name, ""))
}

fn sample() -> Vec<TopicEntry> {
	vec![
		topic("c")
			.with_child(topic("basic").with_template(template("hello", "puts(\"hi\");")))
			.with_child(topic("advanced")),
		topic("rust").with_template(template("main", "fn main() {}")),
	]
}

#[test]
fn resolves_every_template_by_its_address() {
	let h = Hierarchy::build(sample()).unwrap();
	let all: Vec<_> = h.templates().map(|(a, t)| (a, t.clone())).collect();
	assert_eq!(all.len(), 2);
	for (address, t) in &all {
		assert_eq!(h.template(address), Some(t));
	}
	assert_eq!(h.template("c/basic/templates/hello").unwrap().name, "hello");
}

#[test]
fn unknown_addresses_are_not_found() {
	let h = Hierarchy::build(sample()).unwrap();
	assert!(h.template("c/basic/templates/hell").is_none());
	assert!(h.template("c/templates/hello").is_none());
	assert!(h.template("c/basic").is_none());
	assert!(h.link("c/basic/links/hello").is_none());
	assert!(h.resolve("").is_none());
}

#[test]
fn paths_follow_the_tree() {
	let h = Hierarchy::build(sample()).unwrap();
	let basic = h.topic("c/basic").unwrap();
	assert_eq!(basic.path, "c/basic");
	let parent = h.node(basic.parent.unwrap());
	assert_eq!(parent.path, "c");
	let children: Vec<_> = h.children(parent).map(|n| n.path.as_str()).collect();
	assert_eq!(children, vec!["c/basic", "c/advanced"]);
	assert!(matches!(h.resolve("c"), Some(Entity::Topic(_))));
}

#[test]
fn subtopic_hint_orders_children() {
	let mut c = topic("c").with_child(topic("x")).with_child(topic("y")).with_child(topic("z"));
	c.config.subtopics = Some(vec!["z".into(), "missing".into(), "x".into()]);
	let h = Hierarchy::build(vec![c]).unwrap();
	let c = h.topic("c").unwrap();
	let order: Vec<_> = h.children(c).map(|n| n.config.name.as_str()).collect();
	assert_eq!(order, vec!["z", "x", "y"]);
}

#[test]
fn rejects_duplicates_and_bad_names() {
	let err = Hierarchy::build(vec![topic("c"), topic("c")]).unwrap_err();
	assert_eq!(err, HierarchyError::DuplicateTopic("c".into()));

	let dup = topic("c")
		.with_template(template("a", ""))
		.with_template(template("a", ""));
	let err = Hierarchy::build(vec![dup]).unwrap_err();
	assert_eq!(err, HierarchyError::DuplicateTemplate("c/templates/a".into()));

	let err = Hierarchy::build(vec![topic("c").with_child(topic("a/b"))]).unwrap_err();
	assert!(matches!(err, HierarchyError::InvalidName { kind: "topic", .. }));
}

#[test]
fn topics_named_like_address_markers_are_rejected() {
	let nested = topic("a").with_child(topic("templates").with_child(topic("b")));
	let err = Hierarchy::build(vec![nested]).unwrap_err();
	assert_eq!(
		err,
		HierarchyError::ReservedName {
			name: "templates".into(),
			parent: "a".into(),
		}
	);

	let err = Hierarchy::build(vec![topic("links")]).unwrap_err();
	assert!(matches!(err, HierarchyError::ReservedName { name, .. } if name == "links"));

	let ok = Hierarchy::build(vec![topic("a").with_child(topic("templating"))]).unwrap();
	assert!(ok.resolve("a/templating").is_some());
}

#[test]
fn cards_list_topics_templates_then_links() {
	let mut advanced = topic("advanced");
	advanced.config.display.order = -1;
	let c = topic("c")
		.with_child(topic("basic"))
		.with_child(advanced)
		.with_template(template("b", ""))
		.with_template(template("a", ""))
		.with_link(TopicLink {
			name: "ref".into(),
			title: "Reference".into(),
			target: "https://en.cppreference.com".into(),
			description: String::new(),
		});
	let h = Hierarchy::build(vec![c]).unwrap();
	let cards = h.cards("c").unwrap();
	let addresses: Vec<_> = cards.iter().map(Card::address).collect();
	assert_eq!(
		addresses,
		vec!["c/advanced", "c/basic", "c/templates/a", "c/templates/b", "c/links/ref"]
	);
	assert!(matches!(cards[4], Card::Link { external: true, .. }));
	assert!(h.cards("nope").is_none());
	assert_eq!(h.root_cards().len(), 1);
}

#[test]
fn finds_template_by_exact_body() {
	let h = Hierarchy::build(sample()).unwrap();
	let (address, _) = h.template_by_code("fn main() {}").unwrap();
	assert_eq!(address, "rust/templates/main");
	assert!(h.template_by_code("fn main() { }").is_none());
}
