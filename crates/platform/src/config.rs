//! Shallow-merged configuration bag.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Flat key/value configuration.
///
/// Updates replace whole top-level keys; nested objects are not merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
	values: Map<String, Value>,
}

impl Configuration {
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.values.get(key)
	}

	/// Decodes the value at `key`, returning `None` if absent or mistyped.
	pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
		let value = self.values.get(key)?;
		match serde_json::from_value(value.clone()) {
			Ok(v) => Some(v),
			Err(err) => {
				tracing::debug!(key, error = %err, "config.type_mismatch");
				None
			}
		}
	}

	/// Merges `partial` into this bag, returning the keys whose value changed.
	pub fn merge(&mut self, partial: Map<String, Value>) -> Vec<String> {
		let mut changed = Vec::new();
		for (key, value) in partial {
			if self.values.get(&key) != Some(&value) {
				changed.push(key.clone());
				self.values.insert(key, value);
			}
		}
		changed
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;

	fn map(value: Value) -> Map<String, Value> {
		match value {
			Value::Object(map) => map,
			_ => unreachable!(),
		}
	}

	#[test]
	fn merge_is_shallow() {
		let mut config = Configuration::default();
		config.merge(map(json!({
			"editor": { "tabSize": 4, "insertSpaces": true },
			"silent": false,
		})));
		let changed = config.merge(map(json!({ "editor": { "tabSize": 2 } })));
		assert_eq!(changed, vec!["editor"]);
		assert_eq!(config.get("editor"), Some(&json!({ "tabSize": 2 })));
		assert_eq!(config.get_as::<bool>("silent"), Some(false));
	}

	#[test]
	fn unchanged_keys_are_not_reported() {
		let mut config = Configuration::default();
		assert_eq!(config.merge(map(json!({ "a": 1 }))), vec!["a"]);
		assert!(config.merge(map(json!({ "a": 1 }))).is_empty());
		assert_eq!(config.merge(map(json!({ "a": 1, "b": null }))), vec!["b"]);
		assert_eq!(config.get_as::<String>("a"), None);
	}
}
