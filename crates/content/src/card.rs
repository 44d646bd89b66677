//! Presentation records for the card views.

use serde::{Deserialize, Serialize};

/// Everything a card needs to render, copied out of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Card {
	#[serde(rename_all = "camelCase")]
	Template {
		address: String,
		name: String,
		title: String,
		description: String,
		language: String,
	},
	#[serde(rename_all = "camelCase")]
	Topic {
		address: String,
		name: String,
		title: String,
		description: String,
		icon: String,
		color: String,
		template_count: usize,
	},
	#[serde(rename_all = "camelCase")]
	Link {
		address: String,
		name: String,
		title: String,
		description: String,
		target: String,
		external: bool,
	},
}

impl Card {
	pub fn address(&self) -> &str {
		match self {
			Self::Template { address, .. } | Self::Topic { address, .. } | Self::Link { address, .. } => {
				address
			}
		}
	}

	pub fn title(&self) -> &str {
		match self {
			Self::Template { title, .. } | Self::Topic { title, .. } | Self::Link { title, .. } => title,
		}
	}
}
