//! Content hierarchy for Stencil.
//!
//! Templates, topics, and links have no stored identifiers. Their identity is
//! the path derived from the topic tree:
//!
//! * [`address`]: building and parsing canonical addresses
//! * [`Hierarchy`]: the validated, path-indexed topic tree
//! * [`DisplayNames`]: title lookups with fallback policies
//! * [`ContentStore`]: the atomically swapped [`Catalog`] shared by readers
//!
//! A host delivers data as a [`ContentSnapshot`]. Each reload rebuilds the
//! hierarchy and every derived index in one step.

pub mod address;
pub mod card;
pub mod display;
pub mod error;
pub mod hierarchy;
pub mod model;
pub mod snapshot;
pub mod store;

pub use address::{AddressKind, ParsedAddress, link_address, parse_address, template_address};
pub use card::Card;
pub use display::{DisplayNames, Fallback};
pub use error::{HierarchyError, Result};
pub use hierarchy::{Entity, Hierarchy, TopicNode};
pub use model::{Language, LinkTarget, Template, TopicConfig, TopicDisplay, TopicLink};
pub use snapshot::{ContentSnapshot, TopicEntry};
pub use store::{Catalog, ContentStore};
