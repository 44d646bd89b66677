//! Host abstraction for Stencil.
//!
//! Core logic talks to the host only through the capability traits in
//! [`capabilities`], bundled into a [`PlatformAdapter`]. Each host (an editor
//! extension, a terminal, a test harness) implements the traits once.
//!
//! The adapter also owns host-wide state: a shallow-merged [`Configuration`],
//! the [`PluginRegistry`], and an [`EventEmitter`] for [`HostEvent`]s.

pub mod adapter;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod events;
pub mod headless;
pub mod plugin;

pub use adapter::{Capabilities, PlatformAdapter, PlatformInfo};
pub use capabilities::{
	ClipboardAccess, EditorAccess, IndentContext, IndentUnit, MessageLevel, StorageAccess, UiAccess,
};
pub use config::Configuration;
pub use error::{PlatformError, Result};
pub use events::{Event, EventEmitter, HostEvent, HostEventKind, ListenerId, ListenerResult};
pub use headless::{Document, Faults, HeadlessPlatform, UiCall};
pub use plugin::{Plugin, PluginRegistry};
