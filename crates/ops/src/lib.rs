//! Copy and insert operations for Stencil.
//!
//! [`CodeOperationService`] moves template code to the clipboard or into the
//! active editor. It resolves templates through a shared
//! [`ContentStore`](stencil_content::ContentStore), formats code against the
//! cursor's indentation, and talks to the host only through a
//! [`PlatformAdapter`](stencil_platform::PlatformAdapter).

pub mod error;
pub mod format;
pub mod options;
pub mod service;
pub mod usage;

pub use error::{OperationError, Result};
pub use format::{format_snippet, format_template, is_tab_significant};
pub use options::{Destination, OperationKind, OperationOptions, Outcome, Stage};
pub use service::{CREATE_FILE_ACTION, CodeOperationService};
pub use usage::{StorageUsageTracker, UsageRecord, UsageTracker};
