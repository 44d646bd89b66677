//! Correlation id generation.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Generates `"{unix_millis}-{counter}"` ids.
///
/// The counter is per generator and strictly increasing, so ids stay unique
/// within one bridge even when the clock stalls or goes backwards.
#[derive(Debug, Default)]
pub struct CorrelationIdGen(AtomicU64);

impl CorrelationIdGen {
	/// Creates a new generator with its counter at 0.
	#[must_use]
	pub const fn new() -> Self {
		Self(AtomicU64::new(0))
	}

	/// Generates the next unique id.
	#[allow(clippy::should_implement_trait, reason = "convention")]
	pub fn next(&self) -> String {
		let counter = self.0.fetch_add(1, Ordering::Relaxed);
		format!("{}-{counter}", Utc::now().timestamp_millis())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ids_are_unique_and_counted() {
		let ids = CorrelationIdGen::new();
		let a = ids.next();
		let b = ids.next();
		assert_ne!(a, b);
		assert!(a.ends_with("-0"));
		assert!(b.ends_with("-1"));
		let millis: i64 = a.split('-').next().unwrap().parse().unwrap();
		assert!(millis > 0);
	}
}
