//! Typed event emitter for host-originated events.
//!
//! Listeners subscribe to one event kind. Emission snapshots the listener list
//! before invoking anything, so listeners may subscribe or unsubscribe from
//! inside a callback. A listener that returns an error or panics is logged and
//! skipped; the remaining listeners still run.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::error;

/// Error type listeners may return.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of a single listener invocation.
pub type ListenerResult = Result<(), ListenerError>;

/// An event that can be routed by kind.
pub trait Event: Send + Sync + 'static {
	type Kind: Copy + Eq + std::fmt::Debug + Send + Sync + 'static;

	fn kind(&self) -> Self::Kind;
}

/// Events raised by the host or by the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
	/// Top-level configuration keys changed.
	ConfigurationChanged { keys: Vec<String> },
	/// A new content snapshot was loaded.
	ContentReloaded { generation: u64 },
	PluginRegistered { id: String },
	PluginUnregistered { id: String },
}

/// Discriminant of [`HostEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEventKind {
	ConfigurationChanged,
	ContentReloaded,
	PluginRegistered,
	PluginUnregistered,
}

impl Event for HostEvent {
	type Kind = HostEventKind;

	fn kind(&self) -> HostEventKind {
		match self {
			Self::ConfigurationChanged { .. } => HostEventKind::ConfigurationChanged,
			Self::ContentReloaded { .. } => HostEventKind::ContentReloaded,
			Self::PluginRegistered { .. } => HostEventKind::PluginRegistered,
			Self::PluginUnregistered { .. } => HostEventKind::PluginUnregistered,
		}
	}
}

/// Handle returned by [`EventEmitter::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<E> = Arc<dyn Fn(&E) -> ListenerResult + Send + Sync>;

struct Subscription<E: Event> {
	id: ListenerId,
	kind: E::Kind,
	listener: Listener<E>,
}

/// Kind-routed listener list.
pub struct EventEmitter<E: Event> {
	next_id: AtomicU64,
	subscriptions: RwLock<Vec<Subscription<E>>>,
}

impl<E: Event> Default for EventEmitter<E> {
	fn default() -> Self {
		Self {
			next_id: AtomicU64::new(1),
			subscriptions: RwLock::new(Vec::new()),
		}
	}
}

impl<E: Event> std::fmt::Debug for EventEmitter<E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventEmitter")
			.field("listeners", &self.subscriptions.read().len())
			.finish()
	}
}

impl<E: Event> EventEmitter<E> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Subscribes `listener` to events of `kind`.
	pub fn on<F>(&self, kind: E::Kind, listener: F) -> ListenerId
	where
		F: Fn(&E) -> ListenerResult + Send + Sync + 'static,
	{
		let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
		self.subscriptions.write().push(Subscription {
			id,
			kind,
			listener: Arc::new(listener),
		});
		id
	}

	/// Removes a listener. Returns false if it was not subscribed.
	pub fn off(&self, id: ListenerId) -> bool {
		let mut subs = self.subscriptions.write();
		let before = subs.len();
		subs.retain(|s| s.id != id);
		before != subs.len()
	}

	/// Number of listeners subscribed to `kind`.
	pub fn listener_count(&self, kind: E::Kind) -> usize {
		self.subscriptions.read().iter().filter(|s| s.kind == kind).count()
	}

	/// Delivers `event` to every listener of its kind, in subscription order.
	///
	/// Returns the number of listeners that completed without error.
	pub fn emit(&self, event: &E) -> usize {
		let kind = event.kind();
		let listeners: Vec<(ListenerId, Listener<E>)> = self
			.subscriptions
			.read()
			.iter()
			.filter(|s| s.kind == kind)
			.map(|s| (s.id, s.listener.clone()))
			.collect();

		let mut delivered = 0;
		for (id, listener) in listeners {
			match std::panic::catch_unwind(AssertUnwindSafe(|| listener(event))) {
				Ok(Ok(())) => delivered += 1,
				Ok(Err(err)) => {
					error!(listener = id.0, ?kind, error = %err, "events.listener_failed");
				}
				Err(_) => {
					error!(listener = id.0, ?kind, "events.listener_panicked");
				}
			}
		}
		delivered
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::AtomicUsize;

	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn routes_by_kind() {
		let emitter = EventEmitter::<HostEvent>::new();
		let hits = Arc::new(AtomicUsize::new(0));
		let h = hits.clone();
		emitter.on(HostEventKind::ContentReloaded, move |event| {
			assert_eq!(event, &HostEvent::ContentReloaded { generation: 3 });
			h.fetch_add(1, Ordering::SeqCst);
			Ok(())
		});

		assert_eq!(emitter.emit(&HostEvent::PluginRegistered { id: "fmt".into() }), 0);
		assert_eq!(emitter.emit(&HostEvent::ContentReloaded { generation: 3 }), 1);
		assert_eq!(hits.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn failing_listeners_do_not_stop_others() {
		let emitter = EventEmitter::<HostEvent>::new();
		let hits = Arc::new(AtomicUsize::new(0));
		emitter.on(HostEventKind::ContentReloaded, |_| Err("boom".into()));
		emitter.on(HostEventKind::ContentReloaded, |_| panic!("listener bug"));
		let h = hits.clone();
		emitter.on(HostEventKind::ContentReloaded, move |_| {
			h.fetch_add(1, Ordering::SeqCst);
			Ok(())
		});

		assert_eq!(emitter.emit(&HostEvent::ContentReloaded { generation: 1 }), 1);
		assert_eq!(hits.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn off_unsubscribes() {
		let emitter = EventEmitter::<HostEvent>::new();
		let id = emitter.on(HostEventKind::PluginRegistered, |_| Ok(()));
		assert_eq!(emitter.listener_count(HostEventKind::PluginRegistered), 1);
		assert!(emitter.off(id));
		assert!(!emitter.off(id));
		assert_eq!(emitter.emit(&HostEvent::PluginRegistered { id: "x".into() }), 0);
	}
}
