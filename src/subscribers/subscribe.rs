//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for observing a workshop run. Each
//! subscriber is driven by a dedicated worker loop fed by a bounded queue owned
//! by the [`SubscriberSet`](crate::subscribers::SubscriberSet).
//!
//! ## Contract
//! - Implementations may be slow; they block neither the protocol nor other subscribers.
//! - Each subscriber declares its queue capacity via [`Subscribe::queue_capacity`].
//!   On overflow, events for that subscriber are dropped and a
//!   `SubscriberOverflow` event is published.
//!
//! ## Example
//! ```rust
//! use santa_workshop::{Event, EventKind, Subscribe};
//!
//! struct Hitches;
//!
//! #[async_trait::async_trait]
//! impl Subscribe for Hitches {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::ActionLogged {
//!             // inspect ev.action ...
//!         }
//!     }
//!     fn name(&self) -> &'static str { "hitches" }
//! }
//! ```

use crate::events::Event;
use async_trait::async_trait;

/// Contract for event subscribers.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for overflow/panic reports).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
