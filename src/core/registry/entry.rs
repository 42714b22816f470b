//! Entry contract
//!
//! This module defines the trait that adapters implement to be stored in the
//! [`Registry`](super::Registry) and driven through the boot lifecycle.

use crate::core::lifecycle::CancelContext;
use crate::domain::Result;
use async_trait::async_trait;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A named, typed component with a bootstrap/interrupt lifecycle
///
/// `(kind, name)` identifies an entry inside a registry. Entries are shared
/// as `Arc<dyn Entry>`, so implementations use interior mutability for any
/// state they change during bootstrap.
#[async_trait]
pub trait Entry: Send + Sync {
    /// Unique name within the entry's kind
    fn name(&self) -> &str;

    /// Category tag, e.g. `CertEntry` or `GinEntry`
    fn kind(&self) -> &str;

    /// Human readable description
    fn describe(&self) -> String;

    /// Acquires resources and starts the entry
    ///
    /// # Errors
    ///
    /// Returns an error if the entry's resources can't be initialized. The
    /// boot sequence treats this as fatal.
    async fn bootstrap(&self, ctx: &CancelContext) -> Result<()>;

    /// Releases resources during shutdown
    async fn interrupt(&self, ctx: &CancelContext);

    /// Marks the entry returned by
    /// [`Registry::get_entry_or_default`](super::Registry::get_entry_or_default)
    /// when no exact name matches. At most one entry per kind should return
    /// `true`.
    fn is_default(&self) -> bool {
        false
    }

    /// Downcast to Any for adapter-specific access
    fn as_any(&self) -> &dyn Any;
}

impl fmt::Debug for dyn Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("kind", &self.kind())
            .field("name", &self.name())
            .finish()
    }
}

/// Downcasts a shared entry to its concrete type
///
/// ```
/// # use rkboot::core::registry::{downcast_entry, Entry};
/// # use rkboot::core::app_info::AppInfoEntry;
/// # use rkboot::config::AppInfoConfig;
/// # use std::sync::Arc;
/// let entry: Arc<dyn Entry> = Arc::new(AppInfoEntry::new(AppInfoConfig::default()));
/// let app = downcast_entry::<AppInfoEntry>(&entry).unwrap();
/// assert_eq!(app.config().name, "rkboot");
/// ```
pub fn downcast_entry<T: 'static>(entry: &Arc<dyn Entry>) -> Option<&T> {
    entry.as_any().downcast_ref::<T>()
}
