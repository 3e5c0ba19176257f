//! Values registered by type, resolved by type.
//!
//! An [`Injector`] holds an ordered list of bindings from a [`TypeKey`] to a
//! shared [`Value`], and optionally a parent it falls back to. Values are
//! looked up by exact type, or for interfaces (trait objects marked with
//! [`Interface`]) also by scanning for bindings that declare the interface.
//!
//! Besides direct lookups, values can be consumed by filling the `#[inject]`
//! fields of a struct ([`Apply`]) or by calling a function with its
//! arguments resolved by type ([`Injector::invoke`]).
//!
//! ```
//! use std::sync::Arc;
//!
//! use inject::{InjectError, Injector, TypeKey};
//!
//! struct Config {
//!     retries: u32,
//! }
//!
//! let mut parent = Injector::new();
//! parent.map(Config { retries: 3 });
//!
//! let mut injector = Injector::with_parent(Arc::new(parent));
//! injector.map(String::from("worker"));
//!
//! let label = injector
//!     .invoke(|name: Arc<String>, config: Arc<Config>| format!("{}x{}", name, config.retries))
//!     .unwrap();
//! assert_eq!(label, "workerx3");
//!
//! assert_eq!(
//!     injector.get::<u8>().unwrap_err(),
//!     InjectError::NotFound(TypeKey::of::<u8>())
//! );
//! ```

mod apply;
mod binding;
mod error;
mod injector;
mod invoke;
mod key;
mod resolve;
mod value;

pub use apply::Apply;
pub use binding::{Binding, Capabilities, Implements};
pub use error::InjectError;
pub use injector::Injector;
pub use invoke::{IntoValues, Invocable};
pub use key::{Interface, TypeKey};
pub use resolve::Resolve;
pub use value::Value;

#[cfg(feature = "macros")]
pub use inject_macros::{interface, Implements, Inject};
