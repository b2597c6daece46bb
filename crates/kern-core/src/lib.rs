//! # kern-core
//!
//! Building blocks shared by the kern crates.
//!
//! ## Modules
//!
//! - `check` - `check!` and the debug-only `dcheck!` family
//! - `mutex` - `Mutex` capability trait, `ReentrantMutex`, `MutexFactory`
//! - `guarded` - `Guarded<T>`, data behind a factory-created mutex
//! - `env` - Environment variable helpers

#[macro_use]
pub mod check;
pub mod env;
pub mod guarded;
pub mod mutex;

// Re-exports for convenience
pub use check::DCHECK_ENABLED;
pub use env::{env_get_bool, env_get_path, env_get_str};
pub use guarded::{Guarded, GuardedRef};
pub use mutex::{Mutex, MutexCtor, MutexFactory, ReentrantMutex, ScopedLock};
