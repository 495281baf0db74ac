//! Project registry, virtual file store and synchronizer.
//!
//! Files are kept as records keyed by `(project, path)` and only reach the
//! real filesystem when a project is synchronized:
//!
//! ```text
//! VirtualFileStore ──scan──▶ Synchronizer ──write──▶ <base_path>/<path>
//!                                 ▲
//!                 ProjectRegistry ┘ (name -> base_path)
//! ```

pub mod files;
pub mod path;
pub mod registry;
pub mod sync;

pub use files::VirtualFileStore;
pub use path::{ProjectPath, ProjectPathError};
pub use registry::ProjectRegistry;
pub use sync::Synchronizer;
