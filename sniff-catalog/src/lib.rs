//! # sniff-catalog
//!
//! Static data describing what stacksniff looks for.
//!
//! The catalog answers three questions:
//!
//! - **Languages**: which files indicate a language ecosystem and which of its
//!   package managers is in use
//! - **Services**: which package names, declared in a manifest of a given
//!   language, confirm that a third-party service is used
//! - **Technologies**: which files indicate a CI system, a hosting provider or
//!   an infrastructure tool, and how to build a URL for it
//!
//! ## Example
//!
//! ```rust
//! use sniff_catalog::Catalog;
//!
//! let catalog = Catalog::bundled().unwrap();
//!
//! let stripe = catalog.service("stripe").unwrap();
//! assert!(stripe.confirms("ruby", "stripe"));
//! assert_eq!(catalog.display_name("github-actions"), "GitHub Actions");
//! ```

pub mod catalog;
pub mod error;
pub mod model;

pub use catalog::{
    Catalog, LANGUAGES_FILE, REPO_KEY, SERVICES_FILE, TECHNOLOGIES_FILE, title_case,
};
pub use error::CatalogError;
pub use model::{Language, PackageManager, Service, Technology};
