//! Grovedoc: documentation model builder for mixed Groovy and Java trees.
//!
//! Each source file goes through a front end selected by its name, becomes
//! a set of class documents, and is folded into one [`RootDoc`] that is
//! resolved at the end of the batch.
//!
//! ```ignore
//! let mut builder = RootDocBuilder::new(GrovedocConfig::default());
//! let mut diagnostics = Diagnostics::new();
//! builder.build_tree(&["pkg/a/Foo.java", "pkg/a/package.html"], &mut diagnostics)?;
//! let root = builder.into_root_doc();
//! ```

// Pipeline types - re-exported from grovedoc-core
pub use grovedoc_core::diagnostics::{Diagnostic, DiagnosticCategory, Diagnostics};
pub use grovedoc_core::options::{LinkArgument, Properties};
pub use grovedoc_core::root::{CollisionPolicy, RootDoc};

// Batch driver and front door
pub mod builder;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod files;
pub mod output;

pub use builder::RootDocBuilder;
pub use config::{Config, GrovedocConfig, SearchPolicy};
pub use error::GrovedocError;
