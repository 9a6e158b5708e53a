pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::cli::{DirTemplateSource, HttpTemplateSource, LocalStorage};
pub use core::engine::{DocumentDraft, DraftEngine};
pub use core::registry::DocumentRegistry;
pub use utils::error::{DocError, Result};
