//! # fstash Core
//!
//! A local file stash: snapshots of directory trees stored by name.
//!
//! A stash is a plain copy of a directory's files kept under
//! `<root>/<XX>/<XX>/<XX>/<XX>/<name>`, where the four hex segments are a
//! hash of the name that keeps any one directory level small. Stashes are
//! restored by copying them back out, optionally rendering some files as
//! templates on the way.
//!
//! ## Features
//!
//! - Name-hashed sharded layout
//! - Exact byte copies of regular files (empty directories are dropped)
//! - Template rendering on expand, keyed by file base name
//! - Listing and deletion
//!
//! ## Example
//!
//! ```no_run
//! use fstash_core::{StashStore, TemplateData};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = StashStore::open("/home/me/.fstash")?;
//!
//! // Snapshot a project skeleton
//! store.create("web-app", Path::new("./skeleton"))?;
//!
//! // Restore it elsewhere, rendering `README.md` as a template
//! let mut data = TemplateData::new();
//! data.insert("README", [("AppName".to_string(), "demo".to_string())].into());
//! store.expand("web-app", Path::new("./demo"), &data)?;
//!
//! for name in store.list()? {
//!     println!("{}", name);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod key;
mod manifest;
mod name;
mod replicate;
mod store;
mod template;

pub use error::{Error, Result};
pub use key::{KEY_SIZE, LocationKey};
pub use manifest::{Manifest, ROOT_DIR};
pub use name::{StashName, is_valid_name};
pub use replicate::{CopyStats, replicate, replicate_with};
pub use store::{STASH_DEPTH, StashStore, StashSummary, list_depth};
pub use template::{TemplateData, TemplateRenderer, TemplateVars, template_key};
