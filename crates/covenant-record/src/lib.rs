//! # covenant-record
//!
//! Structured access to loosely-typed transaction documents.
//!
//! Decisions and financial events are attached to an existing document that
//! has no fixed schema. This crate addresses fields inside it with a small
//! path language and applies changes copy-on-write, so the same document can
//! flow through several pipeline stages without aliasing.
//!
//! ```rust,ignore
//! use serde_json::json;
//! use covenant_record::{get, set};
//!
//! let doc = set(&json!({}), "parties[2].name", json!("Acme"));
//! assert_eq!(get(&doc, "parties[2].name"), Some(&json!("Acme")));
//! ```

pub mod accessor;
pub mod path;

pub use accessor::{get, remove, set, MAX_INDEX};
pub use path::{FieldPath, Segment};
