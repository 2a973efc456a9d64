//! A configuration-language parser for a TOML-like grammar.
//!
//! [`parse`] turns a complete in-memory UTF-8 document into a tree of
//! tables, arrays, and key/value pairs, or fails with a single
//! line-located [`Error`]. Values keep their raw text and are decoded on
//! demand by the typed accessors on [`KeyValue`], so the caller — not the
//! document — picks the target type, and keys that are never read are never
//! decoded. Strings borrow from the input wherever escape normalization
//! permits.
//!
//! # Examples
//!
//! ```
//! let doc = toml_tree::parse(
//!     r#"
//! title = "example"
//!
//! [server]
//! host = "10.0.0.1"
//! port = 8080
//! started = 2024-03-01T07:32:00Z
//!
//! [[server.routes]]
//! path = "/api"
//! "#,
//! )?;
//!
//! let server = doc.get_table("server").unwrap();
//! assert_eq!(server.get_pair("host").unwrap().as_string()?, "10.0.0.1");
//! assert_eq!(server.get_pair("port").unwrap().as_integer()?, 8080);
//!
//! let routes = server.get_array("routes").unwrap();
//! assert_eq!(routes.len(), 1);
//! assert_eq!(
//!     routes.table(0).unwrap().get_pair("path").unwrap().as_string()?,
//!     "/api"
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod array;
mod error;
mod parser;
mod scanner;
mod str;
mod table;
mod time;
mod unicode;
pub mod value;

pub use array::{Array, ArrayKind};
pub use error::{ConvError, Error, ErrorKind};
pub use parser::parse;
pub use str::Str;
pub use table::{Entry, KeyValue, Table};
pub use time::{Date, Datetime, Offset, Time};
pub use value::ValueType;
