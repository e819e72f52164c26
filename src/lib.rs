//! A lexicographically sortable unique ID generator.
//!
//! Every ID is three segments joined together: the current time, an atomic counter and a
//! static identity of the issuing server or process. Byte-wise comparison of two IDs from the
//! same generator agrees with the order they were generated in, without any coordination
//! between servers.
//!
//! ## Quickstart
//!
//! Add the following to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! lexid = "0.1"
//! ```
//!
//! Use the process-wide default generator like this:
//!
//! ```
//! let first = lexid::id();
//! let second = lexid::id();
//! assert!(first < second);
//!
//! let segments = lexid::parse(&second, false).unwrap();
//! assert_eq!(segments.identity, "0");
//! ```
//!
//! ## Own generator
//!
//! Give every server or process its own identity:
//! ```
//! use lexid::Generator;
//!
//! let generator = Generator::builder()
//!     .identity("~web1")
//!     .epoch(lexid::offset_2020())
//!     .finalize()
//!     .unwrap();
//! let id = generator.nano_id();
//! assert!(id.ends_with("~web1"));
//! ```
//!
//! ## Concurrent use
//!
//! Generator is thread-safe. Share it with an `Arc`:
//! ```
//! use lexid::Generator;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let generator = Arc::new(Generator::new("~1").unwrap());
//!
//! let mut children = Vec::new();
//! for _ in 0..10 {
//!     let generator = Arc::clone(&generator);
//!     children.push(thread::spawn(move || {
//!         println!("{}", generator.id());
//!     }));
//! }
//!
//! for child in children {
//!     child.join().unwrap();
//! }
//! ```

mod builder;
mod clock;
pub mod codec;
mod error;
mod generator;
mod global;
mod segments;

pub use builder::*;
pub use error::*;
pub use generator::*;
pub use global::*;
pub use segments::*;
