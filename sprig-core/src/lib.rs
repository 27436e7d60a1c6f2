//! Sprig Core
//!
//! This crate provides the core runtime for the Sprig view layer.
//! It implements:
//!
//! - Reactive primitives (signals and the bindings that read them)
//! - A retained document model that views are built into and mounted on
//! - An element builder that turns signals into self-updating text nodes
//! - A host-driven frame driver that writes signals once per tick
//!
//! Everything runs on one thread, synchronously: a signal write re-runs
//! every binding that read the signal before the write returns.
//!
//! # Architecture
//!
//! - `reactive`: signals, bindings, and implicit dependency tracking
//! - `dom`: nodes, the document, and mounting
//! - `view`: element and attribute builders
//! - `driver`: the per-frame tick loop
//!
//! # Example
//!
//! ```rust
//! use sprig_core::dom::Document;
//! use sprig_core::driver::{seconds_label, FrameDriver};
//! use sprig_core::reactive::signal;
//! use sprig_core::view::{attrs, div, h1};
//!
//! let counter = signal(String::new());
//! let app = div(Some(attrs([("class", "App")])))
//!     .child(h1(None).child(&counter).build()?)
//!     .build()?;
//!
//! let document = Document::new();
//! document.mount_to_body(&app)?;
//!
//! let mut driver = FrameDriver::new(|time| counter.write(seconds_label(time.timestamp_ms)));
//! driver.frame(1500.0)?;
//!
//! assert_eq!(app.text_content(), "1.50");
//! # Ok::<(), sprig_core::SprigError>(())
//! ```

pub mod dom;
pub mod driver;
pub mod error;
pub mod reactive;
pub mod view;

pub use error::{Result, SprigError};
