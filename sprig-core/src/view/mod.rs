//! View Builder
//!
//! Functions view code calls to build element trees. Children are
//! [`Content`]: literal text, nested nodes, or signals. A signal child gets
//! a text node with a [`Binding`](crate::reactive::Binding) installed, so
//! the tree stays current without any explicit subscription.
//!
//! ```rust
//! use sprig_core::reactive::signal;
//! use sprig_core::view::{attrs, div, h1, p};
//!
//! let counter = signal(0);
//! let app = div(Some(attrs([("class", "App")])))
//!     .child(h1(None).child(&counter).build()?)
//!     .child(p(None).child("text").build()?)
//!     .build()?;
//!
//! counter.write(1)?;
//! assert_eq!(app.to_html(), "<div class=\"App\"><h1>1</h1><p>text</p></div>");
//! # Ok::<(), sprig_core::SprigError>(())
//! ```

mod content;
mod element;

pub use content::{Content, ReactiveText};
pub use element::{attribute, attrs, div, element, h1, h2, p, span, Attributed, Attributes, Builder, Element};
