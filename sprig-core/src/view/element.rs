//! Element construction.
//!
//! `element(tag)` is a constructor parametrized by content, and
//! `attribute(element(tag))` wraps it so attributes can be supplied first:
//!
//! ```rust
//! use sprig_core::view::{attribute, attrs, element};
//!
//! let section = attribute(element("section"))
//!     .with(Some(attrs([("class", "hud")])))
//!     .child("score")
//!     .build()?;
//!
//! assert_eq!(section.to_html(), "<section class=\"hud\">score</section>");
//! # Ok::<(), sprig_core::SprigError>(())
//! ```

use std::rc::Rc;

use indexmap::IndexMap;
use tracing::debug;

use super::Content;
use crate::dom::{is_valid_name, Node};
use crate::error::{Result, SprigError};

/// Attribute name to value. Keys are unique; order carries no meaning.
pub type Attributes = IndexMap<String, String>;

/// Build an [`Attributes`] map from pairs.
pub fn attrs<K, V, I>(pairs: I) -> Attributes
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect()
}

/// A constructor for elements with one tag.
#[derive(Debug, Clone)]
pub struct Element {
    tag: Rc<str>,
}

/// Create the constructor for `tag`.
pub fn element(tag: impl Into<String>) -> Element {
    let tag: String = tag.into();
    Element {
        tag: Rc::from(tag),
    }
}

impl Element {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Create the element and append `children` in order.
    ///
    /// Fails with [`SprigError::InvalidTagName`] before any child is
    /// resolved when the tag is empty or contains whitespace, quotes,
    /// `>`, `/`, or `=`.
    pub fn build<I>(&self, children: I) -> Result<Node>
    where
        I: IntoIterator<Item = Content>,
    {
        if !is_valid_name(&self.tag) {
            return Err(SprigError::InvalidTagName {
                tag: self.tag.to_string(),
            });
        }
        let node = Node::element(&*self.tag);
        for content in children {
            let child = content.into_node()?;
            node.append_child(&child)?;
        }
        debug!(tag = %self.tag, children = node.child_count(), "built element");
        Ok(node)
    }
}

/// An element constructor that takes attributes before content.
#[derive(Debug, Clone)]
pub struct Attributed {
    element: Element,
}

/// Wrap a constructor so attributes are applied to what it builds.
pub fn attribute(element: Element) -> Attributed {
    Attributed { element }
}

impl Attributed {
    /// Fix the attributes; `None` means the element gets none.
    pub fn with(&self, attributes: Option<Attributes>) -> Builder {
        Builder {
            element: self.element.clone(),
            attributes,
            children: Vec::new(),
        }
    }
}

/// Collects children for one element, then builds it.
#[derive(Debug)]
#[must_use = "call `build` to create the element"]
pub struct Builder {
    element: Element,
    attributes: Option<Attributes>,
    children: Vec<Content>,
}

impl Builder {
    pub fn child(mut self, content: impl Into<Content>) -> Self {
        self.children.push(content.into());
        self
    }

    pub fn children<I, C>(mut self, contents: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Content>,
    {
        self.children.extend(contents.into_iter().map(Into::into));
        self
    }

    /// Build the element, append the children in the order given, then set
    /// each attribute.
    pub fn build(self) -> Result<Node> {
        let node = self.element.build(self.children)?;
        if let Some(attributes) = self.attributes {
            for (name, value) in &attributes {
                node.set_attribute(name, value)?;
            }
        }
        Ok(node)
    }
}

macro_rules! tag_shorthands {
    ($($name:ident),* $(,)?) => {
        $(
            #[doc = concat!("Start a `<", stringify!($name), ">` with optional attributes.")]
            pub fn $name(attributes: Option<Attributes>) -> Builder {
                attribute(element(stringify!($name))).with(attributes)
            }
        )*
    };
}

tag_shorthands!(div, h1, h2, p, span);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::signal;

    #[test]
    fn element_appends_children_in_order() {
        let list = element("ul")
            .build([
                Content::from(element("li").build([Content::from("a")]).unwrap()),
                Content::from(element("li").build([Content::from("b")]).unwrap()),
            ])
            .unwrap();

        assert_eq!(list.to_html(), "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn no_attributes_means_bare_element() {
        let heading = h1(None).child("title").build().unwrap();
        assert!(heading.attributes().is_empty());
        assert_eq!(heading.to_html(), "<h1>title</h1>");
    }

    #[test]
    fn attributes_are_applied() {
        let node = div(Some(attrs([("class", "App"), ("id", "root")])))
            .build()
            .unwrap();

        assert_eq!(node.attribute("class").as_deref(), Some("App"));
        assert_eq!(node.attribute("id").as_deref(), Some("root"));
    }

    #[test]
    fn invalid_attribute_fails_build() {
        let err = span(Some(attrs([("bad name", "x")]))).build().unwrap_err();
        assert!(matches!(err, SprigError::InvalidAttributeName { .. }));
    }

    #[test]
    fn invalid_tag_fails_build() {
        for bad in ["", "a b", "x>", "h1/"] {
            let err = element(bad).build([Content::from("x")]).unwrap_err();
            assert_eq!(err, SprigError::InvalidTagName { tag: bad.to_string() });
        }

        let err = attribute(element("my tag")).with(None).build().unwrap_err();
        assert!(matches!(err, SprigError::InvalidTagName { .. }));
    }

    #[test]
    fn invalid_tag_installs_no_binding() {
        let count = signal(0);
        assert!(element("").build([Content::from(&count)]).is_err());
        assert_eq!(count.subscriber_count(), 0);
    }

    #[test]
    fn mixed_children() {
        let count = signal(0);
        let node = p(None)
            .child("count: ")
            .child(&count)
            .children(["!", "?"])
            .build()
            .unwrap();

        assert_eq!(node.child_count(), 4);
        assert_eq!(node.text_content(), "count: 0!?");

        count.write(3).unwrap();
        assert_eq!(node.text_content(), "count: 3!?");
    }

    #[test]
    fn constructors_are_reusable() {
        let item = attribute(element("li"));
        let a = item.with(None).child("a").build().unwrap();
        let b = item.with(None).child("b").build().unwrap();

        assert!(!a.ptr_eq(&b));
        assert_eq!(item.with(None).build().unwrap().tag(), Some("li"));
    }
}
