//! Compound CSS selector composition
//!
//! A `QuerySelector` describes one element by tag and class set, optionally
//! followed by a chain of descendant tags, and renders it as the selector
//! string handed to the DOM engine.

use std::fmt;

/// Structured description of an element query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySelector {
    /// Tag name of the qualified element
    pub tag: String,

    /// Class tokens, all required on the same element, in declaration order
    pub classes: Vec<String>,

    /// Descendant tag names, one selector step each
    pub descendants: Vec<String>,
}

impl QuerySelector {
    /// Creates a selector for a bare tag
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: Vec::new(),
            descendants: Vec::new(),
        }
    }

    /// Adds class tokens to the base element
    pub fn with_classes(mut self, classes: &[&str]) -> Self {
        self.classes
            .extend(classes.iter().map(|class| class.to_string()));
        self
    }

    /// Appends descendant steps after the base element
    pub fn with_descendants(mut self, tags: &[&str]) -> Self {
        self.descendants.extend(tags.iter().map(|tag| tag.to_string()));
        self
    }

    /// Renders the selector string
    ///
    /// # Examples
    ///
    /// ```
    /// use hourse_harvest::QuerySelector;
    ///
    /// let selector = QuerySelector::new("a")
    ///     .with_classes(&["x"])
    ///     .with_descendants(&["span"]);
    /// assert_eq!(selector.build(), "a.x span");
    /// ```
    pub fn build(&self) -> String {
        let mut out = self.tag.clone();

        for class in &self.classes {
            out.push('.');
            out.push_str(class);
        }

        for tag in &self.descendants {
            out.push(' ');
            out.push_str(tag);
        }

        out
    }
}

impl fmt::Display for QuerySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}
