//! Diagnostic tree rendering.
//!
//! Types opt in through [`Describable`]; the default methods assemble a
//! [`DebugItem`] tree which renders through `Display`:
//!
//! ```text
//! <AttributedString
//!   <Shard value="Hello" />
//! >
//! ```

use std::fmt;

/// One node of a diagnostic tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DebugItem {
    pub name: String,
    pub value: String,
    pub children: Vec<DebugItem>,
    pub props: Vec<DebugItem>,
}

impl DebugItem {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        children: Vec<DebugItem>,
        props: Vec<DebugItem>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            children,
            props,
        }
    }

    /// Name/value pair without children or props.
    pub fn leaf(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value, Vec::new(), Vec::new())
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        write!(f, "{indent}<{}", self.name)?;
        if !self.value.is_empty() {
            write!(f, " value={:?}", self.value)?;
        }
        for prop in &self.props {
            write!(f, " {}={:?}", prop.name, prop.value)?;
        }
        if self.children.is_empty() {
            return writeln!(f, " />");
        }
        writeln!(f)?;
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        writeln!(f, "{indent}>")
    }
}

impl fmt::Display for DebugItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// Capability for producing a diagnostic tree.
pub trait Describable {
    fn debug_name(&self) -> String;

    fn debug_value(&self) -> String {
        String::new()
    }

    fn debug_children(&self) -> Vec<DebugItem> {
        Vec::new()
    }

    fn debug_props(&self) -> Vec<DebugItem> {
        Vec::new()
    }

    fn debug_item(&self) -> DebugItem {
        DebugItem::new(
            self.debug_name(),
            self.debug_value(),
            self.debug_children(),
            self.debug_props(),
        )
    }

    fn describe(&self) -> String {
        self.debug_item().to_string()
    }
}
