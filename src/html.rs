//! HTML serialization of an [`HtmlTree`], and fragment parsing.

mod parse;

pub use parse::parse_fragment;

use std::fmt::{self, Write};

use crate::arena_tree::NodeEdge;
use crate::nodes::{is_void_element, HtmlTree, NodeElement, NodeValue};

/// Formats an HTML tree as HTML.
///
/// The root itself is not written, only its descendants. Elements carrying
/// per-node data are written without it.
pub fn format_html(tree: &HtmlTree, output: &mut dyn Write) -> fmt::Result {
    HtmlFormatter { output }.format(tree)
}

struct HtmlFormatter<'o> {
    output: &'o mut dyn Write,
}

impl HtmlFormatter<'_> {
    fn format(&mut self, tree: &HtmlTree) -> fmt::Result {
        for edge in tree.arena().traverse(tree.root()) {
            match edge {
                NodeEdge::Start(id) => match tree.get(id) {
                    NodeValue::Root => {}
                    NodeValue::Element(element) => self.open(element)?,
                    NodeValue::Text(text) => escape(self.output, text)?,
                    NodeValue::Comment(comment) => write!(self.output, "<!--{}-->", comment)?,
                },
                NodeEdge::End(id) => {
                    if let NodeValue::Element(element) = tree.get(id) {
                        if !is_void_element(&element.tag) {
                            write!(self.output, "</{}>", element.tag)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn open(&mut self, element: &NodeElement) -> fmt::Result {
        self.output.write_char('<')?;
        self.output.write_str(&element.tag)?;
        for (name, value) in &element.attributes {
            write!(self.output, " {}=\"", name)?;
            escape(self.output, value)?;
            self.output.write_char('"')?;
        }
        if is_void_element(&element.tag) {
            self.output.write_str(" />")
        } else {
            self.output.write_char('>')
        }
    }
}

const fn escape_table() -> [bool; 256] {
    let mut table = [false; 256];
    table[b'"' as usize] = true;
    table[b'&' as usize] = true;
    table[b'<' as usize] = true;
    table[b'>' as usize] = true;
    table
}

static NEEDS_ESCAPED: [bool; 256] = escape_table();

/// Writes `buffer` to `output`, escaping the characters special in both
/// text and double-quoted attribute values.
pub fn escape(output: &mut dyn Write, buffer: &str) -> fmt::Result {
    let bytes = buffer.as_bytes();
    let mut offset = 0;

    for (i, &byte) in bytes.iter().enumerate() {
        if !NEEDS_ESCAPED[byte as usize] {
            continue;
        }

        output.write_str(&buffer[offset..i])?;
        output.write_str(match byte {
            b'"' => "&quot;",
            b'&' => "&amp;",
            b'<' => "&lt;",
            _ => "&gt;",
        })?;
        offset = i + 1;
    }

    output.write_str(&buffer[offset..])
}
