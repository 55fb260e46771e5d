//! Math annotation for comrak markdown trees.
//!
//! comrak parses `$…$`, `$$…$$`, `` $`…`$ `` and ```` ```math ```` blocks once
//! its math extensions are on. [`annotate`] records the syntax of every math
//! node it finds in a [`MathAnnotations`] side table, leaving the tree as it
//! was: serializing the tree back to markdown reproduces the delimiters
//! byte for byte.

use comrak::nodes::{AstNode, NodeValue};
use comrak::{Arena, Options};
use rustc_hash::FxHashMap;

use crate::classify::{classify, MathType};

/// Turn on the math grammar: dollar delimiters and `` $`…`$ `` code math.
/// ```` ```math ```` fences are recognised either way.
pub fn enable_math_syntax(options: &mut Options) {
    options.extension.math_dollars = true;
    options.extension.math_code = true;
}

/// The math source held by `node`, and whether it is display math, if the
/// node is math-bearing.
pub fn math_literal<'a>(node: &'a AstNode<'a>) -> Option<(String, bool)> {
    match &node.data().value {
        NodeValue::Math(math) => Some((math.literal.to_string(), math.display_math)),
        NodeValue::CodeBlock(block) if is_math_info(&block.info) => {
            Some((block.literal.to_string(), true))
        }
        _ => None,
    }
}

fn is_math_info(info: &str) -> bool {
    info.split_ascii_whitespace().next() == Some("math")
}

/// Math-bearing nodes of one comrak tree and the syntax each is written in.
#[derive(Default)]
pub struct MathAnnotations<'a> {
    entries: Vec<(&'a AstNode<'a>, MathType)>,
    index: FxHashMap<*const AstNode<'a>, usize>,
}

impl<'a> MathAnnotations<'a> {
    fn insert(&mut self, node: &'a AstNode<'a>, math_type: MathType) {
        let key = node as *const AstNode<'a>;
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = math_type,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push((node, math_type));
            }
        }
    }

    /// The syntax recorded for `node`, if it is an annotated math node.
    pub fn get(&self, node: &'a AstNode<'a>) -> Option<MathType> {
        self.index
            .get(&(node as *const AstNode<'a>))
            .map(|&i| self.entries[i].1)
    }

    /// Number of annotated nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no math was found.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Annotated nodes in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a AstNode<'a>, MathType)> + '_ {
        self.entries.iter().copied()
    }
}

impl std::fmt::Debug for MathAnnotations<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(_, math_type)| math_type))
            .finish()
    }
}

/// Classify every math node under `root`.
///
/// Node text and positions are untouched; this never fails.
pub fn annotate<'a>(root: &'a AstNode<'a>) -> MathAnnotations<'a> {
    let mut annotations = MathAnnotations::default();
    for node in root.descendants() {
        if let Some((literal, _)) = math_literal(node) {
            annotations.insert(node, classify(&literal));
        }
    }
    tracing::debug!(count = annotations.len(), "annotated math nodes");
    annotations
}

/// Parse `text` with the math grammar enabled and annotate the result.
///
/// `options` is copied; the caller's value is left as it was.
pub fn parse_document<'a>(
    arena: &'a Arena<'a>,
    text: &str,
    options: &Options,
) -> (&'a AstNode<'a>, MathAnnotations<'a>) {
    let mut options = options.clone();
    enable_math_syntax(&mut options);
    let root = comrak::parse_document(arena, text, &options);
    (root, annotate(root))
}
