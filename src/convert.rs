//! Lowering an annotated comrak tree to an [`HtmlTree`].

use comrak::nodes::AstNode;
use comrak::Options;
use smallvec::SmallVec;

use crate::arena_tree::NodeId;
use crate::classify::MathType;
use crate::error::ParseError;
use crate::html::parse_fragment;
use crate::markdown::{enable_math_syntax, math_literal, MathAnnotations};
use crate::nodes::HtmlTree;

/// Class marking an inline math element in the HTML tree.
pub const MATH_INLINE_CLASS: &str = "math-inline";
/// Class marking a display math element in the HTML tree.
pub const MATH_DISPLAY_CLASS: &str = "math-display";
/// Class marking a fenced math code block.
pub const LANGUAGE_MATH_CLASS: &str = "language-math";

const MATH_STYLE_ATTRIBUTE: &str = "data-math-style";

/// Render the comrak tree under `root` to an HTML tree the math renderer
/// understands.
///
/// comrak's `data-math-style` markers become `math-inline` and
/// `math-display` classes, fenced math stays a `code.language-math`, and
/// every math element whose text matches an annotated node carries that
/// node's [`MathType`] in its [`NodeData`](crate::nodes::NodeData).
pub fn markdown_to_tree<'a>(
    root: &'a AstNode<'a>,
    options: &Options,
    annotations: &MathAnnotations<'a>,
) -> Result<HtmlTree, ParseError> {
    let mut options = options.clone();
    enable_math_syntax(&mut options);

    let mut html = String::new();
    comrak::format_html(root, &options, &mut html)?;
    let mut tree = parse_fragment(&html)?;

    let math_elements = normalize_math_markup(&mut tree);
    let expected = annotations
        .iter()
        .filter_map(|(node, math_type)| {
            math_literal(node).map(|(literal, _)| (literal, math_type))
        })
        .collect::<Vec<_>>();
    propagate_math_types(&mut tree, &math_elements, &expected);

    Ok(tree)
}

/// Rewrite comrak's math markup into class-based markup, returning the math
/// elements in document order.
fn normalize_math_markup(tree: &mut HtmlTree) -> SmallVec<[NodeId; 8]> {
    let candidates = tree
        .arena()
        .descendants(tree.root())
        .collect::<Vec<_>>();

    let mut math_elements = SmallVec::new();
    for id in candidates {
        let Some(element) = tree.element_mut(id) else {
            continue;
        };
        let fenced = element.tag == "code" && element.has_class(LANGUAGE_MATH_CLASS);
        let Some(style) = element.remove_attribute(MATH_STYLE_ATTRIBUTE) else {
            if fenced {
                math_elements.push(id);
            }
            continue;
        };
        if !fenced {
            element.add_class(if style == "display" {
                MATH_DISPLAY_CLASS
            } else {
                MATH_INLINE_CLASS
            });
        }
        math_elements.push(id);
    }
    math_elements
}

/// Tag each math element with the type of the next annotated node whose
/// literal equals the element's text. Elements with no such node stay
/// untagged.
fn propagate_math_types(
    tree: &mut HtmlTree,
    math_elements: &[NodeId],
    expected: &[(String, MathType)],
) {
    let mut next = 0;
    for &id in math_elements {
        let text = tree.text_content(id);
        let Some(offset) = expected[next..]
            .iter()
            .position(|(literal, _)| *literal == text)
        else {
            tracing::debug!(?id, "math element has no annotated counterpart");
            continue;
        };
        let math_type = expected[next + offset].1;
        next += offset + 1;
        if let Some(element) = tree.element_mut(id) {
            element.data.math_type = Some(math_type);
        }
    }
}
