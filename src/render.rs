//! Rendering math in an [`HtmlTree`].

use smallvec::SmallVec;
use tracing::{debug, instrument, warn};

use crate::adapters::{LatexAdapter, TypstAdapter};
use crate::arena_tree::{NodeEdge, NodeId};
use crate::classify::{classify, MathType};
use crate::convert::{LANGUAGE_MATH_CLASS, MATH_DISPLAY_CLASS, MATH_INLINE_CLASS};
use crate::error::RenderError;
use crate::html::parse_fragment;
use crate::nodes::{HtmlTree, NodeElement, NodeValue};
use crate::options::{LatexOptions, Plugins, RenderOptions};

/// Class of the element that replaces math that could not be rendered.
pub const MATH_ERROR_CLASS: &str = "math-error";

const MATH_ERROR_STYLE: &str = "color: red;";

/// What [`render_math`] did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderReport {
    /// Math nodes replaced by rendered markup, including fallbacks.
    pub rendered: usize,
    /// Typst math that rendered only on the LaTeX retry.
    pub fell_back: usize,
    /// Math nodes replaced by an error element.
    pub failed: usize,
}

#[derive(Debug, Clone, Copy)]
enum Splice {
    /// Replace this node with the rendered markup.
    Node(NodeId),
    /// Replace the math node's children.
    Children,
}

#[derive(Debug, Clone, Copy)]
struct MathTarget {
    node: NodeId,
    display_mode: bool,
    splice: Splice,
}

#[cfg(feature = "katex")]
static DEFAULT_LATEX: crate::plugins::katex::KatexAdapter = crate::plugins::katex::KatexAdapter;

#[cfg(feature = "typst")]
static DEFAULT_TYPST: crate::plugins::typst::TypstMathAdapter =
    crate::plugins::typst::TypstMathAdapter::new();

fn default_latex() -> Option<&'static dyn LatexAdapter> {
    #[cfg(feature = "katex")]
    let adapter = Some(&DEFAULT_LATEX as &dyn LatexAdapter);
    #[cfg(not(feature = "katex"))]
    let adapter = None;
    adapter
}

fn default_typst() -> Option<&'static dyn TypstAdapter> {
    #[cfg(feature = "typst")]
    let adapter = Some(&DEFAULT_TYPST as &dyn TypstAdapter);
    #[cfg(not(feature = "typst"))]
    let adapter = None;
    adapter
}

struct Backends<'p> {
    latex: Option<&'p dyn LatexAdapter>,
    typst: Option<&'p dyn TypstAdapter>,
    /// Why the Typst backend is unusable for this invocation, if it is.
    typst_unready: Option<String>,
}

impl Backends<'_> {
    fn typeset(
        &self,
        math_type: MathType,
        source: &str,
        display_mode: bool,
        latex: &LatexOptions,
    ) -> Result<HtmlTree, RenderError> {
        let html = match math_type {
            MathType::Latex => self
                .latex
                .ok_or(RenderError::MissingBackend(math_type))?
                .render(source, display_mode, latex)?,
            MathType::Typst => {
                if let Some(message) = &self.typst_unready {
                    return Err(RenderError::Typst {
                        message: message.clone(),
                    });
                }
                self.typst
                    .ok_or(RenderError::MissingBackend(math_type))?
                    .render(source, display_mode)?
            }
        };
        Ok(parse_fragment(&html)?)
    }
}

/// Render every math element of `tree` in place.
///
/// Math elements are `code.language-math` (display math; the enclosing
/// `pre` is replaced along with it) and elements classed `math-inline` or
/// `math-display` (their children are replaced). Their text is typeset by
/// the backend for its [`MathType`]: the one recorded in the element's
/// data, or else the one [`classify`] picks.
///
/// The Typst backend is readied once, before any math is visited. Failures
/// stay local to one math element: Typst math is retried as LaTeX when
/// [`RenderOptions::fallback_to_latex`] is set, and anything still failing
/// has its content replaced by a `span.math-error` holding the first error
/// message. The returned future always resolves.
#[instrument(skip_all, fields(prefer_typst = options.prefer_typst))]
pub async fn render_math(
    tree: &mut HtmlTree,
    options: &RenderOptions,
    plugins: &Plugins<'_>,
) -> RenderReport {
    let mut backends = Backends {
        latex: plugins.latex.or(default_latex()),
        typst: plugins.typst.or(default_typst()),
        typst_unready: None,
    };

    if let Some(typst) = backends.typst {
        if let Err(err) = typst.ensure_ready().await {
            warn!(error = %err, "typst backend failed to initialise");
            backends.typst_unready = Some(err.to_string());
        }
    }

    let mut report = RenderReport::default();
    for target in collect_math(tree) {
        if !tree.is_attached(target.node) {
            continue;
        }
        render_target(tree, target, options, &backends, &mut report);
    }

    debug!(?report, "rendered math");
    report
}

/// Math elements in document order, not descending into matches.
fn collect_math(tree: &HtmlTree) -> SmallVec<[MathTarget; 8]> {
    let mut targets = SmallVec::new();
    let mut inside: Option<NodeId> = None;

    for edge in tree.arena().traverse(tree.root()) {
        match edge {
            NodeEdge::Start(id) if inside.is_none() => {
                if let Some(target) = math_target(tree, id) {
                    targets.push(target);
                    inside = Some(id);
                }
            }
            NodeEdge::End(id) if inside == Some(id) => inside = None,
            _ => {}
        }
    }

    targets
}

fn math_target(tree: &HtmlTree, id: NodeId) -> Option<MathTarget> {
    let element = tree.element(id)?;

    if element.tag == "code" && element.has_class(LANGUAGE_MATH_CLASS) {
        let replaced = tree
            .arena()
            .parent(id)
            .filter(|&parent| tree.element(parent).is_some_and(|p| p.tag == "pre"))
            .unwrap_or(id);
        return Some(MathTarget {
            node: id,
            display_mode: true,
            splice: Splice::Node(replaced),
        });
    }

    let display = element.has_class(MATH_DISPLAY_CLASS);
    (display || element.has_class(MATH_INLINE_CLASS)).then_some(MathTarget {
        node: id,
        display_mode: display,
        splice: Splice::Children,
    })
}

fn render_target(
    tree: &mut HtmlTree,
    target: MathTarget,
    options: &RenderOptions,
    backends: &Backends<'_>,
    report: &mut RenderReport,
) {
    let source = tree.text_content(target.node);
    let math_type = tree
        .element(target.node)
        .and_then(|e| e.data.math_type)
        .unwrap_or_else(|| classify(&source));
    debug!(%math_type, display = target.display_mode, "rendering math");

    let latex = &options.latex;
    let rendered = match backends.typeset(math_type, &source, target.display_mode, latex) {
        Err(err) if math_type == MathType::Typst && options.fallback_to_latex => {
            warn!(error = %err, "typst math failed, retrying as latex");
            match backends.typeset(MathType::Latex, &source, target.display_mode, latex) {
                Ok(fragment) => {
                    report.fell_back += 1;
                    Ok(fragment)
                }
                Err(retry) => {
                    debug!(error = %retry, "latex retry failed too");
                    Err(err)
                }
            }
        }
        rendered => rendered,
    };

    match rendered {
        Ok(fragment) => {
            splice(tree, target, &fragment);
            report.rendered += 1;
        }
        Err(err) => {
            warn!(error = %err, %math_type, "replacing math with error element");
            show_error(tree, target.node, &err);
            report.failed += 1;
        }
    }
}

fn splice(tree: &mut HtmlTree, target: MathTarget, fragment: &HtmlTree) {
    let top_level = fragment
        .arena()
        .children(fragment.root())
        .collect::<SmallVec<[NodeId; 4]>>();

    match target.splice {
        Splice::Children => {
            tree.arena_mut().detach_children(target.node);
            for child in top_level {
                let copy = tree.graft(fragment, child);
                tree.arena_mut().append(target.node, copy);
            }
        }
        Splice::Node(replaced) => {
            for child in top_level {
                let copy = tree.graft(fragment, child);
                tree.arena_mut().insert_before(replaced, copy);
            }
            tree.arena_mut().detach(replaced);
        }
    }
}

fn show_error(tree: &mut HtmlTree, node: NodeId, err: &RenderError) {
    tree.arena_mut().detach_children(node);
    let span = NodeElement::new("span")
        .with_attribute("class", MATH_ERROR_CLASS)
        .with_attribute("style", MATH_ERROR_STYLE);
    let span = tree.append_new(node, NodeValue::Element(span));
    tree.append_new(span, NodeValue::Text(err.to_string()));
}
