//! Detect and render math written in LaTeX or Typst.
//!
//! Markdown goes through [comrak](https://docs.rs/comrak) with its math
//! syntax enabled. Every math node is classified as LaTeX or Typst, the
//! document is lowered to an [`HtmlTree`], and [`render_math`] replaces each
//! math element with markup from the matching backend.
//!
//! ```rust,no_run
//! # async fn run() {
//! use typtex::{markdown_to_html, Options};
//!
//! let html = markdown_to_html("Sum: $sum_(i=1)^n i$, fraction: $\\frac{1}{2}$\n", &Options::default()).await;
//! assert!(html.contains("katex"));
//! # }
//! ```
//!
//! Raw HTML whose math is already marked up with `math-inline`,
//! `math-display` or `language-math` classes goes straight to the renderer:
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), typtex::ParseError> {
//! use typtex::{html_to_html, Plugins, RenderOptions};
//!
//! let html = html_to_html(
//!     r#"<p><span class="math-inline">x^2</span></p>"#,
//!     &RenderOptions::default(),
//!     &Plugins::default(),
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```
//!
//! The pieces are usable on their own: [`classify()`](classify::classify)
//! for the heuristic, [`markdown::annotate`] for comrak trees,
//! [`parse_fragment`] and [`format_html`] for HTML.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(
    missing_docs,
    missing_debug_implementations,
    trivial_numeric_casts,
    unused_import_braces
)]

pub mod adapters;
pub mod arena_tree;
pub mod classify;
mod convert;
mod entity;
mod error;
pub mod html;
pub mod markdown;
pub mod nodes;
mod options;
pub mod plugins;
mod render;

pub use crate::classify::MathType;
pub use crate::convert::{
    markdown_to_tree, LANGUAGE_MATH_CLASS, MATH_DISPLAY_CLASS, MATH_INLINE_CLASS,
};
pub use crate::error::{ParseError, RenderError};
pub use crate::html::{format_html, parse_fragment};
pub use crate::nodes::{HtmlTree, NodeData, NodeElement, NodeValue};
pub use crate::options::{LatexOptions, Options, OutputType, Plugins, RenderOptions, Strict};
pub use crate::render::{render_math, RenderReport, MATH_ERROR_CLASS};
pub use comrak::Arena;

/// Render markdown to HTML, typesetting its math with the built-in
/// backends.
///
/// See the documentation of the crate root for an example.
pub async fn markdown_to_html(md: &str, options: &Options<'_>) -> String {
    markdown_to_html_with_plugins(md, options, &Plugins::default()).await
}

/// Render markdown to HTML, typesetting its math with `plugins`.
pub async fn markdown_to_html_with_plugins(
    md: &str,
    options: &Options<'_>,
    plugins: &Plugins<'_>,
) -> String {
    let mut tree = match markdown_to_html_tree(md, &options.markdown) {
        Ok(tree) => tree,
        Err(html) => return html,
    };
    render_math(&mut tree, &options.render, plugins).await;
    tree.to_html()
}

/// Parse, annotate and lower `md`. The comrak arena is dropped before any
/// rendering starts. On failure, returns comrak's own HTML instead.
fn markdown_to_html_tree(md: &str, options: &comrak::Options) -> Result<HtmlTree, String> {
    let arena = Arena::new();
    let (root, annotations) = markdown::parse_document(&arena, md, options);
    markdown_to_tree(root, options, &annotations).map_err(|err| {
        tracing::warn!(error = %err, "could not build an HTML tree from markdown");
        let mut math_options = options.clone();
        markdown::enable_math_syntax(&mut math_options);
        let mut html = String::new();
        // Math stays as comrak wrote it.
        let _ = comrak::format_html(root, &math_options, &mut html);
        html
    })
}

/// Typeset the math in an HTML fragment.
pub async fn html_to_html(
    html: &str,
    options: &RenderOptions,
    plugins: &Plugins<'_>,
) -> Result<String, ParseError> {
    let mut tree = parse_fragment(html)?;
    render_math(&mut tree, options, plugins).await;
    Ok(tree.to_html())
}
