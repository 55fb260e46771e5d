//! Error types.

use thiserror::Error;

use crate::classify::MathType;

/// Failure to turn a string into an [`HtmlTree`](crate::HtmlTree).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseError {
    /// The tokenizer rejected the input.
    #[error("malformed HTML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A name or value was not valid UTF-8.
    #[error("invalid text encoding: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// An attribute list could not be split into attributes.
    #[error("malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// comrak could not write the markdown tree as HTML.
    #[error("failed to format markdown as HTML")]
    Format(#[from] std::fmt::Error),
}

/// Failure to render one math expression.
///
/// The renderer never returns these to its caller; their messages end up in
/// the error element that replaces the math.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RenderError {
    /// The Typst backend rejected the expression.
    #[error("{message}")]
    Typst {
        /// Backend-provided description.
        message: String,
    },

    /// The LaTeX backend rejected the expression.
    #[error("{message}")]
    Latex {
        /// Backend-provided description.
        message: String,
    },

    /// The Typst backend could not be initialised.
    #[error("typst backend is not ready: {message}")]
    NotReady {
        /// Backend-provided description.
        message: String,
    },

    /// No backend is available for this math type.
    #[error("no {0} backend is configured")]
    MissingBackend(MathType),

    /// The backend's output could not be parsed back into a tree.
    #[error("backend produced unusable markup: {0}")]
    Fragment(#[from] ParseError),
}
