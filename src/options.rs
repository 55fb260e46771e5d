//! Configuration for the annotator and renderer.

#[cfg(feature = "bon")]
use bon::Builder;
use std::collections::BTreeMap;
use std::fmt::{self, Debug, Formatter};

use crate::adapters::{LatexAdapter, TypstAdapter};

#[derive(Default, Debug, Clone)]
/// Umbrella options struct for the markdown pipeline.
pub struct Options<'c> {
    /// Options handed to comrak. Math syntax is switched on regardless.
    pub markdown: comrak::Options<'c>,

    /// Configure the math renderer.
    pub render: RenderOptions,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "bon", derive(Builder))]
/// Options for [`render_math`](crate::render_math).
pub struct RenderOptions {
    /// Retry Typst math that fails to render as LaTeX before giving up.
    ///
    /// ```rust
    /// # use typtex::RenderOptions;
    /// assert!(RenderOptions::default().fallback_to_latex);
    /// ```
    #[cfg_attr(feature = "bon", builder(default = true))]
    pub fallback_to_latex: bool,

    /// Advisory preference for Typst. Carried through and logged, but
    /// classification never consults it.
    #[cfg_attr(feature = "bon", builder(default = true))]
    pub prefer_typst: bool,

    /// Passed verbatim to the LaTeX backend.
    #[cfg_attr(feature = "bon", builder(default))]
    pub latex: LatexOptions,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            fallback_to_latex: true,
            prefer_typst: true,
            latex: LatexOptions::default(),
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "bon", derive(Builder))]
/// Options for the LaTeX backend. Unset values take the backend's defaults.
///
/// ```rust
/// # use typtex::LatexOptions;
/// let mut latex = LatexOptions::default();
/// latex.macros.insert(r"\RR".into(), r"\mathbb{R}".into());
/// latex.error_color = Some("#cc0000".into());
/// ```
pub struct LatexOptions {
    /// Macro definitions, name to expansion, e.g. `\RR` to `\mathbb{R}`.
    #[cfg_attr(feature = "bon", builder(default))]
    pub macros: BTreeMap<String, String>,

    /// Colour used for source the backend could not typeset.
    pub error_color: Option<String>,

    /// How the backend treats input that is valid but non-standard.
    pub strict: Option<Strict>,

    /// Allow commands that can inject links or styles, such as `\url`.
    pub trust: Option<bool>,

    /// Flush display math left instead of centering it.
    pub fleqn: Option<bool>,

    /// Put equation numbers on the left.
    pub leqno: Option<bool>,

    /// Markup to produce.
    pub output: Option<OutputType>,

    /// Minimum thickness of fraction lines, in ems.
    pub min_rule_thickness: Option<f64>,

    /// Cap on user-specified sizes, in ems.
    pub max_size: Option<f64>,

    /// Cap on macro expansions.
    pub max_expand: Option<i32>,
}

/// Markup produced by the LaTeX backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    /// Visual HTML only.
    Html,
    /// MathML only.
    Mathml,
    /// Both, HTML for display and MathML for accessibility.
    HtmlAndMathml,
}

/// Strictness levels for non-standard LaTeX input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strict {
    /// Accept silently.
    Ignore,
    /// Accept and warn.
    Warn,
    /// Reject.
    Error,
}

#[derive(Default, Clone, Copy)]
#[cfg_attr(feature = "bon", derive(Builder))]
/// Backend overrides for the renderer. `None` selects the built-in backend
/// of the matching cargo feature.
///
/// ```rust
/// # use typtex::{adapters::LatexAdapter, Plugins, LatexOptions, RenderError};
/// struct Echo;
///
/// impl LatexAdapter for Echo {
///     fn render(&self, source: &str, _: bool, _: &LatexOptions) -> Result<String, RenderError> {
///         Ok(format!("<code>{}</code>", source))
///     }
/// }
///
/// let echo = Echo;
/// let mut plugins = Plugins::default();
/// plugins.latex = Some(&echo);
/// ```
pub struct Plugins<'p> {
    /// Typesets LaTeX math, and Typst math that falls back.
    pub latex: Option<&'p dyn LatexAdapter>,

    /// Typesets Typst math.
    pub typst: Option<&'p dyn TypstAdapter>,
}

impl Debug for Plugins<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugins")
            .field("latex", &self.latex.map(|_| "impl LatexAdapter"))
            .field("typst", &self.typst.map(|_| "impl TypstAdapter"))
            .finish()
    }
}
