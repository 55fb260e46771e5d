//! Adapter for Typst math.
//!
//! Typst math is checked with the Typst parser, lowered to LaTeX and
//! typeset with KaTeX. Unlike [`KatexAdapter`](super::katex::KatexAdapter),
//! failures anywhere along the way are reported as `Err`, so the renderer
//! can fall back or show the error.

use std::sync::OnceLock;

use futures_util::FutureExt;

use crate::adapters::{BoxFuture, TypstAdapter};
use crate::error::RenderError;
use crate::options::LatexOptions;
use crate::plugins::katex::build_opts;

#[derive(Debug, Default)]
/// Typst math plugin.
pub struct TypstMathAdapter {
    latex: LatexOptions,
    ready: OnceLock<Result<(), String>>,
}

impl TypstMathAdapter {
    /// Construct a new `TypstMathAdapter` typesetting with KaTeX defaults.
    pub const fn new() -> Self {
        TypstMathAdapter {
            latex: LatexOptions {
                macros: std::collections::BTreeMap::new(),
                error_color: None,
                strict: None,
                trust: None,
                fleqn: None,
                leqno: None,
                output: None,
                min_rule_thickness: None,
                max_size: None,
                max_expand: None,
            },
            ready: OnceLock::new(),
        }
    }

    /// Construct a new `TypstMathAdapter` whose KaTeX stage uses `latex`.
    pub fn with_latex_options(latex: LatexOptions) -> Self {
        TypstMathAdapter {
            latex,
            ready: OnceLock::new(),
        }
    }

    /// Lower Typst math to LaTeX, rejecting source the Typst parser flags.
    ///
    /// `source` is the body of an equation, without its `$` delimiters.
    ///
    /// ```rust
    /// # use typtex::plugins::typst::TypstMathAdapter;
    /// let latex = TypstMathAdapter::to_latex("frac(a, b)").unwrap();
    /// assert!(latex.contains(r"\frac{a}{b}"));
    /// ```
    pub fn to_latex(source: &str) -> Result<String, RenderError> {
        let parsed = typst_syntax::parse_math(source);
        if let Some(error) = parsed.errors().into_iter().next() {
            return Err(RenderError::Typst {
                message: error.message.to_string(),
            });
        }
        let options = tylax::T2LOptions {
            math_only: true,
            ..Default::default()
        };
        Ok(tylax::typst_to_latex_with_options(source, &options))
    }
}

impl TypstAdapter for TypstMathAdapter {
    fn ensure_ready(&self) -> BoxFuture<'_, Result<(), RenderError>> {
        async move {
            let ready = self.ready.get_or_init(|| {
                tracing::debug!("starting katex engine for typst math");
                ::katex::render("x")
                    .map(|_| ())
                    .map_err(|err| err.to_string())
            });
            ready.clone().map_err(|message| RenderError::NotReady { message })
        }
        .boxed()
    }

    fn render(&self, source: &str, display_mode: bool) -> Result<String, RenderError> {
        let latex = Self::to_latex(source)?;
        let opts = build_opts(&self.latex, display_mode, true)?;
        ::katex::render_with_opts(&latex, &opts).map_err(|err| RenderError::Typst {
            message: err.to_string(),
        })
    }
}
