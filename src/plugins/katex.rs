//! Adapter for the KaTeX LaTeX typesetter.

use crate::adapters::LatexAdapter;
use crate::error::RenderError;
use crate::options::{LatexOptions, OutputType};

#[derive(Debug, Default, Copy, Clone)]
/// KaTeX plugin. Malformed input renders as KaTeX's own error markup.
pub struct KatexAdapter;

impl KatexAdapter {
    /// Construct a new `KatexAdapter`.
    pub fn new() -> Self {
        KatexAdapter
    }
}

impl LatexAdapter for KatexAdapter {
    fn render(
        &self,
        source: &str,
        display_mode: bool,
        options: &LatexOptions,
    ) -> Result<String, RenderError> {
        let opts = build_opts(options, display_mode, false)?;
        ::katex::render_with_opts(source, &opts).map_err(|err| RenderError::Latex {
            message: err.to_string(),
        })
    }
}

/// Translate `options` into KaTeX's own.
///
/// KaTeX's `strict` setting is not exposed by the binding; a configured
/// value is only logged.
pub(crate) fn build_opts(
    options: &LatexOptions,
    display_mode: bool,
    throw_on_error: bool,
) -> Result<::katex::Opts, RenderError> {
    let mut builder = ::katex::Opts::builder();
    builder
        .display_mode(display_mode)
        .throw_on_error(throw_on_error);

    if let Some(output) = options.output {
        builder.output_type(match output {
            OutputType::Html => ::katex::OutputType::Html,
            OutputType::Mathml => ::katex::OutputType::Mathml,
            OutputType::HtmlAndMathml => ::katex::OutputType::HtmlAndMathml,
        });
    }
    if let Some(error_color) = &options.error_color {
        builder.error_color(error_color.clone());
    }
    if let Some(trust) = options.trust {
        builder.trust(trust);
    }
    if let Some(fleqn) = options.fleqn {
        builder.fleqn(fleqn);
    }
    if let Some(leqno) = options.leqno {
        builder.leqno(leqno);
    }
    if let Some(thickness) = options.min_rule_thickness {
        builder.min_rule_thickness(thickness);
    }
    if let Some(max_size) = options.max_size {
        builder.max_size(max_size);
    }
    if let Some(max_expand) = options.max_expand {
        builder.max_expand(max_expand);
    }
    // `add_macro` consumes the builder, unlike the generated setters.
    for (name, expansion) in &options.macros {
        builder = builder.add_macro(name.clone(), expansion.clone());
    }
    if let Some(strict) = options.strict {
        tracing::debug!(?strict, "katex binding has no strict setting; ignoring");
    }

    builder.build().map_err(|err| RenderError::Latex {
        message: format!("invalid KaTeX options: {}", err),
    })
}
