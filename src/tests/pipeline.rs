use super::*;
use crate::{html_to_html, markdown_to_html_with_plugins, Options};

#[tokio::test]
async fn markdown_through_fake_backends() {
    let (latex, typst) = (FakeLatex::default(), FakeTypst::default());
    let html = markdown_to_html_with_plugins(
        "Typst $sum_(i=1)^n i$ and LaTeX $\\sum_{i=1}^n i$.\n\n```math\nx^2\n```\n",
        &Options::default(),
        &plugins(&latex, &typst),
    )
    .await;

    compare_strs(
        &html,
        concat!(
            "<p>Typst <span class=\"math-inline\"><span class=\"typst\" data-display=\"false\">sum_(i=1)^n i</span></span>",
            " and LaTeX <span class=\"math-inline\"><span class=\"latex\" data-display=\"false\">\\sum_{i=1}^n i</span></span>.</p>\n",
            "<span class=\"typst\" data-display=\"true\">x^2\n</span>\n",
        ),
        "html",
    );
}

#[tokio::test]
async fn markdown_without_fallback_shows_error() {
    let (latex, typst) = (FakeLatex::default(), FakeTypst::failing("unknown variable: foo"));
    let mut options = Options::default();
    options.render.fallback_to_latex = false;
    let html = markdown_to_html_with_plugins("$foo$\n", &options, &plugins(&latex, &typst)).await;

    compare_strs(
        &html,
        "<p><span class=\"math-inline\"><span class=\"math-error\" style=\"color: red;\">unknown variable: foo</span></span></p>\n",
        "html",
    );
}

#[tokio::test]
async fn raw_html_entry_point() {
    let (latex, typst) = (FakeLatex::default(), FakeTypst::default());
    let html = html_to_html(
        "<p><span class=\"math-inline\">\\beta</span></p>",
        &RenderOptions::default(),
        &plugins(&latex, &typst),
    )
    .await
    .unwrap();
    compare_strs(
        &html,
        "<p><span class=\"math-inline\"><span class=\"latex\" data-display=\"false\">\\beta</span></span></p>",
        "html",
    );
}

#[tokio::test]
async fn raw_html_with_stray_ampersand_keeps_math() {
    let (latex, typst) = (FakeLatex::default(), FakeTypst::default());
    let mut options = Options::default();
    options.markdown.render.r#unsafe = true;
    let html = markdown_to_html_with_plugins(
        "<div>AT&T</div>\n\n$\\alpha$\n",
        &options,
        &plugins(&latex, &typst),
    )
    .await;

    compare_strs(
        &html,
        concat!(
            "<div>AT&amp;T</div>\n",
            "<p><span class=\"math-inline\"><span class=\"latex\" data-display=\"false\">\\alpha</span></span></p>\n",
        ),
        "html",
    );
}

#[tokio::test]
async fn raw_html_entry_point_accepts_html_text() {
    let (latex, typst) = (FakeLatex::default(), FakeTypst::default());
    let html = html_to_html(
        "<p>a < b & c <span class=\"math-inline\">\\beta</span></p>",
        &RenderOptions::default(),
        &plugins(&latex, &typst),
    )
    .await
    .unwrap();
    compare_strs(
        &html,
        "<p>a &lt; b &amp; c <span class=\"math-inline\"><span class=\"latex\" data-display=\"false\">\\beta</span></span></p>",
        "html",
    );
}

#[cfg(feature = "typst")]
mod real_backends {
    use crate::{markdown_to_html, Options, RenderOptions};
    use crate::plugins::katex::KatexAdapter;
    use crate::plugins::typst::TypstMathAdapter;
    use crate::{LatexOptions, Plugins};

    fn typst_only() -> Options<'static> {
        let mut options = Options::default();
        options.render.fallback_to_latex = false;
        options
    }

    #[tokio::test]
    async fn typst_sum_renders() {
        let html = markdown_to_html("$sum_(i=1)^n i$\n", &typst_only()).await;
        assert!(html.contains("class=\"katex\""), "{}", html);
        assert!(
            html.contains("<annotation encoding=\"application/x-tex\">\\sum_"),
            "{}",
            html
        );
        assert!(!html.contains("textit"), "{}", html);
        assert!(!html.contains("math-error"), "{}", html);
    }

    #[tokio::test]
    async fn typst_display_integral_renders() {
        let html = markdown_to_html("$$integral_0^1 x^2 dif x$$\n", &typst_only()).await;
        assert!(html.contains("katex-display"), "{}", html);
        assert!(
            html.contains("<annotation encoding=\"application/x-tex\">\\int_0^1"),
            "{}",
            html
        );
        assert!(!html.contains("math-error"), "{}", html);
    }

    #[test]
    fn typst_math_lowers_to_latex() {
        let cases = [
            ("sum_(i=1)^n i", "\\sum_"),
            ("integral_0^1 x^2 dif x", "\\int_0^1"),
            ("frac(a, b)", "\\frac{a}{b}"),
            ("mat(1, 2; 3, 4)", "\\begin{matrix}"),
        ];
        for (typst, latex) in cases {
            let lowered = TypstMathAdapter::to_latex(typst).unwrap();
            assert!(lowered.contains(latex), "{} lowered to {}", typst, lowered);
            assert!(!lowered.contains("textit"), "{} lowered to {}", typst, lowered);
        }
    }

    #[tokio::test]
    async fn latex_sum_renders_with_katex() {
        let html = markdown_to_html("$\\sum_{i=1}^n i$\n", &Options::default()).await;
        assert!(html.contains("class=\"katex\""), "{}", html);
        assert!(html.contains("math-inline"), "{}", html);
    }

    #[tokio::test]
    async fn invalid_latex_uses_katex_error_markup() {
        let html = markdown_to_html("$\\invalidcommand{test}$\n", &Options::default()).await;
        assert!(html.contains("katex-error"), "{}", html);
        assert!(!html.contains("math-error"), "{}", html);
    }

    #[tokio::test]
    async fn mixed_document_grows() {
        let md = "Typst: $sum_(i=1)^n i$\n\nLaTeX: $\\sum_{i=1}^n i$\n";
        let html = markdown_to_html(md, &Options::default()).await;
        assert!(html.len() > md.len());
        assert_eq!(html.matches("class=\"katex\"").count(), 2, "{}", html);
    }

    #[tokio::test]
    async fn latex_options_reach_katex() {
        let mut latex = LatexOptions::default();
        latex
            .macros
            .insert("\\RR".to_string(), "\\mathbb{R}".to_string());
        latex.error_color = Some("#ff6b6b".to_string());

        let mut options = Options::default();
        options.render = RenderOptions {
            latex,
            ..RenderOptions::default()
        };
        let html = markdown_to_html("$x \\in \\RR$ and $\\nope$\n", &options).await;
        assert!(html.contains("mathbb"), "{}", html);
        assert!(html.contains("#ff6b6b"), "{}", html);
    }

    #[tokio::test]
    async fn explicit_plugins_match_defaults() {
        let katex = KatexAdapter::new();
        let typst = TypstMathAdapter::new();
        let plugins = Plugins {
            latex: Some(&katex),
            typst: Some(&typst),
        };
        let md = "$x^2$\n";
        let with_plugins =
            crate::markdown_to_html_with_plugins(md, &Options::default(), &plugins).await;
        let with_defaults = markdown_to_html(md, &Options::default()).await;
        assert_eq!(with_plugins, with_defaults);
    }

    #[test]
    fn typst_syntax_errors_are_reported() {
        assert!(TypstMathAdapter::to_latex("\"unclosed").is_err());
        assert!(TypstMathAdapter::to_latex("x^2").is_ok());
    }
}
