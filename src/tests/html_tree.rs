use super::*;
use pretty_assertions::assert_eq;
use crate::nodes::{NodeElement, NodeValue};

#[track_caller]
fn roundtrip(input: &str, expected: &str) {
    let tree = parse_fragment(input).unwrap();
    compare_strs(&tree.to_html(), expected, "roundtrip");
}

#[test]
fn comrak_output_is_stable() {
    let input = concat!(
        "<h2>Hi!</h2>\n",
        "<p>My <strong>document</strong> &amp; &quot;quotes&quot;.<br />\n",
        "<span data-math-style=\"inline\">a &lt; b</span></p>\n",
        "<pre><code class=\"language-math\" data-math-style=\"display\">x^2\n</code></pre>\n",
        "<hr />\n",
        "<!-- raw HTML omitted -->\n",
    );
    roundtrip(input, input);
}

#[test]
fn references_are_decoded() {
    let tree = parse_fragment("<p title=\"&lt;&#x27;&#39;&gt;\">&alpha;&nbsp;&#946;</p>").unwrap();
    let p = tree.arena().first_child(tree.root()).unwrap();
    assert_eq!(tree.element(p).unwrap().attribute("title"), Some("<''>"));
    assert_eq!(tree.text_content(p), "\u{3b1}\u{a0}\u{3b2}");
    compare_strs(
        &tree.to_html(),
        "<p title=\"&lt;''&gt;\">\u{3b1}\u{a0}\u{3b2}</p>",
        "decoded",
    );
}

#[test]
fn lenient_structure() {
    roundtrip("<div><p>one</span></p>two</div>", "<div><p>one</p>two</div>");
    roundtrip("<div><em>open", "<div><em>open</em></div>");
    roundtrip("<p>a<br>b<img src=\"x.png\">c</p>", "<p>a<br />b<img src=\"x.png\" />c</p>");
    roundtrip("<!DOCTYPE html><b>x</b>", "<b>x</b>");
}

#[test]
fn stray_ampersands_are_text() {
    roundtrip("<p>AT&T rocks</p>", "<p>AT&amp;T rocks</p>");
    roundtrip("<p>&nbsp x &</p>", "<p>&amp;nbsp x &amp;</p>");
    roundtrip("<p>&#;&#x;</p>", "<p>&amp;#;&amp;#x;</p>");
    roundtrip(
        "<a href=\"?a=1&b=2\">q&a</a>",
        "<a href=\"?a=1&amp;b=2\">q&amp;a</a>",
    );
}

#[test]
fn stray_angle_brackets_are_text() {
    roundtrip("<p>a < b</p>", "<p>a &lt; b</p>");
    roundtrip("<p>1 <= 2 and 3 <4</p>", "<p>1 &lt;= 2 and 3 &lt;4</p>");
    roundtrip("<p>x <</p>", "<p>x &lt;</p>");
    roundtrip("<p title=\"a < b\">c</p>", "<p title=\"a &lt; b\">c</p>");
}

#[test]
fn comments_keep_stray_markup() {
    roundtrip("<!-- a & b < c -->", "<!-- a & b < c -->");
}

#[test]
fn tag_and_attribute_names_are_lowercased() {
    roundtrip("<SPAN Class=\"x\">y</SPAN>", "<span class=\"x\">y</span>");
}

#[test]
fn katex_shaped_markup() {
    let input = concat!(
        "<span class=\"katex\"><span class=\"katex-mathml\"><math xmlns=\"http://www.w3.org/1998/Math/MathML\">",
        "<semantics><mrow><mi>x</mi></mrow><annotation encoding=\"application/x-tex\">x</annotation></semantics>",
        "</math></span><span class=\"katex-html\" aria-hidden=\"true\"><span class=\"base\">",
        "<span class=\"strut\" style=\"height:0.4306em;\"></span><span class=\"mord mathnormal\">x</span>",
        "</span></span></span>",
    );
    roundtrip(input, input);
}

#[test]
fn text_content_is_verbatim() {
    let tree = parse_fragment("<span>  a<b> b </b>\n c </span>").unwrap();
    let span = tree.arena().first_child(tree.root()).unwrap();
    assert_eq!(tree.text_content(span), "  a b \n c ");
}

#[test]
fn classes() {
    let mut element = NodeElement::new("span").with_attribute("class", "a  b");
    assert!(element.has_class("a"));
    assert!(element.has_class("b"));
    assert!(!element.has_class("a  b"));

    element.add_class("b");
    assert_eq!(element.attribute("class"), Some("a  b"));
    element.add_class("c");
    assert_eq!(element.attribute("class"), Some("a  b c"));

    let mut bare = NodeElement::new("span");
    bare.add_class("math-inline");
    assert_eq!(bare.attribute("class"), Some("math-inline"));
    assert_eq!(bare.remove_attribute("class").as_deref(), Some("math-inline"));
    assert_eq!(bare.attribute("class"), None);
}

#[test]
fn graft_copies_subtrees() {
    let source = parse_fragment("<b>one</b><i>two <u>three</u></i>").unwrap();
    let mut target = HtmlTree::new();
    let host = target.append_new(
        target.root(),
        NodeValue::Element(NodeElement::new("div")),
    );
    for child in source.arena().children(source.root()).collect::<Vec<_>>() {
        let copy = target.graft(&source, child);
        assert!(!target.is_attached(copy));
        target.arena_mut().append(host, copy);
        assert!(target.is_attached(copy));
    }
    compare_strs(
        &target.to_html(),
        "<div><b>one</b><i>two <u>three</u></i></div>",
        "graft",
    );
    // The source is untouched.
    compare_strs(&source.to_html(), "<b>one</b><i>two <u>three</u></i>", "source");
}

#[test]
fn element_data_is_not_serialized() {
    let mut tree = parse_fragment("<span class=\"math-inline\">x</span>").unwrap();
    let span = tree.arena().first_child(tree.root()).unwrap();
    tree.element_mut(span).unwrap().data.math_type = Some(crate::MathType::Typst);
    compare_strs(&tree.to_html(), "<span class=\"math-inline\">x</span>", "data");
}
