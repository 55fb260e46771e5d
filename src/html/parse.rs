//! Lenient HTML fragment parsing on top of quick-xml.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use smallvec::SmallVec;

use crate::arena_tree::NodeId;
use crate::entity;
use crate::error::ParseError;
use crate::nodes::{is_void_element, HtmlTree, NodeElement, NodeValue};

/// Parse an HTML fragment into a fresh [`HtmlTree`].
///
/// No `html` or `body` is implied. Unmatched end tags are ignored, elements
/// left open at the end of input are closed, and void elements never take
/// children. Character references in text and attribute values are decoded;
/// an `&` that does not start a terminated reference and a `<` that does not
/// start a tag are read as text. Comments are kept, doctypes and processing
/// instructions dropped.
pub fn parse_fragment(html: &str) -> Result<HtmlTree, ParseError> {
    let html = escape_stray_markup(html);
    let mut reader = Reader::from_str(&html);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut tree = HtmlTree::new();
    let mut open: SmallVec<[(NodeId, String); 16]> = SmallVec::new();

    loop {
        let parent = open.last().map_or(tree.root(), |(id, _)| *id);
        match reader.read_event()? {
            Event::Start(e) => {
                let element = decode_element(&reader, &e)?;
                let tag = element.tag.clone();
                let id = tree.append_new(parent, NodeValue::Element(element));
                if !is_void_element(&tag) {
                    open.push((id, tag));
                }
            }
            Event::Empty(e) => {
                let element = decode_element(&reader, &e)?;
                tree.append_new(parent, NodeValue::Element(element));
            }
            Event::Text(e) => {
                let text = reader.decoder().decode(&e)?;
                append_text(&mut tree, parent, &entity::unescape_html(&text));
            }
            Event::GeneralRef(e) => {
                let name = reader.decoder().decode(&e)?;
                let reference = format!("{};", name);
                match entity::unescape(&reference) {
                    Some((text, _)) => append_text(&mut tree, parent, &text),
                    None => append_text(&mut tree, parent, &format!("&{}", reference)),
                }
            }
            Event::CData(e) => {
                let text = reader.decoder().decode(&e)?;
                append_text(&mut tree, parent, &text);
            }
            Event::Comment(e) => {
                let comment = reader.decoder().decode(&e)?;
                tree.append_new(parent, NodeValue::Comment(comment.into_owned()));
            }
            Event::End(e) => {
                let qname = e.name();
                let name = reader.decoder().decode(qname.as_ref())?;
                if let Some(depth) = open
                    .iter()
                    .rposition(|(_, tag)| tag.eq_ignore_ascii_case(&name))
                {
                    open.truncate(depth);
                }
            }
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    Ok(tree)
}

/// Escape the `&` and `<` characters HTML reads as text but XML rejects.
/// Comments and CDATA sections are copied verbatim.
fn escape_stray_markup(html: &str) -> Cow<'_, str> {
    let mut escaped = String::new();
    let mut copied = 0;
    let mut i = 0;

    while let Some(offset) = html[i..].find(['&', '<']) {
        let at = i + offset;
        let rest = &html[at..];
        let verbatim = if rest.starts_with("<!--") {
            Some("-->")
        } else if rest.starts_with("<![CDATA[") {
            Some("]]>")
        } else {
            None
        };
        if let Some(close) = verbatim {
            i = rest.find(close).map_or(html.len(), |end| at + end + close.len());
            continue;
        }

        i = at + 1;
        let replacement = match rest.as_bytes()[0] {
            b'&' if !starts_reference(&rest[1..]) => "&amp;",
            b'<' if !starts_tag(&rest[1..]) => "&lt;",
            _ => continue,
        };
        escaped.push_str(&html[copied..at]);
        escaped.push_str(replacement);
        copied = i;
    }

    if copied == 0 {
        return Cow::Borrowed(html);
    }
    escaped.push_str(&html[copied..]);
    Cow::Owned(escaped)
}

/// Whether `after`, the text following an `&`, is a reference closed by `;`.
fn starts_reference(after: &str) -> bool {
    let (body, valid): (&str, fn(&u8) -> bool) = match after.strip_prefix('#') {
        Some(numeric) => match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => (hex, u8::is_ascii_hexdigit),
            None => (numeric, u8::is_ascii_digit),
        },
        None if after.starts_with(|c: char| c.is_ascii_alphabetic()) => {
            (after, u8::is_ascii_alphanumeric)
        }
        None => return false,
    };
    let len = body.bytes().take_while(valid).count();
    len > 0 && body.as_bytes().get(len) == Some(&b';')
}

/// Whether `after`, the text following a `<`, opens a tag, declaration or
/// processing instruction.
fn starts_tag(after: &str) -> bool {
    match after.as_bytes() {
        [b'/', c, ..] => c.is_ascii_alphabetic(),
        [b'!' | b'?', ..] => true,
        [c, ..] => c.is_ascii_alphabetic(),
        [] => false,
    }
}

fn decode_element(reader: &Reader<&[u8]>, e: &BytesStart) -> Result<NodeElement, ParseError> {
    let tag = reader.decoder().decode(e.name().as_ref())?.to_ascii_lowercase();
    let mut element = NodeElement::new(tag);

    // Valueless attributes such as `disabled` come back with an empty value.
    for attribute in e.html_attributes() {
        let attribute = attribute?;
        let name = reader.decoder().decode(attribute.key.as_ref())?;
        let value = reader.decoder().decode(&attribute.value)?;
        element.attributes.push((
            name.to_ascii_lowercase(),
            entity::unescape_html(&value).into_owned(),
        ));
    }

    Ok(element)
}

fn append_text(tree: &mut HtmlTree, parent: NodeId, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = tree.arena().last_child(parent) {
        if let NodeValue::Text(existing) = tree.get_mut(last) {
            existing.push_str(text);
            return;
        }
    }
    tree.append_new(parent, NodeValue::Text(text.to_string()));
}
