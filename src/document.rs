//! Parsed upstream documents and the accessors the mapper reads them through.

use roxmltree::{Document, Node, ParsingOptions};

use crate::error::BridgeError;

/// Read-only view of one element in a parsed source tree.
///
/// The mapper only ever talks to this trait, so a different parser needs one new impl
/// and no change at the call sites.
pub trait SourceNode: Copy {
    /// Trimmed text content with any CDATA markers removed.
    fn text_value(&self) -> String;
    /// Attribute value, or `""` when absent.
    fn attr(&self, name: &str) -> String;
    /// Element children named `tag`, in document order. One match or many, always a sequence.
    fn children_named(&self, tag: &str) -> Vec<Self>;

    fn child_named(&self, tag: &str) -> Option<Self> {
        self.children_named(tag).into_iter().next()
    }
}

/// Text of a possibly missing node.
pub fn text_of<N: SourceNode>(node: Option<N>) -> String {
    node.map(|n| n.text_value()).unwrap_or_default()
}

/// Attribute of a possibly missing node.
pub fn attr_of<N: SourceNode>(node: Option<N>, name: &str) -> String {
    node.map(|n| n.attr(name)).unwrap_or_default()
}

pub(crate) fn strip_cdata(raw: &str) -> String {
    raw.replace("<![CDATA[", "").replace("]]>", "").trim().to_string()
}

impl<'a, 'input> SourceNode for Node<'a, 'input> {
    fn text_value(&self) -> String {
        let raw: String = self
            .descendants()
            .filter(|n| n.is_text())
            .filter_map(|n| n.text())
            .collect();
        strip_cdata(&raw)
    }

    fn attr(&self, name: &str) -> String {
        self.attribute(name).unwrap_or_default().to_string()
    }

    fn children_named(&self, tag: &str) -> Vec<Self> {
        self.children()
            .filter(|n| n.is_element() && n.tag_name().name() == tag)
            .collect()
    }
}

/// An upstream response body parsed into a tree.
pub struct SourceDocument<'input> {
    doc: Document<'input>,
}

impl<'input> SourceDocument<'input> {
    pub fn parse(text: &'input str) -> Result<Self, BridgeError> {
        let text = text.trim_start_matches('\u{feff}').trim_start();
        let mut opts = ParsingOptions::default();
        opts.allow_dtd = true;
        let doc = Document::parse_with_options(text, opts)?;
        Ok(Self { doc })
    }

    /// The document element (`<rss>` for the usual feed).
    pub fn root(&self) -> Node<'_, 'input> {
        self.doc.root_element()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="5.1">
  <list page="2" pagecount="9">
    <video><name><![CDATA[  Alpha  ]]></name><dl><dd flag="m3u8">u1</dd></dl></video>
    <video><name>Beta</name></video>
  </list>
  <class><ty id="1">Movies</ty></class>
</rss>"#;

    #[test]
    fn text_strips_cdata_and_whitespace() {
        let doc = SourceDocument::parse(FEED).unwrap();
        let list = doc.root().child_named("list").unwrap();
        let names: Vec<String> = list
            .children_named("video")
            .iter()
            .map(|v| text_of(v.child_named("name")))
            .collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn literal_cdata_markers_do_not_leak() {
        assert_eq!(strip_cdata(" <![CDATA[x]]> "), "x");
        let doc = SourceDocument::parse("<a>&lt;![CDATA[y]]&gt;</a>").unwrap();
        assert_eq!(doc.root().text_value(), "y");
    }

    #[test]
    fn absent_nodes_and_attributes_are_empty() {
        let doc = SourceDocument::parse(FEED).unwrap();
        let list = doc.root().child_named("list").unwrap();
        assert_eq!(list.attr("page"), "2");
        assert_eq!(list.attr("recordcount"), "");
        assert_eq!(text_of(list.child_named("missing")), "");
        assert_eq!(attr_of(list.child_named("missing"), "flag"), "");
    }

    #[test]
    fn single_and_many_children_share_one_shape() {
        let doc = SourceDocument::parse(FEED).unwrap();
        let root = doc.root();
        assert_eq!(root.child_named("list").unwrap().children_named("video").len(), 2);
        assert_eq!(root.child_named("class").unwrap().children_named("ty").len(), 1);
        assert!(root.children_named("nothing").is_empty());
    }

    #[test]
    fn tolerates_bom_and_leading_whitespace() {
        let doc = SourceDocument::parse("\u{feff}\n  <?xml version=\"1.0\"?><rss/>").unwrap();
        assert!(doc.root().child_named("list").is_none());
    }

    #[test]
    fn rejects_non_xml() {
        assert!(matches!(
            SourceDocument::parse("<html><body>"),
            Err(BridgeError::MalformedSource(_))
        ));
        assert!(SourceDocument::parse("plain text").is_err());
    }
}
