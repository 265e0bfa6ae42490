use tracing::warn;
use zip::ZipArchive;

use super::archive;
use super::base::{probe, InputStream, Parser};
use super::element::Element;
use crate::error::{ConvertError, Result};
use crate::outline::{Branch, Node, Outline};

const FORMAT: &str = "xmind";

/// Archive member holding the sheets.
pub const CONTENT_MEMBER: &str = "content.xml";
/// Root element of the content document.
pub const CONTENT_ROOT: &str = "xmap-content";

/// A parser for XMind workbooks.
///
/// Reads the first sheet. Its central topic is the outline root and is not
/// itself part of the tree. A topic with a `<children>` element is a branch
/// even when that element is empty, so trees written by
/// [`XmindGenerator`](crate::generator::xmind::XmindGenerator) read back with
/// their shape intact.
#[derive(Debug, Default)]
pub struct XmindParser;

impl XmindParser {
    pub fn new() -> Self {
        XmindParser
    }

    fn title(topic: &Element) -> Result<String> {
        topic
            .child("title")
            .map(|title| title.text_content())
            .ok_or_else(|| ConvertError::format(FORMAT, "<topic> without a <title>"))
    }

    fn build_topics(tree: &mut Branch, topic: &Element) -> Result<()> {
        let Some(children) = topic.child("children") else {
            return Ok(());
        };
        for child in children.children_named("topics").flat_map(|t| t.children_named("topic")) {
            let name = Self::title(child)?;

            let node = if child.child("children").is_some() {
                let mut sub_topics = Branch::new();
                Self::build_topics(&mut sub_topics, child)?;
                Node::Branch(sub_topics)
            } else {
                Node::Leaf
            };

            if tree.insert(name.as_str(), node).is_some() {
                warn!(format = FORMAT, topic = %name, "duplicate topic title, keeping the last one");
            }
        }
        Ok(())
    }
}

impl Parser for XmindParser {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn sniff(&self, input: &mut dyn InputStream) -> bool {
        probe(FORMAT, input, |input| {
            let mut archive = ZipArchive::new(input)?;
            let prolog = archive::member_prolog(&mut archive, CONTENT_MEMBER)?;
            Ok(prolog.root.as_deref() == Some(CONTENT_ROOT))
        })
    }

    fn parse(&self, input: &mut dyn InputStream) -> Result<Outline> {
        let mut archive = archive::open(FORMAT, input)?;
        let document = archive::member_document(FORMAT, &mut archive, CONTENT_MEMBER)?;

        let central = document
            .child("sheet")
            .and_then(|sheet| sheet.child("topic"))
            .ok_or_else(|| ConvertError::format(FORMAT, "no sheet with a central topic"))?;

        let mut outline = Outline::new();
        Self::build_topics(&mut outline.root, central)?;
        Ok(outline)
    }
}
