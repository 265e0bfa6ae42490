use tracing::warn;
use zip::ZipArchive;

use super::archive;
use super::base::{probe, InputStream, Parser};
use super::element::Element;
use crate::error::{ConvertError, Result};
use crate::outline::{Branch, Node, Outline};

const FORMAT: &str = "mindmap";

/// Document type declared by mind-map documents.
pub const MINDMAP_DOCTYPE: &str = "mindmap";

/// A parser for zipped mind maps.
///
/// The map document is the first archive member whose name ends in `.xml`.
/// Sniffing and parsing resolve that member through the same function, so both
/// always look at the same document even when the archive holds several XML
/// members.
#[derive(Debug, Default)]
pub struct MindMapParser;

impl MindMapParser {
    pub fn new() -> Self {
        MindMapParser
    }

    fn heading(branch: &Element) -> Result<String> {
        branch
            .child("heading")
            .map(|heading| heading.text_content().trim().to_string())
            .ok_or_else(|| ConvertError::format(FORMAT, "<branch> without a <heading>"))
    }

    fn build_branches(tree: &mut Branch, parent: &Element) -> Result<()> {
        for branch in parent.children_named("branch") {
            let name = Self::heading(branch)?;

            let node = if branch.child("branch").is_some() {
                let mut sub_branches = Branch::new();
                Self::build_branches(&mut sub_branches, branch)?;
                Node::Branch(sub_branches)
            } else {
                Node::Leaf
            };

            if tree.insert(name.as_str(), node).is_some() {
                warn!(format = FORMAT, branch = %name, "duplicate branch heading, keeping the last one");
            }
        }
        Ok(())
    }
}

impl Parser for MindMapParser {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn sniff(&self, input: &mut dyn InputStream) -> bool {
        probe(FORMAT, input, |input| {
            let mut archive = ZipArchive::new(input)?;
            let Some(member) = archive::first_xml_member(&mut archive)? else {
                return Ok(false);
            };
            let prolog = archive::member_prolog(&mut archive, &member)?;
            Ok(prolog.doctype.as_deref() == Some(MINDMAP_DOCTYPE))
        })
    }

    fn parse(&self, input: &mut dyn InputStream) -> Result<Outline> {
        let mut archive = archive::open(FORMAT, input)?;
        let member = archive::first_xml_member(&mut archive)
            .map_err(|e| ConvertError::archive(FORMAT, e))?
            .ok_or_else(|| ConvertError::format(FORMAT, "archive has no .xml member"))?;
        let document = archive::member_document(FORMAT, &mut archive, &member)?;

        let center = document
            .descendant("map-center")
            .ok_or_else(|| ConvertError::format(FORMAT, format!("{member} has no <map-center>")))?;

        let mut outline = Outline::new();
        Self::build_branches(&mut outline.root, center)?;
        Ok(outline)
    }
}
