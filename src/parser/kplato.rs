use tracing::warn;
use zip::ZipArchive;

use super::archive;
use super::base::{probe, InputStream, Parser};
use super::element::Element;
use crate::error::{ConvertError, Result};
use crate::outline::{Branch, Node, Outline};

const FORMAT: &str = "kplato";

/// Archive member holding the project document.
pub const MAINDOC_MEMBER: &str = "maindoc.xml";
/// Document type declared by project documents.
pub const KPLATO_DOCTYPE: &str = "kplato";

/// A parser for KPlato project archives.
///
/// The task hierarchy under `<project>` becomes the outline: tasks with
/// sub-tasks are branches, the rest are leaves, all named by their `name`
/// attribute.
#[derive(Debug, Default)]
pub struct KplatoParser;

impl KplatoParser {
    pub fn new() -> Self {
        KplatoParser
    }

    fn build_tasks(branch: &mut Branch, parent: &Element) -> Result<()> {
        for task in parent.children_named("task") {
            let name = task
                .attribute("name")
                .ok_or_else(|| ConvertError::format(FORMAT, "<task> without a name attribute"))?;

            let node = if task.child("task").is_some() {
                let mut sub_tasks = Branch::new();
                Self::build_tasks(&mut sub_tasks, task)?;
                Node::Branch(sub_tasks)
            } else {
                Node::Leaf
            };

            if branch.insert(name, node).is_some() {
                warn!(format = FORMAT, task = name, "duplicate task name, keeping the last one");
            }
        }
        Ok(())
    }
}

impl Parser for KplatoParser {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn sniff(&self, input: &mut dyn InputStream) -> bool {
        probe(FORMAT, input, |input| {
            let mut archive = ZipArchive::new(input)?;
            let prolog = archive::member_prolog(&mut archive, MAINDOC_MEMBER)?;
            Ok(prolog.doctype.as_deref() == Some(KPLATO_DOCTYPE))
        })
    }

    fn parse(&self, input: &mut dyn InputStream) -> Result<Outline> {
        let mut archive = archive::open(FORMAT, input)?;
        let document = archive::member_document(FORMAT, &mut archive, MAINDOC_MEMBER)?;

        let project = document
            .child("project")
            .ok_or_else(|| ConvertError::format(FORMAT, "document has no <project> element"))?;

        let mut outline = Outline::new();
        Self::build_tasks(&mut outline.root, project)?;
        Ok(outline)
    }
}
