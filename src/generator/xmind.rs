use std::collections::HashSet;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::base::{write_artifact, Generator};
use crate::error::{ConvertError, Result};
use crate::outline::{Branch, Outline};
use crate::parser::xmind::{CONTENT_MEMBER, CONTENT_ROOT};

const FORMAT: &str = "xmind";

/// Title of the central topic every exported tree hangs from.
pub const EXPORT_ROOT_TITLE: &str = "Outline";
const SHEET_TITLE: &str = "Sheet 1";

const META_MEMBER: &str = "meta.xml";
const MANIFEST_MEMBER: &str = "META-INF/manifest.xml";

const CONTENT_NS: &str = "urn:xmind:xmap:xmlns:content:2.0";

const META_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<meta xmlns="urn:xmind:xmap:xmlns:meta:2.0" version="2.0">
  <Creator>
    <Name>outline-babel</Name>
    <Version>"#,
    env!("CARGO_PKG_VERSION"),
    r#"</Version>
  </Creator>
</meta>
"#
);

const MANIFEST_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<manifest xmlns="urn:xmind:xmap:xmlns:manifest:1.0">
  <file-entry full-path="content.xml" media-type="text/xml"/>
  <file-entry full-path="META-INF/" media-type=""/>
  <file-entry full-path="META-INF/manifest.xml" media-type="text/xml"/>
  <file-entry full-path="meta.xml" media-type="text/xml"/>
</manifest>
"#;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 26;

/// Issues topic identifiers: one decimal digit followed by 26 characters
/// from `[0-9a-z]`.
///
/// Only the 26-character suffix has to be unique among the identifiers issued
/// by one generator; a colliding suffix is drawn again.
pub struct IdGenerator<R> {
    rng: R,
    issued: HashSet<String>,
}

impl<R: Rng> IdGenerator<R> {
    pub fn new(rng: R) -> Self {
        IdGenerator {
            rng,
            issued: HashSet::new(),
        }
    }

    pub fn next_id(&mut self) -> String {
        loop {
            let digit = char::from(b'0' + self.rng.gen_range(0..10u8));
            let suffix: String = (0..ID_SUFFIX_LEN)
                .map(|_| char::from(ID_ALPHABET[self.rng.gen_range(0..ID_ALPHABET.len())]))
                .collect();
            if self.issued.insert(suffix.clone()) {
                return format!("{digit}{suffix}");
            }
            debug!(%suffix, "identifier suffix collision, drawing again");
        }
    }

    /// Number of identifiers issued so far.
    pub fn issued(&self) -> usize {
        self.issued.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct XmindGeneratorOptions {
    /// Seed for identifier generation. Drawn from the OS when `None`.
    pub seed: Option<u64>,
}

/// Writes XMind workbooks: `meta.xml`, `META-INF/manifest.xml` and a
/// `content.xml` holding one sheet with the outline under a central topic.
#[derive(Debug, Default)]
pub struct XmindGenerator {
    options: XmindGeneratorOptions,
}

impl XmindGenerator {
    pub fn new(options: XmindGeneratorOptions) -> Self {
        XmindGenerator { options }
    }

    fn rng(&self) -> StdRng {
        match self.options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Writes the complete archive into `sink` and hands the sink back.
    pub fn write<W: Write + Seek>(&self, outline: &Outline, sink: W) -> Result<W> {
        let mut ids = IdGenerator::new(self.rng());
        let content = content_xml(outline, &mut ids).map_err(|e| ConvertError::generate(FORMAT, e))?;
        debug!(topics = ids.issued(), "assembled content document");

        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut zip = ZipWriter::new(sink);
        for (member, bytes) in [
            (META_MEMBER, META_XML.as_bytes()),
            (MANIFEST_MEMBER, MANIFEST_XML.as_bytes()),
            (CONTENT_MEMBER, content.as_slice()),
        ] {
            zip.start_file(member, options).map_err(zip_error)?;
            zip.write_all(bytes)?;
        }
        zip.finish().map_err(zip_error)
    }

    pub fn to_bytes(&self, outline: &Outline) -> Result<Vec<u8>> {
        Ok(self.write(outline, Cursor::new(Vec::new()))?.into_inner())
    }
}

impl Generator for XmindGenerator {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn extension(&self) -> &'static str {
        "xmind"
    }

    fn generate(&self, outline: &Outline, output: &Path) -> Result<()> {
        let bytes = self.to_bytes(outline)?;
        write_artifact(output, &bytes)
    }
}

fn zip_error(err: ZipError) -> ConvertError {
    match err {
        ZipError::Io(io) => ConvertError::Io(io),
        other => ConvertError::generate(FORMAT, other),
    }
}

fn content_xml<R: Rng>(outline: &Outline, ids: &mut IdGenerator<R>) -> quick_xml::Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))?;

    let mut root = BytesStart::new(CONTENT_ROOT);
    root.push_attribute(("xmlns", CONTENT_NS));
    root.push_attribute(("version", "2.0"));
    writer.write_event(Event::Start(root))?;

    let sheet_id = ids.next_id();
    let mut sheet = BytesStart::new("sheet");
    sheet.push_attribute(("id", sheet_id.as_str()));
    writer.write_event(Event::Start(sheet))?;

    write_topic(&mut writer, ids, EXPORT_ROOT_TITLE, Some(&outline.root))?;
    write_title(&mut writer, SHEET_TITLE)?;

    writer.write_event(Event::End(BytesEnd::new("sheet")))?;
    writer.write_event(Event::End(BytesEnd::new(CONTENT_ROOT)))?;

    let mut xml = writer.into_inner();
    xml.push(b'\n');
    Ok(xml)
}

fn write_title<W: Write>(writer: &mut Writer<W>, title: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new("title")))?;
    writer.write_event(Event::Text(BytesText::new(title)))?;
    writer.write_event(Event::End(BytesEnd::new("title")))?;
    Ok(())
}

/// Writes one topic; `children` is `Some` for branches, even empty ones.
fn write_topic<W: Write, R: Rng>(
    writer: &mut Writer<W>,
    ids: &mut IdGenerator<R>,
    title: &str,
    children: Option<&Branch>,
) -> quick_xml::Result<()> {
    let id = ids.next_id();
    let mut topic = BytesStart::new("topic");
    topic.push_attribute(("id", id.as_str()));
    writer.write_event(Event::Start(topic))?;
    write_title(writer, title)?;

    if let Some(branch) = children {
        writer.write_event(Event::Start(BytesStart::new("children")))?;
        let mut topics = BytesStart::new("topics");
        topics.push_attribute(("type", "attached"));
        writer.write_event(Event::Start(topics))?;
        for (name, node) in branch.iter() {
            write_topic(writer, ids, name, node.as_branch())?;
        }
        writer.write_event(Event::End(BytesEnd::new("topics")))?;
        writer.write_event(Event::End(BytesEnd::new("children")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("topic")))?;
    Ok(())
}
