//! Zip container access shared by the archive-based parsers.

use std::io::{BufReader, Read, Seek};

use zip::result::ZipResult;
use zip::ZipArchive;

use super::base::InputStream;
use super::element::{read_document, read_prolog, Element, Prolog};
use crate::error::{ConvertError, Result};

pub(crate) fn open<'a>(
    format: &'static str,
    input: &'a mut dyn InputStream,
) -> Result<ZipArchive<&'a mut dyn InputStream>> {
    ZipArchive::new(input).map_err(|e| ConvertError::archive(format, e))
}

/// Returns the first member, in listed order, whose name ends in `.xml`
/// (ASCII case-insensitive).
pub(crate) fn first_xml_member<R: Read + Seek>(archive: &mut ZipArchive<R>) -> ZipResult<Option<String>> {
    for index in 0..archive.len() {
        let member = archive.by_index(index)?;
        if member.name().to_ascii_lowercase().ends_with(".xml") {
            return Ok(Some(member.name().to_string()));
        }
    }
    Ok(None)
}

pub(crate) fn member_prolog<R: Read + Seek>(archive: &mut ZipArchive<R>, member: &str) -> anyhow::Result<Prolog> {
    let file = archive.by_name(member)?;
    Ok(read_prolog(BufReader::new(file))?)
}

pub(crate) fn member_document<R: Read + Seek>(
    format: &'static str,
    archive: &mut ZipArchive<R>,
    member: &str,
) -> Result<Element> {
    let file = archive
        .by_name(member)
        .map_err(|e| ConvertError::archive(format, e))?;
    read_document(BufReader::new(file))
        .map_err(|e| ConvertError::format(format, format!("{member}: {e}")))
}
