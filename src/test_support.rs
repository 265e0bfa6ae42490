//! Fixture builders shared by unit tests.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Builds an in-memory zip archive with the members in the given order.
pub fn zip_archive(members: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in members {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// A `maindoc.xml` with the given markup inside `<project>`.
pub fn kplato_document(tasks: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE kplato>
<kplato editor="KPlato" mime="application/x-vnd.kde.kplato" version="0.6">
  <project name="Sample" id="p1">
    {tasks}
  </project>
</kplato>
"#
    )
}

pub fn kplato_archive(tasks: &str) -> Vec<u8> {
    zip_archive(&[
        ("mimetype", "application/x-vnd.kde.kplato"),
        ("maindoc.xml", &kplato_document(tasks)),
    ])
}

/// A mind-map document with the given markup inside `<map-center>`.
pub fn mindmap_document(branches: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE mindmap>
<mindmap>
  <map-center>
    <heading>Center</heading>
    {branches}
  </map-center>
</mindmap>
"#
    )
}

pub fn mindmap_archive(branches: &str) -> Vec<u8> {
    zip_archive(&[
        ("preview.png", "not really a png"),
        ("Map.xml", &mindmap_document(branches)),
    ])
}
