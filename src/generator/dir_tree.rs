use std::fs::{self, File};
use std::path::{Component, Path};

use tracing::debug;

use super::base::Generator;
use crate::error::{ConvertError, Result};
use crate::outline::{Branch, Node, Outline};

const FORMAT: &str = "dir_tree";

/// Materializes the outline as a directory tree: branches become
/// directories, leaves become empty files.
///
/// The output directory must not exist yet. If anything fails midway the
/// partially written tree is removed again.
#[derive(Debug, Default)]
pub struct DirTreeGenerator;

impl DirTreeGenerator {
    pub fn new() -> Self {
        DirTreeGenerator
    }

    fn build_path(path: &Path, branch: &Branch) -> Result<()> {
        fs::create_dir(path)?;
        for (name, node) in branch.iter() {
            check_name(name)?;
            let sub_path = path.join(name);
            match node {
                Node::Leaf => {
                    File::create(&sub_path)?;
                }
                Node::Branch(children) => Self::build_path(&sub_path, children)?,
            }
        }
        Ok(())
    }
}

/// A node name must map to exactly one path component inside its parent.
fn check_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => Ok(()),
        _ => Err(ConvertError::generate(
            FORMAT,
            format!("{name:?} is not usable as a file name"),
        )),
    }
}

impl Generator for DirTreeGenerator {
    fn name(&self) -> &'static str {
        FORMAT
    }

    /// Output paths without an extension select the directory writer.
    fn extension(&self) -> &'static str {
        ""
    }

    fn generate(&self, outline: &Outline, output: &Path) -> Result<()> {
        // create_dir refuses to reuse an existing directory; only clean up what we created.
        if output.exists() {
            return Err(ConvertError::Io(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("{} already exists", output.display()),
            )));
        }

        let result = Self::build_path(output, &outline.root);
        if result.is_err() && output.exists() {
            debug!(path = %output.display(), "removing partial directory tree");
            let _ = fs::remove_dir_all(output);
        }
        result
    }
}
