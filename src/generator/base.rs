use crate::error::{ConvertError, Result};
use crate::outline::Outline;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// A target format the canonical outline can be written to.
pub trait Generator {
    /// Short identifier accepted by `--to-type`.
    fn name(&self) -> &'static str;

    /// Canonical file extension, without the dot, used to pick a generator
    /// from the output path.
    fn extension(&self) -> &'static str;

    /// Writes the whole outline to `output`, creating it fresh.
    fn generate(&self, outline: &Outline, output: &Path) -> Result<()>;
}

/// Writes a fully assembled artifact to a newly created (or truncated) file.
///
/// The file is removed again if writing fails, so no partial output is left behind.
pub fn write_artifact(output: &Path, bytes: &[u8]) -> Result<()> {
    let result = File::create(output).and_then(|mut file| {
        file.write_all(bytes)?;
        file.flush()
    });
    if let Err(e) = result {
        let _ = fs::remove_file(output);
        return Err(ConvertError::Io(e));
    }
    Ok(())
}
