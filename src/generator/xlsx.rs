use std::path::Path;

use rust_xlsxwriter::{ColNum, Color, Format, FormatBorder, RowNum, Workbook, Worksheet, XlsxError};

use super::base::{write_artifact, Generator};
use crate::error::{ConvertError, Result};
use crate::outline::Outline;

const FORMAT: &str = "xlsx";

#[derive(Debug, Clone, Default)]
pub struct XlsxGeneratorOptions {
    /// If true, set the background color of all cells to white.
    pub shironuri: bool,
}

/// Writes the outline as a flat worksheet: one row per node in pre-order,
/// with its name and outline level.
#[derive(Debug, Default)]
pub struct XlsxGenerator {
    options: XlsxGeneratorOptions,
}

impl XlsxGenerator {
    pub fn new(options: XlsxGeneratorOptions) -> Self {
        XlsxGenerator { options }
    }

    pub fn output_to_worksheet(&self, outline: &Outline, worksheet: &mut Worksheet) -> Result<(), XlsxError> {
        let mut border_format = Format::new().set_border(FormatBorder::Thin);
        if self.options.shironuri {
            border_format = border_format.set_background_color(Color::White);
            let cell_format = Format::new().set_background_color(Color::White);
            worksheet.set_column_range_format(0, 16383, &cell_format)?;
        }

        worksheet.write_with_format(0, 0, "Name", &border_format)?;
        worksheet.write_with_format(0, 1, "Outline Level", &border_format)?;

        for (index, (depth, name, _)) in outline.walk().into_iter().enumerate() {
            let row = (index + 1) as RowNum;
            worksheet.write_with_format(row, 0 as ColNum, name, &border_format)?;
            worksheet.write_with_format(row, 1 as ColNum, depth as u32, &border_format)?;
        }
        Ok(())
    }

    pub fn to_bytes(&self, outline: &Outline) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        self.output_to_worksheet(outline, worksheet)
            .map_err(|e| ConvertError::generate(FORMAT, e))?;
        workbook
            .save_to_buffer()
            .map_err(|e| ConvertError::generate(FORMAT, e))
    }
}

impl Generator for XlsxGenerator {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn generate(&self, outline: &Outline, output: &Path) -> Result<()> {
        let bytes = self.to_bytes(outline)?;
        write_artifact(output, &bytes)
    }
}
