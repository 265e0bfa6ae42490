//! Output generators.
//!
//! This module contains generators that write the canonical outline into the
//! supported target formats.

pub mod base;
pub mod dir_tree;
pub mod xlsx;
pub mod xmind;

pub use base::Generator;

use xlsx::XlsxGeneratorOptions;

/// The registered generators, in lookup order.
pub fn default_generators() -> Vec<Box<dyn Generator>> {
    generators_with(XlsxGeneratorOptions::default())
}

/// The registered generators, with the xlsx writer configured by `xlsx_options`.
pub fn generators_with(xlsx_options: XlsxGeneratorOptions) -> Vec<Box<dyn Generator>> {
    vec![
        Box::new(xmind::XmindGenerator::default()),
        Box::new(xlsx::XlsxGenerator::new(xlsx_options)),
        Box::new(dir_tree::DirTreeGenerator::new()),
    ]
}
