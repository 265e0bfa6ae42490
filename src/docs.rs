//! Detailed documentation for input and output types.
//!
//! This module contains comprehensive documentation about the various
//! input parsers and output generators supported by outline-babel.

/// # Types of Input
///
/// The input type is never given on the command line: every parser is asked,
/// in the order below, whether it recognizes the input, and the first one that
/// does builds the tree.
///
/// ## `kplato`
///
/// KPlato project archive. A zip container with a `maindoc.xml` member that
/// declares `<!DOCTYPE kplato>`. The `<task>` hierarchy under `<project>`
/// becomes the tree; each task is named by its `name` attribute.
///
/// ## `mindmap`
///
/// Zipped mind map. The first member whose name ends in `.xml` must declare
/// `<!DOCTYPE mindmap>`. The `<branch>` hierarchy under `<map-center>` becomes
/// the tree; each branch is named by the text of its `<heading>`.
///
/// ## `xmind`
///
/// [XMind](https://xmind.app/) workbook (`content.xml` rooted at
/// `<xmap-content>`). The topics under the first sheet's central topic become
/// the tree.
pub mod input_types {
    /// Documentation for kplato input format
    pub mod kplato {
        //! KPlato project archive parser
    }

    /// Documentation for mindmap input format
    pub mod mindmap {
        //! Zipped mind-map parser
    }

    /// Documentation for xmind input format
    pub mod xmind {
        //! XMind workbook parser
    }
}

/// # Types of Output
///
/// The output type follows the extension of the output path unless
/// `--to-type` names one explicitly.
///
/// The sample tree used in this section is as follows:
///
/// ```text
/// A
/// B/
///   C
/// ```
///
/// (this is also what `--dump` prints for it)
///
/// ## `xmind` (`.xmind`)
///
/// XMind workbook with one sheet. The tree hangs below a central topic titled
/// `Outline`; every topic gets a fresh random identifier.
///
/// ## `xlsx` (`.xlsx`)
///
/// One row per node in document order:
///
/// | Name | Outline Level |
/// |------|---------------|
/// | A    | 1             |
/// | B    | 1             |
/// | C    | 2             |
///
/// `--to-shironuri` fills every cell with white.
///
/// ## `dir_tree` (no extension)
///
/// A new directory with one sub-directory per branch and one empty file per
/// leaf. The output path must not exist yet.
pub mod output_types {
    /// Documentation for xmind output format
    pub mod xmind {
        //! XMind workbook output
    }

    /// Documentation for xlsx output format
    pub mod xlsx {
        //! Flat XLSX listing with outline levels
    }

    /// Documentation for dir_tree output format
    pub mod dir_tree {
        //! Directory tree materialization
    }
}
