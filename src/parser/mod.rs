//! Input parsers.
//!
//! Each parser recognizes one container format and builds the canonical
//! [`Outline`](crate::outline::Outline) from it.

pub mod archive;
pub mod base;
pub mod element;
pub mod kplato;
pub mod mindmap;
pub mod xmind;

pub use base::{InputStream, Parser};

/// The registered parsers, in sniffing order.
pub fn default_parsers() -> Vec<Box<dyn Parser>> {
    vec![
        Box::new(kplato::KplatoParser::new()),
        Box::new(mindmap::MindMapParser::new()),
        Box::new(xmind::XmindParser::new()),
    ]
}
