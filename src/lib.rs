pub mod cli;
pub mod docs;
pub mod error;
pub mod generator;
pub mod outline;
pub mod parser;

#[cfg(test)]
mod test_support;

pub use error::ConvertError;
pub use outline::{Branch, Node, Outline};

pub fn get_parser_types() -> Vec<String> {
    parser::default_parsers()
        .iter()
        .map(|p| p.name().to_string())
        .collect()
}

pub fn get_generator_types() -> Vec<String> {
    generator::default_generators()
        .iter()
        .map(|g| g.name().to_string())
        .collect()
}
