use std::fs::File;
use std::io::{BufReader, SeekFrom, Write};
use std::path::Path;

use anyhow::Context;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};

use crate::error::{ConvertError, Result};
use crate::generator::xlsx::XlsxGeneratorOptions;
use crate::generator::{generators_with, Generator};
use crate::outline::Outline;
use crate::parser::{default_parsers, InputStream, Parser};

/// How much the conversion reports on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Warnings and errors only.
    #[default]
    Quiet,
    Verbose,
    Debug,
}

impl Verbosity {
    pub fn from_flags(verbose: bool, debug: bool) -> Self {
        if debug {
            Verbosity::Debug
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Quiet
        }
    }

    pub fn level_filter(self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::WARN,
            Verbosity::Verbose => LevelFilter::INFO,
            Verbosity::Debug => LevelFilter::DEBUG,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Generator name or extension; when `None` the output path's extension decides.
    pub to_type: Option<String>,
    /// Fill all cells of xlsx output with white.
    pub to_shironuri: bool,
    pub verbosity: Verbosity,
}

/// Where a conversion run sends its result.
pub enum Target<'a> {
    /// Write an artifact with the selected generator.
    File(&'a Path),
    /// Print the textual tree dump instead of writing an artifact.
    Dump(&'a mut dyn Write),
}

/// Drives one conversion: sniff, parse, then write or dump.
pub struct Converter {
    parsers: Vec<Box<dyn Parser>>,
    generators: Vec<Box<dyn Generator>>,
    options: ConvertOptions,
}

impl Converter {
    pub fn new(
        parsers: Vec<Box<dyn Parser>>,
        generators: Vec<Box<dyn Generator>>,
        options: ConvertOptions,
    ) -> Self {
        Converter {
            parsers,
            generators,
            options,
        }
    }

    pub fn with_default_formats(options: ConvertOptions) -> Self {
        let xlsx_options = XlsxGeneratorOptions {
            shironuri: options.to_shironuri,
        };
        Self::new(default_parsers(), generators_with(xlsx_options), options)
    }

    pub fn parsers(&self) -> impl Iterator<Item = &dyn Parser> {
        self.parsers.iter().map(|p| p.as_ref())
    }

    pub fn generators(&self) -> impl Iterator<Item = &dyn Generator> {
        self.generators.iter().map(|g| g.as_ref())
    }

    /// Returns the first parser, in registration order, that recognizes `input`.
    pub fn detect(&self, input: &mut dyn InputStream) -> Result<&dyn Parser> {
        for parser in self.parsers() {
            input.seek(SeekFrom::Start(0))?;
            let matched = parser.sniff(input);
            debug!(parser = parser.name(), matched, "sniffed input");
            if matched {
                return Ok(parser);
            }
        }
        Err(ConvertError::UnrecognizedFormat)
    }

    pub fn read_outline(&self, input: &mut dyn InputStream) -> Result<Outline> {
        let parser = self.detect(input)?;
        input.seek(SeekFrom::Start(0))?;
        let outline = parser.parse(input)?;
        info!(format = parser.name(), nodes = outline.node_count(), "parsed input");
        Ok(outline)
    }

    /// Picks the generator for `output`, honoring an explicit `to_type`.
    pub fn select_generator(&self, output: &Path) -> Result<&dyn Generator> {
        let found = match &self.options.to_type {
            Some(to_type) => self.generators().find(|g| {
                g.name().eq_ignore_ascii_case(to_type) || g.extension().eq_ignore_ascii_case(to_type)
            }),
            None => {
                let extension = output_extension(output);
                self.generators()
                    .find(|g| g.extension().eq_ignore_ascii_case(&extension))
            }
        };
        found.ok_or_else(|| {
            let requested = match &self.options.to_type {
                Some(to_type) => to_type.clone(),
                None => output.display().to_string(),
            };
            ConvertError::UnknownOutputFormat(requested)
        })
    }

    pub fn convert(&self, input: &mut dyn InputStream, output: &Path) -> Result<()> {
        let outline = self.read_outline(input)?;
        let generator = self.select_generator(output)?;
        info!(format = generator.name(), output = %output.display(), "writing output");
        generator.generate(&outline, output)
    }

    pub fn dump(&self, input: &mut dyn InputStream, sink: &mut dyn Write) -> Result<()> {
        let outline = self.read_outline(input)?;
        write!(sink, "{outline}")?;
        sink.flush()?;
        Ok(())
    }
}

/// Extension used for generator lookup. A dot-file such as `.xmind` counts
/// as having the extension after its leading dot.
fn output_extension(output: &Path) -> String {
    if let Some(extension) = output.extension() {
        return extension.to_string_lossy().into_owned();
    }
    output
        .file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.strip_prefix('.').map(str::to_string))
        .unwrap_or_default()
}

/// Converts the file at `input_path` with the default formats.
///
/// Log output goes to stderr through a subscriber scoped to this call.
pub fn run_conversion(input_path: &Path, target: Target<'_>, options: ConvertOptions) -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(options.verbosity.level_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let converter = Converter::with_default_formats(options);
        let file = File::open(input_path)
            .with_context(|| format!("Cannot open input file {}", input_path.display()))?;
        let mut input = BufReader::new(file);

        match target {
            Target::File(output) => converter.convert(&mut input, output)?,
            Target::Dump(sink) => converter.dump(&mut input, sink)?,
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::default_generators;
    use crate::outline::{Branch, Node};
    use crate::parser::xmind::XmindParser;
    use crate::test_support::{kplato_archive, mindmap_archive, zip_archive};
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::io::{Cursor, Read};
    use tempfile::tempdir;

    fn converter() -> Converter {
        Converter::with_default_formats(ConvertOptions::default())
    }

    fn kplato_sample() -> Vec<u8> {
        kplato_archive(r#"<task name="A"/><task name="B"><task name="C"/></task>"#)
    }

    fn expected_sample() -> Outline {
        let mut b = Branch::new();
        b.insert("C", Node::Leaf);
        let mut root = Branch::new();
        root.insert("A", Node::Leaf);
        root.insert("B", Node::Branch(b));
        Outline::from_root(root)
    }

    struct Fixed {
        name: &'static str,
        matches: bool,
    }

    impl Parser for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        fn sniff(&self, _input: &mut dyn InputStream) -> bool {
            self.matches
        }

        fn parse(&self, input: &mut dyn InputStream) -> Result<Outline> {
            let mut bytes = Vec::new();
            input.read_to_end(&mut bytes)?;
            let mut root = Branch::new();
            root.insert(self.name, Node::Leaf);
            Ok(Outline::from_root(root))
        }
    }

    struct Broken;

    impl Parser for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn sniff(&self, _input: &mut dyn InputStream) -> bool {
            true
        }

        fn parse(&self, _input: &mut dyn InputStream) -> Result<Outline> {
            Err(ConvertError::format("broken", "expected container entry missing"))
        }
    }

    #[test]
    fn test_verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(true, false), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Debug);
        assert_eq!(Verbosity::Quiet.level_filter(), LevelFilter::WARN);
        assert_eq!(Verbosity::Debug.level_filter(), LevelFilter::DEBUG);
    }

    #[test]
    fn test_detect_each_format() {
        let converter = converter();
        let cases = [
            (kplato_sample(), "kplato"),
            (mindmap_archive("<branch><heading>A</heading></branch>"), "mindmap"),
            (
                zip_archive(&[("content.xml", "<xmap-content><sheet/></xmap-content>")]),
                "xmind",
            ),
        ];
        for (bytes, expected) in cases {
            let mut input = Cursor::new(bytes);
            assert_eq!(converter.detect(&mut input).unwrap().name(), expected);
        }
    }

    #[test]
    fn test_detect_rewinds_before_sniffing() {
        let mut input = Cursor::new(kplato_sample());
        input.set_position(17);
        assert_eq!(converter().detect(&mut input).unwrap().name(), "kplato");
    }

    #[test]
    fn test_detect_is_deterministic() {
        let converter = converter();
        let mut input = Cursor::new(kplato_sample());
        for _ in 0..5 {
            assert_eq!(converter.detect(&mut input).unwrap().name(), "kplato");
        }
    }

    #[test]
    fn test_detect_unrecognized() {
        let bytes = zip_archive(&[("maindoc.xml", "<kplato><project/></kplato>")]);
        assert!(matches!(
            converter().detect(&mut Cursor::new(bytes)),
            Err(ConvertError::UnrecognizedFormat)
        ));

        let err = converter()
            .read_outline(&mut Cursor::new(b"not an archive".to_vec()))
            .unwrap_err();
        assert!(matches!(err, ConvertError::UnrecognizedFormat));
    }

    #[test]
    fn test_detect_first_registered_match_wins() {
        let converter = Converter::new(
            vec![
                Box::new(Fixed { name: "never", matches: false }),
                Box::new(Fixed { name: "first", matches: true }),
                Box::new(Fixed { name: "second", matches: true }),
            ],
            default_generators(),
            ConvertOptions::default(),
        );
        let outline = converter.read_outline(&mut Cursor::new(Vec::new())).unwrap();
        assert!(outline.root.get("first").is_some());
    }

    #[test]
    fn test_select_generator_by_extension() {
        let converter = converter();
        assert_eq!(converter.select_generator(Path::new("map.xmind")).unwrap().name(), "xmind");
        assert_eq!(converter.select_generator(Path::new("rows.XLSX")).unwrap().name(), "xlsx");
        assert_eq!(converter.select_generator(Path::new("tasks")).unwrap().name(), "dir_tree");
        assert_eq!(converter.select_generator(Path::new("out/.xmind")).unwrap().name(), "xmind");
        assert_eq!(converter.select_generator(Path::new(".XLSX")).unwrap().name(), "xlsx");
        assert!(matches!(
            converter.select_generator(Path::new(".hidden")),
            Err(ConvertError::UnknownOutputFormat(_))
        ));
        assert!(matches!(
            converter.select_generator(Path::new("map.pdf")),
            Err(ConvertError::UnknownOutputFormat(_))
        ));
    }

    #[test]
    fn test_select_generator_override() {
        let converter = Converter::with_default_formats(ConvertOptions {
            to_type: Some("xmind".to_string()),
            ..Default::default()
        });
        assert_eq!(converter.select_generator(Path::new("out.bin")).unwrap().name(), "xmind");

        let converter = Converter::with_default_formats(ConvertOptions {
            to_type: Some("freemind".to_string()),
            ..Default::default()
        });
        match converter.select_generator(Path::new("out.xmind")) {
            Err(err) => assert_eq!(err.to_string(), "unknown output format: \"freemind\""),
            Ok(generator) => panic!("unexpected generator {}", generator.name()),
        }
    }

    #[test]
    fn test_convert_kplato_to_xmind() -> anyhow::Result<()> {
        let tmp_dir = tempdir()?;
        let output = tmp_dir.path().join("plan.xmind");
        converter().convert(&mut Cursor::new(kplato_sample()), &output)?;

        let parsed = XmindParser::new().parse(&mut fs::File::open(&output)?)?;
        assert_eq!(parsed, expected_sample());
        Ok(())
    }

    #[test]
    fn test_convert_mindmap_to_directory() -> anyhow::Result<()> {
        let tmp_dir = tempdir()?;
        let output = tmp_dir.path().join("map");
        let input = mindmap_archive(
            "<branch><heading>A</heading></branch>\
             <branch><heading>B</heading><branch><heading>C</heading></branch></branch>",
        );
        converter().convert(&mut Cursor::new(input), &output)?;

        assert!(output.join("A").is_file());
        assert!(output.join("B").join("C").is_file());
        Ok(())
    }

    #[test]
    fn test_convert_empty_project() -> anyhow::Result<()> {
        let tmp_dir = tempdir()?;
        let output = tmp_dir.path().join("empty.xmind");
        converter().convert(&mut Cursor::new(kplato_archive("")), &output)?;

        let parsed = XmindParser::new().parse(&mut fs::File::open(&output)?)?;
        assert!(parsed.root.is_empty());
        Ok(())
    }

    #[test]
    fn test_convert_unknown_output_writes_nothing() -> anyhow::Result<()> {
        let tmp_dir = tempdir()?;
        let output = tmp_dir.path().join("plan.pdf");
        let err = converter()
            .convert(&mut Cursor::new(kplato_sample()), &output)
            .unwrap_err();
        assert!(matches!(err, ConvertError::UnknownOutputFormat(_)));
        assert!(!output.exists());
        Ok(())
    }

    #[test]
    fn test_convert_parse_failure_writes_nothing() -> anyhow::Result<()> {
        let converter = Converter::new(vec![Box::new(Broken)], default_generators(), ConvertOptions::default());
        let tmp_dir = tempdir()?;
        let output = tmp_dir.path().join("plan.xmind");
        let err = converter.convert(&mut Cursor::new(Vec::new()), &output).unwrap_err();
        assert!(matches!(err, ConvertError::Format { format: "broken", .. }));
        assert!(!output.exists());
        Ok(())
    }

    #[test]
    fn test_dump() {
        let mut out = Vec::new();
        converter().dump(&mut Cursor::new(kplato_sample()), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "A\nB/\n  C\n");
    }

    #[test]
    fn test_run_conversion_from_file() -> anyhow::Result<()> {
        let tmp_dir = tempdir()?;
        let input = tmp_dir.path().join("plan.kplato");
        fs::write(&input, kplato_sample())?;

        let mut out = Vec::new();
        run_conversion(&input, Target::Dump(&mut out), ConvertOptions::default())?;
        assert_eq!(String::from_utf8(out)?, "A\nB/\n  C\n");

        let output = tmp_dir.path().join("plan.xlsx");
        run_conversion(&input, Target::File(&output), ConvertOptions::default())?;
        assert!(output.is_file());
        Ok(())
    }

    #[test]
    fn test_run_conversion_to_shironuri() -> anyhow::Result<()> {
        let tmp_dir = tempdir()?;
        let input = tmp_dir.path().join("plan.kplato");
        fs::write(&input, kplato_sample())?;

        let background = |options: ConvertOptions| -> anyhow::Result<Option<String>> {
            let output = tmp_dir.path().join("plan.xlsx");
            if output.exists() {
                fs::remove_file(&output)?;
            }
            run_conversion(&input, Target::File(&output), options)?;
            let read_spreadsheet = umya_spreadsheet::reader::xlsx::read(&output).unwrap();
            let read_worksheet = read_spreadsheet.get_sheet(&0).unwrap();
            Ok(read_worksheet
                .get_cell("A2")
                .and_then(|cell| cell.get_style().get_background_color())
                .map(|color| color.get_argb().to_string()))
        };

        let white = background(ConvertOptions {
            to_shironuri: true,
            ..Default::default()
        })?;
        assert_eq!(white.as_deref(), Some(umya_spreadsheet::structs::Color::COLOR_WHITE));
        assert_eq!(background(ConvertOptions::default())?, None);
        Ok(())
    }

    #[test]
    fn test_run_conversion_missing_input() {
        let tmp_dir = tempdir().unwrap();
        let mut out = Vec::new();
        let err = run_conversion(
            &tmp_dir.path().join("missing.kplato"),
            Target::Dump(&mut out),
            ConvertOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Cannot open input file"));
    }
}
