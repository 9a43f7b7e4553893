use std::collections::HashMap;
use std::path::Path;

use folio_types::{PageRecord, VolumeId, VolumeRecord};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, QName, ResolveResult};
use quick_xml::NsReader;
use tracing::{debug, trace, warn};

use crate::error::{MetsError, MetsResult};
use crate::phase::{PageDivision, ParsePhase};

/// Namespace of METS elements.
pub const METS_NAMESPACE: &str = "http://www.loc.gov/METS/";
/// Namespace of the `href` attribute on `FLocat`.
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

const EL_FILE_GRP: &str = "fileGrp";
const EL_FILE: &str = "file";
const EL_FLOCAT: &str = "FLocat";
const EL_STRUCT_MAP: &str = "structMap";
const EL_DIV: &str = "div";
const EL_FPTR: &str = "fptr";

const ATTR_USE: &str = "USE";
const ATTR_ID: &str = "ID";
const ATTR_SIZE: &str = "SIZE";
const ATTR_CHECKSUM: &str = "CHECKSUM";
const ATTR_CHECKSUM_TYPE: &str = "CHECKSUMTYPE";
const ATTR_HREF: &str = "href";
const ATTR_TYPE: &str = "TYPE";
const ATTR_ORDER: &str = "ORDER";
const ATTR_LABEL: &str = "LABEL";
const ATTR_ORDER_LABEL: &str = "ORDERLABEL";
const ATTR_FILE_ID: &str = "FILEID";

const STRUCT_MAP_PHYSICAL: &str = "physical";
const DIV_VOLUME: &str = "volume";
const DIV_PAGE: &str = "page";

/// Parser configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParserOptions {
    /// `USE` value of the file group that holds page text.
    pub text_file_group: String,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            text_file_group: "ocr".into(),
        }
    }
}

/// Forward-only METS parser.
///
/// Stateless between calls; every parse builds a fresh [`VolumeRecord`].
#[derive(Clone, Debug, Default)]
pub struct MetsParser {
    options: ParserOptions,
}

impl MetsParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Read and parse a METS file from disk.
    pub fn parse_file(&self, volume_id: VolumeId, path: &Path) -> MetsResult<VolumeRecord> {
        let bytes = std::fs::read(path).map_err(|source| MetsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_bytes(volume_id, bytes)
    }

    /// Parse raw document bytes, which must be UTF-8.
    pub fn parse_bytes(&self, volume_id: VolumeId, bytes: Vec<u8>) -> MetsResult<VolumeRecord> {
        let document = String::from_utf8(bytes)?;
        self.parse_document(volume_id, document)
    }

    /// Parse a METS document. The document text is kept on the returned
    /// record for archival.
    pub fn parse_document(&self, volume_id: VolumeId, document: String) -> MetsResult<VolumeRecord> {
        trace!(volume = %volume_id, "parsing METS");
        let mut walk = Walk::new(&self.options, VolumeRecord::new(volume_id));
        walk.run(&document)?;

        let mut record = walk.record;
        record.recompute_page_count();
        record.set_raw_document(document);
        debug!(
            volume = %record.volume_id(),
            pages = record.page_count(),
            "parsed METS"
        );
        Ok(record)
    }
}

/// Mutable state of one parse.
struct Walk<'o> {
    options: &'o ParserOptions,
    record: VolumeRecord,
    /// Open phases with the element depth at which each was pushed.
    stack: Vec<(ParsePhase, usize)>,
    depth: usize,
    /// File descriptor awaiting its location before it can be indexed.
    current_page: Option<PageRecord>,
    pending_division: Option<PageDivision>,
}

impl<'o> Walk<'o> {
    fn new(options: &'o ParserOptions, record: VolumeRecord) -> Self {
        Self {
            options,
            record,
            stack: Vec::new(),
            depth: 0,
            current_page: None,
            pending_division: None,
        }
    }

    fn run(&mut self, document: &str) -> MetsResult<()> {
        let mut reader = NsReader::from_str(document);
        loop {
            let event = reader.read_event().map_err(|source| MetsError::Xml {
                position: reader.buffer_position() as u64,
                source,
            })?;
            match event {
                Event::Start(e) => {
                    self.depth += 1;
                    self.start(&reader, &e)?;
                }
                Event::Empty(e) => {
                    self.depth += 1;
                    self.start(&reader, &e)?;
                    self.end();
                    self.depth -= 1;
                }
                Event::End(_) => {
                    self.end();
                    self.depth = self.depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
        }
        if self.depth != 0 {
            return Err(MetsError::Truncated {
                open_elements: self.depth,
            });
        }
        Ok(())
    }

    fn start(&mut self, reader: &NsReader<&[u8]>, e: &BytesStart<'_>) -> MetsResult<()> {
        let Some(name) = mets_local_name(reader, e.name()) else {
            return Ok(());
        };
        let top = self.stack.last().map(|&(phase, _)| phase);
        trace!(element = name, phase = ?top, "start");

        match (top, name.as_str()) {
            (None, EL_FILE_GRP) => {
                let attrs = Attributes::read(reader, e)?;
                if attrs.get(ATTR_USE) == Some(self.options.text_file_group.as_str()) {
                    self.push(ParsePhase::OcrFileGrp);
                }
            }
            (None, EL_STRUCT_MAP) => {
                let attrs = Attributes::read(reader, e)?;
                if attrs.get(ATTR_TYPE) == Some(STRUCT_MAP_PHYSICAL) {
                    self.push(ParsePhase::StructMap);
                }
            }
            (Some(ParsePhase::OcrFileGrp), EL_FILE) => {
                let attrs = Attributes::read(reader, e)?;
                self.file_descriptor(&attrs);
            }
            (Some(ParsePhase::File), EL_FLOCAT) => {
                let attrs = Attributes::read(reader, e)?;
                self.file_location(&attrs);
            }
            (Some(ParsePhase::StructMap), EL_DIV) => {
                let attrs = Attributes::read(reader, e)?;
                if attrs.get(ATTR_TYPE) == Some(DIV_VOLUME) {
                    self.push(ParsePhase::VolumeDiv);
                }
            }
            (Some(ParsePhase::VolumeDiv), EL_DIV) => {
                let attrs = Attributes::read(reader, e)?;
                self.page_division(&attrs);
            }
            (Some(ParsePhase::PageDiv), EL_FPTR) => {
                let attrs = Attributes::read(reader, e)?;
                self.file_pointer(&attrs);
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self) {
        let Some(&(phase, depth)) = self.stack.last() else {
            return;
        };
        if depth != self.depth {
            return;
        }
        self.stack.pop();
        trace!(?phase, "end");
        match phase {
            ParsePhase::OcrFileGrp | ParsePhase::File | ParsePhase::FLocat => {
                self.current_page = None;
            }
            ParsePhase::StructMap | ParsePhase::VolumeDiv | ParsePhase::PageDiv => {
                self.pending_division = None;
            }
            ParsePhase::OcrFptr => {}
        }
    }

    fn push(&mut self, phase: ParsePhase) {
        self.stack.push((phase, self.depth));
    }

    fn file_descriptor(&mut self, attrs: &Attributes) {
        let volume = self.record.volume_id();
        let Some(id) = attrs.get(ATTR_ID) else {
            warn!(volume = %volume, "file descriptor without ID");
            return;
        };
        if self.record.contains_id(id) {
            warn!(volume = %volume, file_id = id, "duplicate file ID; keeping first occurrence");
            return;
        }

        let byte_count = match attrs.get(ATTR_SIZE).map(|s| s.trim().parse::<u64>()) {
            Some(Ok(size)) => size,
            other => {
                warn!(volume = %volume, file_id = id, size = ?other, "missing or invalid SIZE; assuming 0");
                0
            }
        };

        let mut page = PageRecord::new(id);
        page.byte_count = byte_count;
        page.checksum = attrs.get(ATTR_CHECKSUM).unwrap_or_default().to_owned();
        page.checksum_type = attrs.get(ATTR_CHECKSUM_TYPE).unwrap_or_default().to_owned();
        trace!(file_id = id, size = byte_count, checksum = %page.checksum, "file descriptor");

        self.current_page = Some(page);
        self.push(ParsePhase::File);
    }

    fn file_location(&mut self, attrs: &Attributes) {
        let volume = self.record.volume_id().clone();
        let Some(href) = attrs.get_xlink(ATTR_HREF) else {
            warn!(volume = %volume, "FLocat without xlink:href");
            return;
        };
        let Some(mut page) = self.current_page.take() else {
            warn!(volume = %volume, href, "FLocat outside a pending file descriptor");
            return;
        };
        page.filename = href.to_owned();
        // Indexed only now: the filename is the join key for archive entries.
        self.record.add_page(page);
        self.push(ParsePhase::FLocat);
    }

    fn page_division(&mut self, attrs: &Attributes) {
        let volume = self.record.volume_id();
        if attrs.get(ATTR_TYPE) != Some(DIV_PAGE) {
            warn!(volume = %volume, div_type = ?attrs.get(ATTR_TYPE), "non-page div inside volume div");
            return;
        }

        let order = match attrs.get(ATTR_ORDER).map(|s| s.trim().parse::<u32>()) {
            Some(Ok(order)) => order,
            other => {
                warn!(volume = %volume, order = ?other, "page div without a usable ORDER; assuming 0");
                0
            }
        };
        self.pending_division = Some(PageDivision {
            order,
            label: attrs.get(ATTR_LABEL).map(str::to_owned),
            order_label: attrs.get(ATTR_ORDER_LABEL).map(str::to_owned),
        });
        self.push(ParsePhase::PageDiv);
    }

    fn file_pointer(&mut self, attrs: &Attributes) {
        let Some(file_id) = attrs.get(ATTR_FILE_ID) else {
            return;
        };
        let Some(division) = self.pending_division.as_ref() else {
            debug!(volume = %self.record.volume_id(), file_id, "fptr without a pending page div");
            return;
        };
        let Some(page) = self.record.page_by_id_mut(file_id) else {
            // Points at a file outside the text group (images, coordinates).
            return;
        };

        page.order = division.order;
        page.label = division.order_label.clone();
        if let Some(label) = division.label.as_deref().filter(|l| !l.trim().is_empty()) {
            for feature in label.split(',').map(str::trim).filter(|f| !f.is_empty()) {
                page.add_feature(feature);
            }
        }
        trace!(file_id, order = page.order, features = ?page.features, "page pointer");
        self.push(ParsePhase::OcrFptr);
    }
}

/// Resolve an element name, returning its local name only when it lives in
/// the METS namespace.
fn mets_local_name(reader: &NsReader<&[u8]>, name: QName<'_>) -> Option<String> {
    let (ns, local) = reader.resolve_element(name);
    match ns {
        ResolveResult::Bound(Namespace(uri)) if uri == METS_NAMESPACE.as_bytes() => {
            Some(String::from_utf8_lossy(local.as_ref()).into_owned())
        }
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum AttrNamespace {
    Unqualified,
    XLink,
    Other,
}

/// Attributes of one start tag, keyed by namespace and local name.
struct Attributes(HashMap<(AttrNamespace, String), String>);

impl Attributes {
    fn read(reader: &NsReader<&[u8]>, e: &BytesStart<'_>) -> MetsResult<Self> {
        let xml_err = |source: quick_xml::Error| MetsError::Xml {
            position: reader.buffer_position() as u64,
            source,
        };

        let mut map = HashMap::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| xml_err(err.into()))?;
            let (ns, local) = reader.resolve_attribute(attr.key);
            let ns = match ns {
                ResolveResult::Unbound => AttrNamespace::Unqualified,
                ResolveResult::Bound(Namespace(uri)) if uri == XLINK_NAMESPACE.as_bytes() => {
                    AttrNamespace::XLink
                }
                _ => AttrNamespace::Other,
            };
            let value = attr.unescape_value().map_err(xml_err)?.into_owned();
            let local = String::from_utf8_lossy(local.as_ref()).into_owned();
            map.insert((ns, local), value);
        }
        Ok(Self(map))
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.lookup(AttrNamespace::Unqualified, name)
    }

    fn get_xlink(&self, name: &str) -> Option<&str> {
        self.lookup(AttrNamespace::XLink, name)
    }

    fn lookup(&self, ns: AttrNamespace, name: &str) -> Option<&str> {
        self.0.get(&(ns, name.to_owned())).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{FixturePage, MetsBuilder};

    fn vid() -> VolumeId {
        VolumeId::parse("mdp.39015000000001").unwrap()
    }

    fn parse(doc: &str) -> VolumeRecord {
        MetsParser::default()
            .parse_document(vid(), doc.to_string())
            .unwrap()
    }

    fn three_pages() -> String {
        MetsBuilder::new()
            .page(
                FixturePage::new("OCR1", "00000001.txt", 1)
                    .size(10)
                    .checksum("aaa", "MD5")
                    .order_label("i")
                    .label("FRONT_COVER, IMAGE_ON_PAGE"),
            )
            .page(FixturePage::new("OCR2", "00000002.txt", 2).size(20).checksum("bbb", "MD5"))
            .page(FixturePage::new("OCR3", "00000003.txt", 3).size(30).checksum("ccc", "SHA-1"))
            .build()
    }

    #[test]
    fn parses_declared_fields() {
        let vol = parse(&three_pages());
        assert_eq!(vol.page_count(), 3);

        let p1 = vol.page_by_filename("00000001.txt").unwrap();
        assert_eq!(p1.file_id, "OCR1");
        assert_eq!(p1.byte_count, 10);
        assert_eq!(p1.checksum, "aaa");
        assert_eq!(p1.checksum_type, "MD5");
        assert_eq!(p1.order, 1);
        assert_eq!(p1.label.as_deref(), Some("i"));
        assert_eq!(p1.features, vec!["FRONT_COVER", "IMAGE_ON_PAGE"]);
        assert!(p1.sequence.is_none());

        let p3 = vol.page_by_id("OCR3").unwrap();
        assert_eq!(p3.filename, "00000003.txt");
        assert_eq!(p3.checksum_type, "SHA-1");
        assert!(p3.features.is_empty());
    }

    #[test]
    fn keeps_raw_document() {
        let doc = three_pages();
        let vol = parse(&doc);
        assert_eq!(vol.raw_document(), doc);
    }

    #[test]
    fn parsing_is_idempotent() {
        let doc = three_pages();
        let a = parse(&doc);
        let b = parse(&doc);
        assert_eq!(a.filenames(), b.filenames());
        for name in a.filenames() {
            assert_eq!(a.page_by_filename(name), b.page_by_filename(name));
        }
    }

    #[test]
    fn ignores_other_file_groups() {
        let doc = MetsBuilder::new()
            .image_group(true)
            .page(FixturePage::new("OCR1", "00000001.txt", 1))
            .build();
        let vol = parse(&doc);
        assert_eq!(vol.filenames().into_iter().collect::<Vec<_>>(), vec!["00000001.txt"]);
        assert!(vol.page_by_id("IMG1").is_none());
    }

    #[test]
    fn custom_text_file_group() {
        let doc = MetsBuilder::new()
            .text_group("plaintext")
            .page(FixturePage::new("TXT1", "00000001.txt", 1))
            .build();
        assert_eq!(parse(&doc).page_count(), 0);

        let parser = MetsParser::new(ParserOptions {
            text_file_group: "plaintext".into(),
        });
        let vol = parser.parse_document(vid(), doc).unwrap();
        assert_eq!(vol.page_count(), 1);
    }

    #[test]
    fn duplicate_file_id_keeps_first() {
        let doc = MetsBuilder::new()
            .page(FixturePage::new("OCR1", "00000001.txt", 1).checksum("first", "MD5"))
            .page(FixturePage::new("OCR1", "00000002.txt", 2).checksum("second", "MD5"))
            .build();
        let vol = parse(&doc);
        assert_eq!(vol.page_count(), 1);
        assert_eq!(vol.page_by_id("OCR1").unwrap().checksum, "first");
        assert!(vol.page_by_filename("00000002.txt").is_none());
    }

    #[test]
    fn file_without_id_is_skipped() {
        let doc = r#"<METS:mets xmlns:METS="http://www.loc.gov/METS/" xmlns:xlink="http://www.w3.org/1999/xlink">
            <METS:fileSec><METS:fileGrp USE="ocr">
                <METS:file SIZE="1"><METS:FLocat xlink:href="orphan.txt"/></METS:file>
            </METS:fileGrp></METS:fileSec></METS:mets>"#;
        let vol = parse(doc);
        assert_eq!(vol.page_count(), 0);
    }

    #[test]
    fn invalid_size_defaults_to_zero() {
        let doc = r#"<METS:mets xmlns:METS="http://www.loc.gov/METS/" xmlns:xlink="http://www.w3.org/1999/xlink">
            <METS:fileSec><METS:fileGrp USE="ocr">
                <METS:file ID="OCR1" SIZE="lots"><METS:FLocat xlink:href="a.txt"/></METS:file>
            </METS:fileGrp></METS:fileSec></METS:mets>"#;
        let vol = parse(doc);
        assert_eq!(vol.page_by_filename("a.txt").unwrap().byte_count, 0);
    }

    #[test]
    fn href_requires_xlink_namespace() {
        let doc = r#"<METS:mets xmlns:METS="http://www.loc.gov/METS/">
            <METS:fileSec><METS:fileGrp USE="ocr">
                <METS:file ID="OCR1" SIZE="1"><METS:FLocat href="a.txt"/></METS:file>
            </METS:fileGrp></METS:fileSec></METS:mets>"#;
        assert_eq!(parse(doc).page_count(), 0);
    }

    #[test]
    fn elements_outside_mets_namespace_are_ignored() {
        let doc = r#"<mets xmlns:xlink="http://www.w3.org/1999/xlink">
            <fileGrp USE="ocr">
                <file ID="OCR1" SIZE="1"><FLocat xlink:href="a.txt"/></file>
            </fileGrp></mets>"#;
        assert_eq!(parse(doc).page_count(), 0);
    }

    #[test]
    fn default_namespace_is_honoured() {
        let doc = r#"<mets xmlns="http://www.loc.gov/METS/" xmlns:xlink="http://www.w3.org/1999/xlink">
            <fileGrp USE="ocr">
                <file ID="OCR1" SIZE="1"><FLocat xlink:href="a.txt"/></file>
            </fileGrp>
            <structMap TYPE="physical"><div TYPE="volume">
                <div TYPE="page" ORDER="4"><fptr FILEID="OCR1"/></div>
            </div></structMap></mets>"#;
        let vol = parse(doc);
        assert_eq!(vol.page_by_filename("a.txt").unwrap().order, 4);
    }

    #[test]
    fn missing_order_yields_zero() {
        let doc = MetsBuilder::new()
            .page(FixturePage::new("OCR1", "00000001.txt", 1).without_order())
            .build();
        let vol = parse(&doc);
        assert_eq!(vol.page_by_id("OCR1").unwrap().order, 0);
    }

    #[test]
    fn non_numeric_order_yields_zero() {
        let doc = MetsBuilder::new()
            .page(FixturePage::new("OCR1", "00000001.txt", 1).raw_order("seven"))
            .build();
        assert_eq!(parse(&doc).page_by_id("OCR1").unwrap().order, 0);
    }

    #[test]
    fn pointer_to_untracked_file_is_tolerated() {
        let doc = MetsBuilder::new()
            .image_group(true)
            .page(FixturePage::new("OCR1", "00000001.txt", 1).order_label("1"))
            .build();
        // Each page div points at IMG1 before OCR1; only OCR1 is tracked.
        let vol = parse(&doc);
        let page = vol.page_by_id("OCR1").unwrap();
        assert_eq!(page.order, 1);
        assert_eq!(page.label.as_deref(), Some("1"));
    }

    #[test]
    fn blank_feature_label_adds_nothing() {
        let doc = MetsBuilder::new()
            .page(FixturePage::new("OCR1", "00000001.txt", 1).label("  "))
            .page(FixturePage::new("OCR2", "00000002.txt", 2).label("A,, B ,"))
            .build();
        let vol = parse(&doc);
        assert!(vol.page_by_id("OCR1").unwrap().features.is_empty());
        assert_eq!(vol.page_by_id("OCR2").unwrap().features, vec!["A", "B"]);
    }

    #[test]
    fn logical_struct_map_is_ignored() {
        let doc = r#"<METS:mets xmlns:METS="http://www.loc.gov/METS/" xmlns:xlink="http://www.w3.org/1999/xlink">
            <METS:fileSec><METS:fileGrp USE="ocr">
                <METS:file ID="OCR1" SIZE="1"><METS:FLocat xlink:href="a.txt"/></METS:file>
            </METS:fileGrp></METS:fileSec>
            <METS:structMap TYPE="logical"><METS:div TYPE="volume">
                <METS:div TYPE="page" ORDER="9"><METS:fptr FILEID="OCR1"/></METS:div>
            </METS:div></METS:structMap></METS:mets>"#;
        assert_eq!(parse(doc).page_by_id("OCR1").unwrap().order, 0);
    }

    #[test]
    fn nested_unrecognized_div_does_not_close_volume() {
        let doc = r#"<METS:mets xmlns:METS="http://www.loc.gov/METS/" xmlns:xlink="http://www.w3.org/1999/xlink">
            <METS:fileSec><METS:fileGrp USE="ocr">
                <METS:file ID="OCR1" SIZE="1"><METS:FLocat xlink:href="a.txt"/></METS:file>
                <METS:file ID="OCR2" SIZE="1"><METS:FLocat xlink:href="b.txt"/></METS:file>
            </METS:fileGrp></METS:fileSec>
            <METS:structMap TYPE="physical"><METS:div TYPE="volume">
                <METS:div TYPE="section"></METS:div>
                <METS:div TYPE="page" ORDER="1"><METS:fptr FILEID="OCR1"/></METS:div>
                <METS:div TYPE="page" ORDER="2"><METS:fptr FILEID="OCR2"/></METS:div>
            </METS:div></METS:structMap></METS:mets>"#;
        let vol = parse(doc);
        assert_eq!(vol.page_by_id("OCR1").unwrap().order, 1);
        assert_eq!(vol.page_by_id("OCR2").unwrap().order, 2);
    }

    #[test]
    fn escaped_attribute_values_are_unescaped() {
        let doc = MetsBuilder::new()
            .page(FixturePage::new("OCR1", "00000001.txt", 1).order_label("A&amp;B"))
            .build();
        assert_eq!(
            parse(&doc).page_by_id("OCR1").unwrap().label.as_deref(),
            Some("A&B")
        );
    }

    #[test]
    fn invalid_utf8_aborts() {
        let err = MetsParser::default()
            .parse_bytes(vid(), vec![b'<', 0xff, 0xfe, b'>'])
            .unwrap_err();
        assert!(matches!(err, MetsError::Encoding(_)));
    }

    #[test]
    fn mismatched_end_tag_aborts() {
        let doc = r#"<METS:mets xmlns:METS="http://www.loc.gov/METS/"><METS:fileSec></METS:mets>"#;
        let err = MetsParser::default()
            .parse_document(vid(), doc.to_string())
            .unwrap_err();
        assert!(matches!(err, MetsError::Xml { .. }));
    }

    #[test]
    fn truncated_document_aborts() {
        let doc = r#"<METS:mets xmlns:METS="http://www.loc.gov/METS/"><METS:fileSec>"#;
        let err = MetsParser::default()
            .parse_document(vid(), doc.to_string())
            .unwrap_err();
        assert!(matches!(err, MetsError::Truncated { open_elements: 2 }));
    }

    #[test]
    fn parse_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vol.mets.xml");
        std::fs::write(&path, three_pages()).unwrap();
        let vol = MetsParser::default().parse_file(vid(), &path).unwrap();
        assert_eq!(vol.page_count(), 3);

        let missing = MetsParser::default().parse_file(vid(), &dir.path().join("nope.xml"));
        assert!(matches!(missing, Err(MetsError::Io { .. })));
    }

    #[test]
    fn large_volume_parses_every_page() {
        let mut builder = MetsBuilder::new();
        for i in 1..=2_000u32 {
            builder = builder.page(FixturePage::new(
                format!("OCR{i}"),
                format!("{i:08}.txt"),
                i,
            ));
        }
        let vol = parse(&builder.build());
        assert_eq!(vol.page_count(), 2_000);
        assert_eq!(vol.page_by_filename("00001500.txt").unwrap().order, 1500);
    }
}
