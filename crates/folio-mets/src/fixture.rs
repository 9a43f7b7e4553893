//! Builder for small METS documents used in tests.
//!
//! Attribute values are written verbatim, so callers can embed entity
//! references or deliberately malformed values.

use std::fmt::Write;

/// One page as it appears in both the file section and the structure map.
#[derive(Clone, Debug)]
pub struct FixturePage {
    id: String,
    href: String,
    size: Option<String>,
    checksum: Option<(String, String)>,
    order: Option<String>,
    order_label: Option<String>,
    label: Option<String>,
}

impl FixturePage {
    pub fn new(id: impl Into<String>, href: impl Into<String>, order: u32) -> Self {
        Self {
            id: id.into(),
            href: href.into(),
            size: Some("0".into()),
            checksum: None,
            order: Some(order.to_string()),
            order_label: None,
            label: None,
        }
    }

    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size.to_string());
        self
    }

    pub fn checksum(mut self, value: impl Into<String>, algorithm: impl Into<String>) -> Self {
        self.checksum = Some((value.into(), algorithm.into()));
        self
    }

    pub fn order_label(mut self, label: impl Into<String>) -> Self {
        self.order_label = Some(label.into());
        self
    }

    /// Comma-separated feature list.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn without_order(mut self) -> Self {
        self.order = None;
        self
    }

    pub fn raw_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn href(&self) -> &str {
        &self.href
    }
}

/// Assembles a METS document with a text file group, an optional image file
/// group, and a physical structure map pointing at both.
#[derive(Clone, Debug)]
pub struct MetsBuilder {
    text_group: String,
    with_images: bool,
    pages: Vec<FixturePage>,
}

impl Default for MetsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetsBuilder {
    pub fn new() -> Self {
        Self {
            text_group: "ocr".into(),
            with_images: false,
            pages: Vec::new(),
        }
    }

    pub fn text_group(mut self, name: impl Into<String>) -> Self {
        self.text_group = name.into();
        self
    }

    /// Also emit an image file per page, referenced from each page div
    /// ahead of the text file.
    pub fn image_group(mut self, enabled: bool) -> Self {
        self.with_images = enabled;
        self
    }

    pub fn page(mut self, page: FixturePage) -> Self {
        self.pages.push(page);
        self
    }

    pub fn build(&self) -> String {
        let mut out = String::new();
        out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        out.push('\n');
        out.push_str(
            r#"<METS:mets xmlns:METS="http://www.loc.gov/METS/" xmlns:xlink="http://www.w3.org/1999/xlink">"#,
        );
        out.push_str("\n  <METS:fileSec>\n");

        if self.with_images {
            out.push_str("    <METS:fileGrp USE=\"image\">\n");
            for (i, page) in self.pages.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "      <METS:file ID=\"IMG{n}\" SIZE=\"1\"><METS:FLocat LOCTYPE=\"OTHER\" xlink:href=\"{stem}.jp2\"/></METS:file>",
                    n = i + 1,
                    stem = page.href.trim_end_matches(".txt"),
                );
            }
            out.push_str("    </METS:fileGrp>\n");
        }

        let _ = writeln!(out, "    <METS:fileGrp USE=\"{}\">", self.text_group);
        for page in &self.pages {
            let _ = write!(out, "      <METS:file ID=\"{}\"", page.id);
            if let Some(size) = &page.size {
                let _ = write!(out, " SIZE=\"{size}\"");
            }
            if let Some((value, algorithm)) = &page.checksum {
                let _ = write!(out, " CHECKSUM=\"{value}\" CHECKSUMTYPE=\"{algorithm}\"");
            }
            let _ = writeln!(out, " MIMETYPE=\"text/plain\">");
            let _ = writeln!(
                out,
                "        <METS:FLocat LOCTYPE=\"OTHER\" OTHERLOCTYPE=\"SYSTEM\" xlink:href=\"{}\"/>",
                page.href
            );
            out.push_str("      </METS:file>\n");
        }
        out.push_str("    </METS:fileGrp>\n  </METS:fileSec>\n");

        out.push_str("  <METS:structMap TYPE=\"physical\">\n    <METS:div TYPE=\"volume\">\n");
        for (i, page) in self.pages.iter().enumerate() {
            out.push_str("      <METS:div TYPE=\"page\"");
            if let Some(order) = &page.order {
                let _ = write!(out, " ORDER=\"{order}\"");
            }
            if let Some(label) = &page.order_label {
                let _ = write!(out, " ORDERLABEL=\"{label}\"");
            }
            if let Some(label) = &page.label {
                let _ = write!(out, " LABEL=\"{label}\"");
            }
            out.push_str(">\n");
            if self.with_images {
                let _ = writeln!(out, "        <METS:fptr FILEID=\"IMG{}\"/>", i + 1);
            }
            let _ = writeln!(out, "        <METS:fptr FILEID=\"{}\"/>", page.id);
            out.push_str("      </METS:div>\n");
        }
        out.push_str("    </METS:div>\n  </METS:structMap>\n</METS:mets>\n");
        out
    }
}
