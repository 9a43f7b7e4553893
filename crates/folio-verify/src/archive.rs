//! Sequential page archives.

use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Cursor, Read};

use flate2::bufread::DeflateDecoder;
use tracing::trace;

use crate::error::{VerifyError, VerifyResult};

/// One named entry of a page archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Stored path of the entry inside the archive.
    pub name: String,
    pub data: Vec<u8>,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Final path segment of the stored name.
    pub fn filename(&self) -> &str {
        entry_filename(&self.name)
    }

    pub fn is_directory(&self) -> bool {
        self.name.ends_with('/')
    }
}

/// Final segment of an archive path; empty for directory entries.
pub fn entry_filename(name: &str) -> &str {
    match name.rfind('/') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

/// Forward-only source of archive entries.
///
/// Each entry is yielded exactly once, in archive order. Implementations
/// never seek or rewind.
pub trait ArchiveReader {
    /// The next entry, or `Ok(None)` when the archive is exhausted.
    fn next_entry(&mut self) -> VerifyResult<Option<ArchiveEntry>>;
}

const LOCAL_FILE_HEADER: &[u8] = b"PK\x03\x04";
const CENTRAL_DIRECTORY: &[u8] = b"PK\x01\x02";
const END_OF_CENTRAL_DIRECTORY: &[u8] = b"PK\x05\x06";
const DATA_DESCRIPTOR: &[u8] = b"PK\x07\x08";

/// Fixed part of a local file header.
const LOCAL_HEADER_LEN: usize = 30;

const FLAG_ENCRYPTED: u16 = 0x0001;
/// Sizes and CRC follow the entry data instead of the header.
const FLAG_DATA_DESCRIPTOR: u16 = 0x0008;
const METHOD_DEFLATED: u16 = 8;

fn le_u16(buf: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([buf[at], buf[at + 1]])
}

fn le_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

/// Reads zip local headers from any byte stream, without the central
/// directory.
///
/// Entries whose sizes are deferred to a trailing data descriptor (the
/// layout streaming zip writers produce) are inflated until the deflate
/// stream ends and then checked against the descriptor.
pub struct ZipStreamReader<R> {
    inner: BufReader<R>,
    finished: bool,
}

impl<R: Read> ZipStreamReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            finished: false,
        }
    }

    /// An archive with no entries starts directly with its end record,
    /// which the local-header reader does not accept.
    fn at_end_record(&mut self) -> VerifyResult<bool> {
        let buf = self.inner.fill_buf()?;
        Ok(buf.is_empty()
            || buf.starts_with(END_OF_CENTRAL_DIRECTORY)
            || buf.starts_with(CENTRAL_DIRECTORY))
    }

    /// Entry with sizes deferred to a data descriptor. `header` has been
    /// consumed; the name and extra field have not.
    fn read_deferred_entry(&mut self, header: &[u8; LOCAL_HEADER_LEN]) -> VerifyResult<ArchiveEntry> {
        let flags = le_u16(header, 6);
        let method = le_u16(header, 8);
        let mut name = vec![0u8; le_u16(header, 26) as usize];
        self.inner.read_exact(&mut name)?;
        let name = String::from_utf8_lossy(&name).into_owned();
        let extra_len = u64::from(le_u16(header, 28));
        io::copy(&mut (&mut self.inner).take(extra_len), &mut io::sink())?;

        if flags & FLAG_ENCRYPTED != 0 {
            return Err(VerifyError::UnsupportedEntry {
                entry: name,
                reason: "encrypted entry",
            });
        }
        if method != METHOD_DEFLATED {
            // Without a size only a self-terminating stream can be read.
            return Err(VerifyError::UnsupportedEntry {
                entry: name,
                reason: "deferred sizes on a non-deflated entry",
            });
        }

        let mut data = Vec::new();
        DeflateDecoder::new(&mut self.inner).read_to_end(&mut data)?;

        if self.inner.fill_buf()?.starts_with(DATA_DESCRIPTOR) {
            self.inner.consume(DATA_DESCRIPTOR.len());
        }
        let mut descriptor = [0u8; 12];
        self.inner.read_exact(&mut descriptor)?;
        let expected_crc = le_u32(&descriptor, 0);
        let expected_size = le_u32(&descriptor, 8);

        if expected_size != data.len() as u32 {
            return Err(VerifyError::CorruptEntry {
                entry: name,
                reason: format!("descriptor size {expected_size}, inflated {}", data.len()),
            });
        }
        let actual_crc = crc32fast::hash(&data);
        if expected_crc != actual_crc {
            return Err(VerifyError::CorruptEntry {
                entry: name,
                reason: format!("descriptor crc {expected_crc:08x}, computed {actual_crc:08x}"),
            });
        }
        Ok(ArchiveEntry { name, data })
    }
}

impl<R: Read> ArchiveReader for ZipStreamReader<R> {
    fn next_entry(&mut self) -> VerifyResult<Option<ArchiveEntry>> {
        if self.finished || self.at_end_record()? {
            self.finished = true;
            return Ok(None);
        }

        let mut header = [0u8; LOCAL_HEADER_LEN];
        self.inner.read_exact(&mut header)?;
        if header.starts_with(LOCAL_FILE_HEADER) && le_u16(&header, 6) & FLAG_DATA_DESCRIPTOR != 0 {
            let entry = self.read_deferred_entry(&header)?;
            trace!(entry = %entry.name, bytes = entry.data.len(), "read deferred-size zip entry");
            return Ok(Some(entry));
        }

        // Hand the header back in front of the stream for the zip reader.
        let mut stream = Cursor::new(header).chain(&mut self.inner);
        let Some(mut file) = zip::read::read_zipfile_from_stream(&mut stream)? else {
            self.finished = true;
            return Ok(None);
        };

        let name = file.name().to_owned();
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;
        trace!(entry = %name, bytes = data.len(), "read zip entry");
        Ok(Some(ArchiveEntry { name, data }))
    }
}

/// Archive held in memory; yields entries in insertion order.
#[derive(Clone, Debug, Default)]
pub struct MemoryArchive {
    entries: VecDeque<ArchiveEntry>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.push(name, data);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.entries.push_back(ArchiveEntry::new(name, data));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ArchiveReader for MemoryArchive {
    fn next_entry(&mut self) -> VerifyResult<Option<ArchiveEntry>> {
        Ok(self.entries.pop_front())
    }
}
