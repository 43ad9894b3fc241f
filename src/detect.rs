//! Signature-based file type detection.
//!
//! Every entry point reduces its source to a [`ProbeHeader`] and hands it to
//! [`Detector::detect_header`].  That step is pure and infallible: when no
//! signature matches the result is `.dat`.  Only the reader and path wrappers
//! can fail, and only because of I/O.
//!
//! # RIFF
//! The table maps `52494646` to both `.wav` and `.avi`.  [`RiffPolicy`] picks
//! how that is resolved:
//!
//! | Policy | Bytes read | `RIFF....AVI ` | `RIFF....WAVE` | `RIFF` only |
//! |--------|-----------:|----------------|----------------|-------------|
//! | `FirstMatch` (default) | 8 | `.wav` | `.wav` | `.wav` |
//! | `FormType` | 12 | `.avi` | `.wav` | `.wav` |

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tokio::io::AsyncRead;
use tracing::{debug, trace};

use crate::error::{Result, SniffError};
use crate::probe::{self, ProbeHeader, PROBE_LEN, RIFF_PROBE_LEN};
use crate::signature::{FileKind, SignatureTable, RIFF_PREFIX};

/// How the duplicated RIFF prefix is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RiffPolicy {
    /// Plain first-match over 8 bytes.  The `.avi` entry is unreachable.
    #[default]
    FirstMatch,
    /// Read the form tag at bytes 8..12 and return `.avi` for `AVI `.
    FormType,
}

/// RIFF form tag identifying an AVI container.
pub const RIFF_FORM_AVI: &[u8; 4] = b"AVI ";

/// Stateless, `Copy` detector.  Cheap to build per call or share freely.
#[derive(Debug, Clone, Copy)]
pub struct Detector {
    table: SignatureTable,
    riff:  RiffPolicy,
}

impl Detector {
    pub fn new() -> Self {
        Self {
            table: SignatureTable::builtin(),
            riff:  RiffPolicy::FirstMatch,
        }
    }

    pub fn with_riff_policy(mut self, riff: RiffPolicy) -> Self {
        self.riff = riff;
        self
    }

    /// Swap in a different ordered table.
    pub fn with_table(mut self, table: SignatureTable) -> Self {
        self.table = table;
        self
    }

    pub fn riff_policy(&self) -> RiffPolicy {
        self.riff
    }

    pub fn table(&self) -> &SignatureTable {
        &self.table
    }

    /// Leading bytes this detector needs from a source.
    pub fn probe_len(&self) -> usize {
        match self.riff {
            RiffPolicy::FirstMatch => PROBE_LEN,
            RiffPolicy::FormType   => RIFF_PROBE_LEN,
        }
    }

    /// Build the probe header this detector would match against.
    pub fn probe(&self, bytes: &[u8]) -> ProbeHeader {
        let header = ProbeHeader::from_bytes(bytes);
        match self.riff {
            RiffPolicy::FirstMatch => header.without_riff_form(),
            RiffPolicy::FormType   => header,
        }
    }

    /// Match a prepared header against the table.
    pub fn detect_header(&self, header: &ProbeHeader) -> FileKind {
        trace!(header = header.hex(), "probing");
        let Some((index, sig)) = self.table.first_match(header.hex()) else {
            debug!(header = header.hex(), "no signature matched");
            return FileKind::Unknown;
        };

        if self.riff == RiffPolicy::FormType
            && sig.prefix == RIFF_PREFIX
            && header.riff_form() == Some(RIFF_FORM_AVI)
            && self.table.entries().iter().any(|s| s.kind == FileKind::Avi)
        {
            debug!(header = header.hex(), "RIFF form tag selects .avi");
            return FileKind::Avi;
        }

        debug!(header = header.hex(), index, kind = %sig.kind, "signature matched");
        sig.kind
    }

    pub fn detect_bytes(&self, bytes: &[u8]) -> FileKind {
        self.detect_header(&self.probe(bytes))
    }

    /// Read at most [`probe_len`](Self::probe_len) bytes from `reader` and
    /// detect.  The reader is left positioned after the bytes consumed.
    pub fn detect_reader<R: Read>(&self, reader: &mut R) -> Result<FileKind> {
        let head = probe::read_leading(reader, self.probe_len())?;
        Ok(self.detect_bytes(&head))
    }

    pub async fn detect_async<R>(&self, reader: &mut R) -> Result<FileKind>
    where
        R: AsyncRead + Unpin,
    {
        let head = probe::read_leading_async(reader, self.probe_len()).await?;
        Ok(self.detect_bytes(&head))
    }

    /// Open `path` and read its probe header without matching it.
    pub fn probe_path<P: AsRef<Path>>(&self, path: P) -> Result<ProbeHeader> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|source| SniffError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let head = probe::read_leading(&mut file, self.probe_len())?;
        Ok(self.probe(&head))
    }

    pub fn detect_path<P: AsRef<Path>>(&self, path: P) -> Result<FileKind> {
        Ok(self.detect_header(&self.probe_path(path)?))
    }

    pub async fn detect_path_async<P: AsRef<Path>>(&self, path: P) -> Result<FileKind> {
        let path = path.as_ref();
        let mut file = tokio::fs::File::open(path).await.map_err(|source| SniffError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.detect_async(&mut file).await
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}

/// Extension for `bytes` under the default detector.  Only the first 8 bytes
/// are consulted; the result is `.dat` when nothing matches.
pub fn detect_type(bytes: &[u8]) -> &'static str {
    Detector::new().detect_bytes(bytes).extension()
}
