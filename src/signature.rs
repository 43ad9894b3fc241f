//! Signature table: ordered magic-byte prefixes and the extensions they map to.
//!
//! # Matching rules
//! Prefixes are lowercase hex strings compared against the hex rendering of a
//! probe header.  The table is scanned in declaration order and the **first**
//! matching entry wins.  Entries are never reordered at runtime.
//!
//! # Duplicate prefixes
//! `52494646` (`RIFF`) is declared twice, once for `.wav` and once for `.avi`.
//! Under first-match the `.avi` entry is shadowed.  [`SignatureTable::shadowed`]
//! reports it, and [`crate::detect::RiffPolicy::FormType`] is the only way to
//! reach it.

use std::fmt;

use serde::{Serialize, Serializer};

// ── FileKind ─────────────────────────────────────────────────────────────────

/// Every extension the detector can produce.  `Unknown` renders as `.dat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Zip,
    Rar,
    SevenZip,
    Pdf,
    Doc,
    Docx,
    Mp3,
    Wav,
    Flac,
    Mp4,
    Avi,
    Mkv,
    Unknown,
}

/// Fallback extension for content that matches no signature.
pub const UNKNOWN_EXTENSION: &str = ".dat";

impl FileKind {
    pub const ALL: [FileKind; 17] = [
        FileKind::Jpeg, FileKind::Png,  FileKind::Gif,  FileKind::Bmp,
        FileKind::Zip,  FileKind::Rar,  FileKind::SevenZip, FileKind::Pdf,
        FileKind::Doc,  FileKind::Docx, FileKind::Mp3,  FileKind::Wav,
        FileKind::Flac, FileKind::Mp4,  FileKind::Avi,  FileKind::Mkv,
        FileKind::Unknown,
    ];

    /// Extension including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            FileKind::Jpeg     => ".jpg",
            FileKind::Png      => ".png",
            FileKind::Gif      => ".gif",
            FileKind::Bmp      => ".bmp",
            FileKind::Zip      => ".zip",
            FileKind::Rar      => ".rar",
            FileKind::SevenZip => ".7z",
            FileKind::Pdf      => ".pdf",
            FileKind::Doc      => ".doc",
            FileKind::Docx     => ".docx",
            FileKind::Mp3      => ".mp3",
            FileKind::Wav      => ".wav",
            FileKind::Flac     => ".flac",
            FileKind::Mp4      => ".mp4",
            FileKind::Avi      => ".avi",
            FileKind::Mkv      => ".mkv",
            FileKind::Unknown  => UNKNOWN_EXTENSION,
        }
    }

    /// Reverse lookup.  Accepts the extension with or without its dot,
    /// case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let trimmed = ext.strip_prefix('.').unwrap_or(ext);
        FileKind::ALL
            .iter()
            .copied()
            .find(|k| k.extension()[1..].eq_ignore_ascii_case(trimmed))
    }

    pub fn is_unknown(self) -> bool {
        self == FileKind::Unknown
    }
}

impl Serialize for FileKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.extension())
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.extension())
    }
}

// ── Signature ────────────────────────────────────────────────────────────────

/// One table entry: a lowercase hex prefix and the kind it identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub prefix: &'static str,
    pub kind:   FileKind,
}

impl Signature {
    pub const fn new(prefix: &'static str, kind: FileKind) -> Self {
        Self { prefix, kind }
    }

    /// `true` when `header_hex` starts with this entry's prefix.
    pub fn matches(&self, header_hex: &str) -> bool {
        header_hex.starts_with(self.prefix)
    }
}

/// RIFF container prefix, shared by the `.wav` and `.avi` entries.
pub const RIFF_PREFIX: &str = "52494646";

// Declaration order is part of the contract.  Do not sort.
static SIGNATURES: [Signature; 16] = [
    Signature::new("ffd8ffe0", FileKind::Jpeg),
    Signature::new("89504e47", FileKind::Png),
    Signature::new("47494638", FileKind::Gif),
    Signature::new("424d",     FileKind::Bmp),
    Signature::new("504b0304", FileKind::Zip),
    Signature::new("52617221", FileKind::Rar),
    Signature::new("377abcaf", FileKind::SevenZip),
    Signature::new("25504446", FileKind::Pdf),
    Signature::new("d0cf11e0", FileKind::Doc),
    Signature::new("504b34",   FileKind::Docx),
    Signature::new("494433",   FileKind::Mp3),
    Signature::new(RIFF_PREFIX, FileKind::Wav),
    Signature::new("664c6143", FileKind::Flac),
    Signature::new("00000020", FileKind::Mp4),
    Signature::new(RIFF_PREFIX, FileKind::Avi),
    Signature::new("1a45dfa3", FileKind::Mkv),
];

// ── SignatureTable ───────────────────────────────────────────────────────────

/// Read-only view over an ordered signature list.
#[derive(Debug, Clone, Copy)]
pub struct SignatureTable {
    entries: &'static [Signature],
}

impl SignatureTable {
    /// The built-in table, in declaration order.
    pub fn builtin() -> Self {
        Self { entries: &SIGNATURES }
    }

    /// Build a table over a caller-supplied static list.  Order is preserved.
    pub const fn from_static(entries: &'static [Signature]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [Signature] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry whose prefix starts `header_hex`, with its table position.
    pub fn first_match(&self, header_hex: &str) -> Option<(usize, &'static Signature)> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, sig)| sig.matches(header_hex))
    }

    /// Indices of entries that can never win because an earlier entry carries
    /// the same prefix.
    pub fn shadowed(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(i, sig)| self.entries[..*i].iter().any(|e| e.prefix == sig.prefix))
            .map(|(i, _)| i)
            .collect()
    }
}

impl Default for SignatureTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_order_is_declaration_order() {
        let exts: Vec<&str> = SignatureTable::builtin()
            .entries()
            .iter()
            .map(|s| s.kind.extension())
            .collect();
        assert_eq!(
            exts,
            [".jpg", ".png", ".gif", ".bmp", ".zip", ".rar", ".7z", ".pdf",
             ".doc", ".docx", ".mp3", ".wav", ".flac", ".mp4", ".avi", ".mkv"]
        );
    }

    #[test]
    fn prefixes_are_lowercase_hex() {
        for sig in SignatureTable::builtin().entries() {
            assert_eq!(sig.prefix.len() % 2, 0, "{}", sig.prefix);
            assert!(hex::decode(sig.prefix).is_ok(), "{}", sig.prefix);
            assert_eq!(sig.prefix, sig.prefix.to_ascii_lowercase());
        }
    }

    #[test]
    fn avi_entry_is_shadowed_by_wav() {
        let table = SignatureTable::builtin();
        let shadowed = table.shadowed();
        assert_eq!(shadowed.len(), 1);
        let sig = table.entries()[shadowed[0]];
        assert_eq!(sig.kind, FileKind::Avi);
        assert_eq!(sig.prefix, RIFF_PREFIX);
    }

    #[test]
    fn first_match_prefers_earlier_entry() {
        let (idx, sig) = SignatureTable::builtin().first_match("5249464600000000").unwrap();
        assert_eq!(sig.kind, FileKind::Wav);
        assert_eq!(idx, 11);
    }

    #[test]
    fn from_extension_lookup() {
        assert_eq!(FileKind::from_extension(".7z"), Some(FileKind::SevenZip));
        assert_eq!(FileKind::from_extension("DOCX"), Some(FileKind::Docx));
        assert_eq!(FileKind::from_extension(".dat"), Some(FileKind::Unknown));
        assert_eq!(FileKind::from_extension(".tiff"), None);
    }

    #[test]
    fn unknown_renders_as_dat() {
        assert_eq!(FileKind::Unknown.to_string(), ".dat");
        assert!(FileKind::Unknown.is_unknown());
        assert_eq!(serde_json::to_string(&FileKind::Mkv).unwrap(), "\".mkv\"");
    }
}
