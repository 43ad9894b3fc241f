//! Probe header: the leading bytes of a source, rendered for prefix matching.
//!
//! Only the first [`PROBE_LEN`] bytes take part in signature matching.  When
//! RIFF disambiguation is enabled the reader pulls [`RIFF_PROBE_LEN`] bytes and
//! keeps bytes 8..12 aside as the RIFF form tag.  Neither reader ever consumes
//! more than it was asked for.

use std::io::Read;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::Result;

/// Bytes consulted by the signature table.
pub const PROBE_LEN: usize = 8;
/// Bytes read when the RIFF form tag is wanted (`RIFF` + size + tag).
pub const RIFF_PROBE_LEN: usize = 12;

const RIFF_FORM_RANGE: std::ops::Range<usize> = 8..12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHeader {
    hex:       String,
    len:       usize,
    riff_form: Option<[u8; 4]>,
}

impl ProbeHeader {
    /// Build from raw leading bytes.  Anything past [`RIFF_PROBE_LEN`] is
    /// ignored; the form tag is kept only when all four of its bytes exist.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let head = &bytes[..bytes.len().min(PROBE_LEN)];
        let riff_form = bytes
            .get(RIFF_FORM_RANGE)
            .and_then(|tag| <[u8; 4]>::try_from(tag).ok());
        Self {
            hex: hex::encode(head),
            len: head.len(),
            riff_form,
        }
    }

    /// Lowercase hex of at most [`PROBE_LEN`] bytes, two digits per byte.
    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// Number of bytes behind [`hex`](Self::hex).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes 8..12 of the source, if they were read.
    pub fn riff_form(&self) -> Option<&[u8; 4]> {
        self.riff_form.as_ref()
    }

    /// Drop the form tag, leaving a header that depends on 8 bytes only.
    pub fn without_riff_form(mut self) -> Self {
        self.riff_form = None;
        self
    }
}

/// Read up to `limit` bytes from the start of `reader`.  A short source is not
/// an error; the returned buffer is simply shorter.
pub fn read_leading<R: Read>(reader: &mut R, limit: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(limit);
    reader.by_ref().take(limit as u64).read_to_end(&mut buf)?;
    Ok(buf)
}

/// Async counterpart of [`read_leading`].  The only suspension point is the
/// read itself.
pub async fn read_leading_async<R>(reader: &mut R, limit: usize) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::with_capacity(limit);
    reader.take(limit as u64).read_to_end(&mut buf).await?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn hex_is_lowercase_and_zero_padded() {
        let h = ProbeHeader::from_bytes(&[0x00, 0x0A, 0xFF, 0xD8]);
        assert_eq!(h.hex(), "000affd8");
        assert_eq!(h.len(), 4);
    }

    #[test]
    fn hex_is_capped_at_probe_len() {
        let bytes: Vec<u8> = (0u8..32).collect();
        let h = ProbeHeader::from_bytes(&bytes);
        assert_eq!(h.hex().len(), PROBE_LEN * 2);
        assert_eq!(h.hex(), "0001020304050607");
    }

    #[test]
    fn empty_source() {
        let h = ProbeHeader::from_bytes(&[]);
        assert!(h.is_empty());
        assert_eq!(h.hex(), "");
        assert!(h.riff_form().is_none());
    }

    #[test]
    fn riff_form_needs_all_four_bytes() {
        assert!(ProbeHeader::from_bytes(b"RIFF\0\0\0\0WAV").riff_form().is_none());
        let h = ProbeHeader::from_bytes(b"RIFF\0\0\0\0WAVEfmt ");
        assert_eq!(h.riff_form(), Some(b"WAVE"));
        assert!(h.without_riff_form().riff_form().is_none());
    }

    #[test]
    fn read_leading_stops_at_limit() {
        let mut cur = Cursor::new(vec![7u8; 100]);
        let head = read_leading(&mut cur, PROBE_LEN).unwrap();
        assert_eq!(head.len(), PROBE_LEN);
        assert_eq!(cur.position(), PROBE_LEN as u64);
    }

    #[test]
    fn read_leading_short_source() {
        let mut cur = Cursor::new(vec![0x42, 0x4D]);
        assert_eq!(read_leading(&mut cur, PROBE_LEN).unwrap(), vec![0x42, 0x4D]);
    }

    #[tokio::test]
    async fn read_leading_async_stops_at_limit() {
        let data = vec![1u8; 64];
        let mut src: &[u8] = &data;
        let head = read_leading_async(&mut src, RIFF_PROBE_LEN).await.unwrap();
        assert_eq!(head.len(), RIFF_PROBE_LEN);
        assert_eq!(src.len(), 64 - RIFF_PROBE_LEN);
    }
}
