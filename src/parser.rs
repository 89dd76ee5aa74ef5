//! The file parser: four traversal entry points over the top-level box
//! sequence, all built on the same box-header loop.
//!
//! This crate's box model decodes a container's full subtree eagerly once
//! it decides to decode the container at all (`Container::from_bytes`
//! recurses all the way down `moov → trak → mdia → minf → stbl`), so the
//! four modes below differ only in *whether* `moov` gets decoded — not in
//! how deep the decode goes once started. `BoxHeaders` is the one mode
//! that skips it; the other three decode the same tree and differ only
//! in what the caller (`file.rs`) subsequently extracts from it. See
//! `DESIGN.md` for why this collapsing is a faithful, not a lesser,
//! reading of the four-mode design.
use std::io;

use crate::boxes::{FileTypeBox, MovieBox, MP4Box};
use crate::fromtobytes::{FromBytes, ReadBytes};
use crate::mp4box::BoxHeader;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseMode {
    /// Header-only top-level scan; `moov` is recorded by header but
    /// never decoded.
    BoxHeaders,
    /// Decodes `moov` so `udta/meta/ilst` can be located.
    Tag,
    /// As `Tag`, plus exposes `mvhd`/`hdlr`/`stsd` through the same
    /// decoded tree.
    TagAndProperties,
    /// As `Tag`, but the caller only walks `stco`/`co64` tables.
    ChunkOffsets,
}

/// The result of one top-level scan: the decoded `ftyp`, the decoded
/// `moov` (absent under `BoxHeaders` mode), the raw top-level header list,
/// and the `mdat` byte range used both to bound what a save may rewrite
/// and to validate chunk offsets against.
#[derive(Debug, Default)]
pub struct ParsedFile {
    pub ftyp: Option<FileTypeBox>,
    pub moov: Option<MovieBox>,
    /// Absolute file position of `moov`'s header, and its total size as
    /// declared on disk — needed by the save protocol to know exactly
    /// which byte range to replace.
    pub moov_header: Option<BoxHeader>,
    pub top_level: Vec<BoxHeader>,
    pub mdat_start: Option<u64>,
    pub mdat_end: Option<u64>,
}

impl ParsedFile {
    /// Scan the top-level box sequence of `stream` (which must be
    /// positioned at offset 0) under `mode`. Fails if the file doesn't
    /// start with `ftyp`.
    pub fn parse<S: ReadBytes>(stream: &mut S, mode: ParseMode) -> io::Result<ParsedFile> {
        let mut out = ParsedFile::default();
        let mut first = true;

        while stream.left() > 0 {
            let enclosing_end = stream.pos() + stream.left();
            let header = BoxHeader::read(stream, enclosing_end)?;

            if first {
                if header.fourcc != &b"ftyp"[..] {
                    return Err(crate::ioerr!(io::ErrorKind::InvalidData, "file does not start with an ftyp box"));
                }
                first = false;
            }

            let end = header.position + header.total_size;
            stream.seek(header.position)?;

            if header.fourcc == &b"ftyp"[..] {
                if let MP4Box::FileTypeBox(f) = MP4Box::from_bytes(stream)? {
                    out.ftyp = Some(f);
                }
            } else if header.fourcc == &b"moov"[..] {
                if mode == ParseMode::BoxHeaders {
                    stream.seek(end)?;
                } else if let MP4Box::MovieBox(m) = MP4Box::from_bytes(stream)? {
                    out.moov_header = Some(header.clone());
                    out.moov = Some(m);
                }
            } else if header.fourcc == &b"mdat"[..] {
                out.mdat_start = Some(header.position + header.header_size);
                out.mdat_end = Some(end);
                stream.seek(end)?;
            } else {
                stream.seek(end)?;
            }

            out.top_level.push(header);
        }

        if out.ftyp.is_none() {
            return Err(crate::ioerr!(io::ErrorKind::InvalidData, "missing ftyp box"));
        }
        Ok(out)
    }

    pub fn parse_box_headers<S: ReadBytes>(stream: &mut S) -> io::Result<ParsedFile> {
        Self::parse(stream, ParseMode::BoxHeaders)
    }

    pub fn parse_tag<S: ReadBytes>(stream: &mut S) -> io::Result<ParsedFile> {
        Self::parse(stream, ParseMode::Tag)
    }

    pub fn parse_tag_and_properties<S: ReadBytes>(stream: &mut S) -> io::Result<ParsedFile> {
        Self::parse(stream, ParseMode::TagAndProperties)
    }

    pub fn parse_chunk_offsets<S: ReadBytes>(stream: &mut S) -> io::Result<ParsedFile> {
        Self::parse(stream, ParseMode::ChunkOffsets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fromtobytes::ToBytes;
    use crate::io::{Cursor, MemWriter};
    use crate::types::FourCC;

    fn minimal_file() -> Vec<u8> {
        let mut w = MemWriter::new();
        MP4Box::FileTypeBox(FileTypeBox { major_brand: FourCC::new("M4A "), minor_version: 0, compatible_brands: vec![FourCC::new("M4A ")] })
            .to_bytes(&mut w)
            .unwrap();
        MP4Box::MovieBox(Default::default()).to_bytes(&mut w).unwrap();
        MP4Box::MediaDataBox(crate::boxes::mdat::MediaDataBox { data: crate::boxes::mdat::DataRef::Owned(vec![0xab; 4]) })
            .to_bytes(&mut w)
            .unwrap();
        w.into_inner()
    }

    #[test]
    fn rejects_file_without_leading_ftyp() {
        let mut w = MemWriter::new();
        MP4Box::MovieBox(Default::default()).to_bytes(&mut w).unwrap();
        let buf = w.into_inner();
        let mut c = Cursor::new(&buf);
        assert!(ParsedFile::parse_tag(&mut c).is_err());
    }

    #[test]
    fn header_only_mode_skips_moov_decode() {
        let buf = minimal_file();
        let mut c = Cursor::new(&buf);
        let parsed = ParsedFile::parse_box_headers(&mut c).unwrap();
        assert!(parsed.moov.is_none());
        assert_eq!(parsed.top_level.len(), 3);
    }

    #[test]
    fn tag_mode_decodes_moov_and_captures_mdat_range() {
        let buf = minimal_file();
        let mut c = Cursor::new(&buf);
        let parsed = ParsedFile::parse_tag(&mut c).unwrap();
        assert!(parsed.moov.is_some());
        assert!(parsed.mdat_start.is_some());
        assert!(parsed.mdat_end.unwrap() > parsed.mdat_start.unwrap());
    }
}
