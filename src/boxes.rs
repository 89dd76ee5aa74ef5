//! The `MP4Box` sum type and the factory that decodes one from, and
//! re-encodes one to, its wire form. Concrete box types live in their own
//! `boxes/*.rs` modules and implement the plain `FromBytes`/`ToBytes`
//! traits over their *payload only*; this module owns the header framing
//! (via `BoxReader`/`BoxWriter`) and the fourcc dispatch.
use std::fmt::Debug;
use std::io;

pub(crate) mod prelude;

pub mod container;
pub mod free;
pub mod ftyp;
pub mod hdlr;
pub mod ilst;
pub mod mdat;
pub mod meta;
pub mod mvhd;
pub mod stco;
pub mod stsd;
pub mod text;
pub mod udta;
pub mod url;

pub use container::{MediaBox, MediaInformationBox, MovieBox, SampleTableBox, TrackBox};
pub use free::{Free, Skip, Wide};
pub use ftyp::FileTypeBox;
pub use hdlr::HandlerBox;
pub use ilst::AppleItemListBox;
pub use mdat::MediaDataBox;
pub use meta::MetaBox;
pub use mvhd::MovieHeaderBox;
pub use stco::ChunkOffsetBox;
pub use stsd::{AudioSampleEntry, SampleDescriptionBox, SampleEntry, VisualSampleEntry};
pub use text::TextBox;
pub use udta::UserDataBox;
pub use url::UrlBox;

use crate::fromtobytes::{FromBytes, ReadBytes, ToBytes, WriteBytes};
use crate::mp4box::{BoxInfo, BoxReader, BoxWriter, GenericBox};
use crate::types::FourCC;

/// The well-known container types the parser recurses into.
const CONTAINER_TYPES: &[&[u8; 4]] = &[b"moov", b"trak", b"mdia", b"minf", b"stbl", b"udta"];

pub fn is_container_type(fourcc: FourCC) -> bool {
    CONTAINER_TYPES.iter().any(|t| &fourcc == t)
}

#[derive(Clone, Debug)]
pub enum MP4Box {
    FileTypeBox(FileTypeBox),
    Free(Free),
    Skip(Skip),
    Wide(Wide),
    MovieBox(MovieBox),
    TrackBox(TrackBox),
    MediaBox(MediaBox),
    MediaInformationBox(MediaInformationBox),
    SampleTableBox(SampleTableBox),
    UserDataBox(UserDataBox),
    MetaBox(MetaBox),
    HandlerBox(HandlerBox),
    MovieHeaderBox(MovieHeaderBox),
    SampleDescriptionBox(SampleDescriptionBox),
    ChunkOffsetBox(ChunkOffsetBox),
    ChunkLargeOffsetBox(ChunkOffsetBox),
    MediaDataBox(MediaDataBox),
    AppleItemListBox(AppleItemListBox),
    TextBox(TextBox),
    UrlBox(UrlBox),
    GenericBox(GenericBox),
}

impl MP4Box {
    pub fn fourcc(&self) -> FourCC {
        match self {
            MP4Box::FileTypeBox(_) => FourCC::from(&b"ftyp"[..]),
            MP4Box::Free(_) => FourCC::from(&b"free"[..]),
            MP4Box::Skip(_) => FourCC::from(&b"skip"[..]),
            MP4Box::Wide(_) => FourCC::from(&b"wide"[..]),
            MP4Box::MovieBox(_) => FourCC::from(&b"moov"[..]),
            MP4Box::TrackBox(_) => FourCC::from(&b"trak"[..]),
            MP4Box::MediaBox(_) => FourCC::from(&b"mdia"[..]),
            MP4Box::MediaInformationBox(_) => FourCC::from(&b"minf"[..]),
            MP4Box::SampleTableBox(_) => FourCC::from(&b"stbl"[..]),
            MP4Box::UserDataBox(_) => FourCC::from(&b"udta"[..]),
            MP4Box::MetaBox(_) => FourCC::from(&b"meta"[..]),
            MP4Box::HandlerBox(_) => FourCC::from(&b"hdlr"[..]),
            MP4Box::MovieHeaderBox(_) => FourCC::from(&b"mvhd"[..]),
            MP4Box::SampleDescriptionBox(_) => FourCC::from(&b"stsd"[..]),
            MP4Box::ChunkOffsetBox(_) => FourCC::from(&b"stco"[..]),
            MP4Box::ChunkLargeOffsetBox(_) => FourCC::from(&b"co64"[..]),
            MP4Box::MediaDataBox(_) => FourCC::from(&b"mdat"[..]),
            MP4Box::AppleItemListBox(_) => FourCC::from(&b"ilst"[..]),
            MP4Box::TextBox(_) => FourCC::from(&b"text"[..]),
            MP4Box::UrlBox(_) => FourCC::from(&b"url "[..]),
            MP4Box::GenericBox(b) => b.fourcc(),
        }
    }
}

impl BoxInfo for MP4Box {
    fn fourcc(&self) -> FourCC {
        MP4Box::fourcc(self)
    }
}

impl FromBytes for MP4Box {
    fn from_bytes<R: ReadBytes>(stream: &mut R) -> io::Result<MP4Box> {
        let mut reader = BoxReader::new(stream)?;
        let fourcc = reader.header.fourcc;
        let b = if fourcc == &b"ftyp"[..] {
            MP4Box::FileTypeBox(FileTypeBox::from_bytes(&mut reader)?)
        } else if fourcc == &b"free"[..] {
            MP4Box::Free(Free::from_bytes(&mut reader)?)
        } else if fourcc == &b"skip"[..] {
            MP4Box::Skip(Skip::from_bytes(&mut reader)?)
        } else if fourcc == &b"wide"[..] {
            MP4Box::Wide(Wide::from_bytes(&mut reader)?)
        } else if fourcc == &b"moov"[..] {
            MP4Box::MovieBox(MovieBox::from_bytes(&mut reader)?)
        } else if fourcc == &b"trak"[..] {
            MP4Box::TrackBox(TrackBox::from_bytes(&mut reader)?)
        } else if fourcc == &b"mdia"[..] {
            MP4Box::MediaBox(MediaBox::from_bytes(&mut reader)?)
        } else if fourcc == &b"minf"[..] {
            MP4Box::MediaInformationBox(MediaInformationBox::from_bytes(&mut reader)?)
        } else if fourcc == &b"stbl"[..] {
            MP4Box::SampleTableBox(SampleTableBox::from_bytes(&mut reader)?)
        } else if fourcc == &b"udta"[..] {
            MP4Box::UserDataBox(UserDataBox::from_bytes(&mut reader)?)
        } else if fourcc == &b"meta"[..] {
            MP4Box::MetaBox(MetaBox::from_bytes(&mut reader)?)
        } else if fourcc == &b"hdlr"[..] {
            MP4Box::HandlerBox(HandlerBox::read_data(&mut reader)?)
        } else if fourcc == &b"mvhd"[..] {
            MP4Box::MovieHeaderBox(MovieHeaderBox::read_data(&mut reader)?)
        } else if fourcc == &b"stsd"[..] {
            MP4Box::SampleDescriptionBox(SampleDescriptionBox::from_bytes(&mut reader)?)
        } else if fourcc == &b"stco"[..] {
            MP4Box::ChunkOffsetBox(ChunkOffsetBox::read_32(&mut reader)?)
        } else if fourcc == &b"co64"[..] {
            MP4Box::ChunkLargeOffsetBox(ChunkOffsetBox::read_64(&mut reader)?)
        } else if fourcc == &b"mdat"[..] {
            MP4Box::MediaDataBox(MediaDataBox::read_data(&mut reader)?)
        } else if fourcc == &b"ilst"[..] {
            MP4Box::AppleItemListBox(AppleItemListBox::read_data(&mut reader)?)
        } else if fourcc == &b"text"[..] {
            MP4Box::TextBox(TextBox::from_bytes(&mut reader)?)
        } else if fourcc == &b"url "[..] {
            MP4Box::UrlBox(UrlBox::from_bytes(&mut reader)?)
        } else {
            let fourcc = reader.header.fourcc;
            let left = reader.left();
            let data = reader.read(left)?.to_vec();
            MP4Box::GenericBox(GenericBox { fourcc, data })
        };
        Ok(b)
    }

    fn min_size() -> usize {
        8
    }
}

impl ToBytes for MP4Box {
    fn to_bytes<W: WriteBytes>(&self, stream: &mut W) -> io::Result<()> {
        let fourcc = self.fourcc();
        let mut writer = BoxWriter::new(stream, fourcc)?;
        match self {
            MP4Box::FileTypeBox(b) => b.to_bytes(&mut writer)?,
            MP4Box::Free(b) => b.to_bytes(&mut writer)?,
            MP4Box::Skip(b) => b.to_bytes(&mut writer)?,
            MP4Box::Wide(b) => b.to_bytes(&mut writer)?,
            MP4Box::MovieBox(b) => b.to_bytes(&mut writer)?,
            MP4Box::TrackBox(b) => b.to_bytes(&mut writer)?,
            MP4Box::MediaBox(b) => b.to_bytes(&mut writer)?,
            MP4Box::MediaInformationBox(b) => b.to_bytes(&mut writer)?,
            MP4Box::SampleTableBox(b) => b.to_bytes(&mut writer)?,
            MP4Box::UserDataBox(b) => b.to_bytes(&mut writer)?,
            MP4Box::MetaBox(b) => b.to_bytes(&mut writer)?,
            MP4Box::HandlerBox(b) => b.write_data(&mut writer)?,
            MP4Box::MovieHeaderBox(b) => b.write_data(&mut writer)?,
            MP4Box::SampleDescriptionBox(b) => b.to_bytes(&mut writer)?,
            MP4Box::ChunkOffsetBox(b) => b.write_32(&mut writer)?,
            MP4Box::ChunkLargeOffsetBox(b) => b.write_64(&mut writer)?,
            MP4Box::MediaDataBox(b) => b.write_data(&mut writer)?,
            MP4Box::AppleItemListBox(b) => b.write_data(&mut writer)?,
            MP4Box::TextBox(b) => b.to_bytes(&mut writer)?,
            MP4Box::UrlBox(b) => b.to_bytes(&mut writer)?,
            MP4Box::GenericBox(b) => writer.write(&b.data)?,
        }
        writer.finalize()
    }
}
