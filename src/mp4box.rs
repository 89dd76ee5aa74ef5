//! The generic box header and the reader/writer machinery every concrete
//! box builds on.
use std::fmt::Debug;
use std::io;

use crate::fromtobytes::{BoxBytes, FromBytes, ReadBytes, ToBytes, WriteBytes};
use crate::types::{FourCC, Uuid};

/// Implemented by every box. `fourcc` identifies the box type; `max_version`
/// caps the `FullBox` version this crate understands (boxes that are not
/// `FullBox`es, or that have no version ceiling, return `None`).
pub trait BoxInfo {
    fn fourcc(&self) -> FourCC;
    fn max_version() -> Option<u8>
    where
        Self: Sized,
    {
        None
    }
}

/// Implemented by boxes carrying the `version: u8 | flags: u24` `FullBox`
/// preamble (ISO/IEC 14496-12 §4.2).
pub trait FullBox {
    fn version(&self) -> u8 {
        0
    }
    fn flags(&self) -> u32 {
        0
    }
}

/// The decoded 8- or 16-byte box preamble (§4.3 of the wire format).
#[derive(Clone, Debug)]
pub struct BoxHeader {
    /// File offset of the first byte of this header.
    pub position: u64,
    /// 8 normally, 16 with a `largesize`, +16 more for a `uuid` box.
    pub header_size: u64,
    /// header + payload. A declared size of 0 is resolved to "rest of
    /// enclosing container" by `read`.
    pub total_size: u64,
    pub fourcc: FourCC,
    pub ext_type: Option<Uuid>,
}

impl BoxHeader {
    /// Decode at the stream's current position. `enclosing_end` is the
    /// absolute end-of-container position, used to resolve a declared size
    /// of 0 ("extends to end of containing box/file").
    pub fn read<R: ReadBytes>(stream: &mut R, enclosing_end: u64) -> io::Result<BoxHeader> {
        let position = stream.pos();
        let size1 = u32::from_bytes(stream)?;
        let fourcc = FourCC::from_bytes(stream)?;
        let mut header_size = 8u64;

        let total_size = match size1 {
            0 => enclosing_end.saturating_sub(position),
            1 => {
                let largesize = u64::from_bytes(stream)?;
                header_size += 8;
                largesize
            }
            x => x as u64,
        };

        let ext_type = if fourcc == b"uuid" {
            header_size += 16;
            Some(Uuid::from_bytes(stream)?)
        } else {
            None
        };

        if total_size != 0 && total_size < header_size {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{}: declared size {} smaller than header ({})", fourcc, total_size, header_size),
            ));
        }

        Ok(BoxHeader { position, header_size, total_size, fourcc, ext_type })
    }

    /// Render the header back to the wire, choosing the 64-bit largesize
    /// form when `total_size` overflows 32 bits.
    pub fn write<W: WriteBytes>(&self, stream: &mut W) -> io::Result<()> {
        if self.total_size >= (1u64 << 32) {
            1u32.to_bytes(stream)?;
            self.fourcc.to_bytes(stream)?;
            self.total_size.to_bytes(stream)?;
        } else {
            (self.total_size as u32).to_bytes(stream)?;
            self.fourcc.to_bytes(stream)?;
        }
        if let Some(uuid) = &self.ext_type {
            uuid.to_bytes(stream)?;
        }
        Ok(())
    }

    pub fn data_size(&self) -> u64 {
        self.total_size.saturating_sub(self.header_size)
    }
}

/// Read the box header, then hand back a reader limited to exactly its
/// payload. Any bytes the box's `FromBytes` impl doesn't consume are
/// skipped on drop so the caller always lands exactly at the next sibling.
pub struct BoxReader<'a> {
    pub header: BoxHeader,
    maxpos: u64,
    inner: &'a mut dyn ReadBytes,
}

impl<'a> BoxReader<'a> {
    pub fn new(stream: &'a mut dyn ReadBytes) -> io::Result<BoxReader<'a>> {
        let enclosing_end = stream.pos() + stream.left();
        let header = BoxHeader::read(stream, enclosing_end)?;
        let maxpos = if header.total_size == 0 { enclosing_end } else { header.position + header.total_size };
        if maxpos > enclosing_end {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{}: declared size extends past end of container", header.fourcc),
            ));
        }
        Ok(BoxReader { header, maxpos, inner: stream })
    }
}

impl<'a> Drop for BoxReader<'a> {
    fn drop(&mut self) {
        if self.inner.pos() < self.maxpos {
            let _ = self.inner.skip(self.maxpos - self.inner.pos());
        }
    }
}

impl<'a> ReadBytes for BoxReader<'a> {
    fn read(&mut self, amount: u64) -> io::Result<&[u8]> {
        let amount = if amount == 0 { self.left() } else { amount };
        if self.inner.pos() + amount > self.maxpos {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        self.inner.read(amount)
    }
    fn skip(&mut self, amount: u64) -> io::Result<()> {
        if self.inner.pos() + amount > self.maxpos {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        self.inner.skip(amount)
    }
    fn left(&self) -> u64 {
        self.maxpos.saturating_sub(self.inner.pos())
    }
}

impl<'a> BoxBytes for BoxReader<'a> {
    fn pos(&self) -> u64 {
        self.inner.pos()
    }
    fn seek(&mut self, pos: u64) -> io::Result<()> {
        if pos > self.maxpos {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        self.inner.seek(pos)
    }
    fn size(&self) -> u64 {
        self.maxpos
    }
}

/// Reads the `version: u8 | flags: u24` preamble common to every `FullBox`.
pub fn read_full_box_header<R: ReadBytes>(stream: &mut R) -> io::Result<(u8, u32)> {
    let word = u32::from_bytes(stream)?;
    Ok(((word >> 24) as u8, word & 0x00ff_ffff))
}

pub fn write_full_box_header<W: WriteBytes>(stream: &mut W, version: u8, flags: u32) -> io::Result<()> {
    (((version as u32) << 24) | (flags & 0x00ff_ffff)).to_bytes(stream)
}

/// Writes a provisional size field, then patches it in on `finalize`/drop.
/// Mirrors `BoxReader`: callers write the fourcc-specific payload between
/// `new` and `finalize`.
pub struct BoxWriter<'a> {
    offset: u64,
    inner: &'a mut dyn WriteBytes,
    finalized: bool,
}

impl<'a> BoxWriter<'a> {
    pub fn new(stream: &'a mut dyn WriteBytes, fourcc: FourCC) -> io::Result<BoxWriter<'a>> {
        let offset = stream.pos();
        0u32.to_bytes(stream)?;
        fourcc.to_bytes(stream)?;
        Ok(BoxWriter { offset, inner: stream, finalized: false })
    }

    /// Seek back and patch in the now-known total box size.
    pub fn finalize(&mut self) -> io::Result<()> {
        if self.finalized {
            return Ok(());
        }
        self.finalized = true;
        let end = self.inner.pos();
        let size = end - self.offset;
        self.inner.seek(self.offset)?;
        if size >= (1u64 << 32) {
            // Size didn't fit in 32 bits after all; this crate never emits
            // individual boxes that large, so surface it as a hard error
            // instead of silently truncating.
            self.inner.seek(end)?;
            return Err(io::Error::new(io::ErrorKind::InvalidData, "box payload too large for a 32-bit size field"));
        }
        (size as u32).to_bytes(self.inner)?;
        self.inner.seek(end)?;
        Ok(())
    }
}

impl<'a> Drop for BoxWriter<'a> {
    fn drop(&mut self) {
        let _ = self.finalize();
    }
}

impl<'a> WriteBytes for BoxWriter<'a> {
    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        self.inner.write(data)
    }
    fn skip(&mut self, amount: u64) -> io::Result<()> {
        self.inner.skip(amount)
    }
}

impl<'a> BoxBytes for BoxWriter<'a> {
    fn pos(&self) -> u64 {
        self.inner.pos()
    }
    fn seek(&mut self, pos: u64) -> io::Result<()> {
        self.inner.seek(pos)
    }
    fn size(&self) -> u64 {
        self.inner.size()
    }
}

/// Catch-all for any box type the factory doesn't recognise: the payload is
/// kept verbatim so an unknown box still round-trips byte for byte.
#[derive(Clone)]
pub struct GenericBox {
    pub fourcc: FourCC,
    pub data: Vec<u8>,
}

impl FromBytes for GenericBox {
    fn from_bytes<R: ReadBytes>(stream: &mut R) -> io::Result<GenericBox> {
        let mut reader = BoxReader::new(stream)?;
        let fourcc = reader.header.fourcc;
        let size = reader.left();
        let data = reader.read(size)?.to_vec();
        Ok(GenericBox { fourcc, data })
    }
    fn min_size() -> usize {
        8
    }
}

impl ToBytes for GenericBox {
    fn to_bytes<W: WriteBytes>(&self, stream: &mut W) -> io::Result<()> {
        let mut writer = BoxWriter::new(stream, self.fourcc)?;
        writer.write(&self.data)?;
        writer.finalize()
    }
}

impl BoxInfo for GenericBox {
    fn fourcc(&self) -> FourCC {
        self.fourcc
    }
}

impl Debug for GenericBox {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("GenericBox").field("fourcc", &self.fourcc).field("size", &self.data.len()).finish()
    }
}
