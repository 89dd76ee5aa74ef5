//! Chunk-offset table (`stco`/`co64`): an array of absolute file offsets
//! into `mdat`, one per chunk. The two box types share this struct; the
//! caller picks the 32- or 64-bit read/write path (and, on write, the
//! fourcc) based on which one was parsed.
use std::io;

use crate::fromtobytes::{FromBytes, ReadBytes, ToBytes, WriteBytes};
use crate::mp4box::{read_full_box_header, write_full_box_header, BoxReader, BoxWriter};

#[derive(Clone, Debug, Default)]
pub struct ChunkOffsetBox {
    pub version: u8,
    pub flags: u32,
    pub entries: Vec<u64>,
}

impl ChunkOffsetBox {
    /// `stco`: each entry is a 32-bit offset.
    pub fn read_32(reader: &mut BoxReader) -> io::Result<ChunkOffsetBox> {
        let (version, flags) = read_full_box_header(reader)?;
        let count = u32::from_bytes(reader)?;
        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            entries.push(u32::from_bytes(reader)? as u64);
        }
        Ok(ChunkOffsetBox { version, flags, entries })
    }

    /// `co64`: each entry is a 64-bit offset.
    pub fn read_64(reader: &mut BoxReader) -> io::Result<ChunkOffsetBox> {
        let (version, flags) = read_full_box_header(reader)?;
        let count = u32::from_bytes(reader)?;
        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            entries.push(u64::from_bytes(reader)?);
        }
        Ok(ChunkOffsetBox { version, flags, entries })
    }

    pub fn write_32(&self, writer: &mut BoxWriter) -> io::Result<()> {
        write_full_box_header(writer, self.version, self.flags)?;
        (self.entries.len() as u32).to_bytes(writer)?;
        for &e in &self.entries {
            (e as u32).to_bytes(writer)?;
        }
        Ok(())
    }

    pub fn write_64(&self, writer: &mut BoxWriter) -> io::Result<()> {
        write_full_box_header(writer, self.version, self.flags)?;
        (self.entries.len() as u32).to_bytes(writer)?;
        for &e in &self.entries {
            e.to_bytes(writer)?;
        }
        Ok(())
    }

    /// Whether any entry no longer fits in 32 bits, i.e. this table must be
    /// (re)written as `co64` rather than `stco`.
    pub fn needs_64_bit(&self) -> bool {
        self.entries.iter().any(|&e| e >= (1u64 << 32))
    }

    /// Shift every entry at or past `mdat_start` by `delta`, used after a
    /// metadata rewrite changes the file length ahead of `mdat`.
    pub fn adjust(&mut self, mdat_start: u64, delta: i64) {
        for e in self.entries.iter_mut() {
            if *e >= mdat_start {
                *e = (*e as i64 + delta) as u64;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemWriter;

    #[test]
    fn reads_exactly_declared_count_not_first_value() {
        // version/flags, count=2, then two 32-bit offsets. A parser that
        // (incorrectly) looped using the first offset as a count instead of
        // the leading u32 would desync here.
        let mut w = MemWriter::new();
        0u32.to_bytes(&mut w).unwrap();
        2u32.to_bytes(&mut w).unwrap();
        100u32.to_bytes(&mut w).unwrap();
        200u32.to_bytes(&mut w).unwrap();
        let buf = w.into_inner();
        let mut s = &buf[..];
        let (version, flags) = read_full_box_header(&mut s).unwrap();
        let count = u32::from_bytes(&mut s).unwrap();
        let mut entries = Vec::new();
        for _ in 0..count {
            entries.push(u32::from_bytes(&mut s).unwrap() as u64);
        }
        let b = ChunkOffsetBox { version, flags, entries };
        assert_eq!(b.entries, vec![100, 200]);
    }

    #[test]
    fn adjust_shifts_only_entries_past_mdat() {
        let mut b = ChunkOffsetBox { version: 0, flags: 0, entries: vec![10, 500, 600] };
        b.adjust(500, 20);
        assert_eq!(b.entries, vec![10, 520, 620]);
    }
}
