//! The `mdat` box holds the actual encoded audio/video samples. This crate
//! never materialises that payload: during a real-file parse we only
//! remember its byte range (used to validate chunk offsets and to know
//! where the rewritable metadata region ends); byte-builder tests that
//! need a self-contained file carry the bytes directly.
use std::fmt::Debug;
use std::io;

use crate::fromtobytes::{ReadBytes, WriteBytes};
use crate::mp4box::{BoxReader, BoxWriter};

#[derive(Clone, Debug)]
pub enum DataRef {
    /// Bytes held in memory (test fixtures, or a freshly-built file).
    Owned(Vec<u8>),
    /// Byte range `[pos, pos+size)` in a file this box was parsed from;
    /// never re-read into memory, only tracked.
    Remote { pos: u64, size: u64 },
}

impl DataRef {
    pub fn len(&self) -> u64 {
        match self {
            DataRef::Owned(v) => v.len() as u64,
            DataRef::Remote { size, .. } => *size,
        }
    }
}

#[derive(Clone)]
pub struct MediaDataBox {
    pub data: DataRef,
}

impl MediaDataBox {
    pub fn read_data(reader: &mut BoxReader) -> io::Result<MediaDataBox> {
        let size = reader.left();
        // `pos()` is the reader's current absolute position in the
        // underlying file/buffer, i.e. the start of the payload.
        let pos = reader.pos();
        reader.skip(size)?;
        Ok(MediaDataBox { data: DataRef::Remote { pos, size } })
    }

    pub fn write_data(&self, writer: &mut BoxWriter) -> io::Result<()> {
        match &self.data {
            DataRef::Owned(v) => writer.write(v),
            DataRef::Remote { .. } => Err(crate::ioerr!(
                io::ErrorKind::Other,
                "mdat payload is a remote byte range and cannot be re-serialized; splice it instead"
            )),
        }
    }
}

impl Debug for MediaDataBox {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "MediaDataBox {{ {} bytes }}", self.data.len())
    }
}
