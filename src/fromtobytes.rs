//! Low-level serialization primitives.
//!
//! `ReadBytes`/`WriteBytes` are the byte-stream traits every box decoder and
//! encoder is generic over; `FromBytes`/`ToBytes` are implemented once per
//! primitive type and once per box. `BoxBytes` carries the handful of
//! stream-positioning methods (`pos`/`seek`/`size`) that only "seekable"
//! backing stores (a `Cursor`, a `MemWriter`, an on-disk file) implement;
//! plain byte slices use the unimplemented defaults and are only ever used
//! for reading/writing a single box's already-delimited payload.
use std::convert::TryInto;
use std::io::{self, ErrorKind::UnexpectedEof};

use auto_impl::auto_impl;

/// Byte reader in a stream.
#[auto_impl(&mut)]
pub trait ReadBytes: BoxBytes {
    /// Read an exact number of bytes, return a reference to the buffer.
    fn read(&mut self, amount: u64) -> io::Result<&[u8]>;
    /// Skip some bytes in the input.
    fn skip(&mut self, amount: u64) -> io::Result<()>;
    /// How much data is left in the current box/stream.
    fn left(&self) -> u64;
}

/// Byte writer in a stream.
#[auto_impl(&mut)]
pub trait WriteBytes: BoxBytes {
    /// Write an exact number of bytes.
    fn write(&mut self, data: &[u8]) -> io::Result<()>;
    /// Zero-fill some bytes in the output.
    fn skip(&mut self, amount: u64) -> io::Result<()>;
}

/// Positioning methods shared by readers and writers that sit on top of a
/// seekable backing store (as opposed to a bare, already-delimited slice).
#[auto_impl(&mut)]
pub trait BoxBytes {
    /// Get current absolute position in the stream.
    fn pos(&self) -> u64 {
        unimplemented!("pos() not supported on this backing store")
    }
    /// Seek to an absolute position in the stream.
    fn seek(&mut self, _pos: u64) -> io::Result<()> {
        unimplemented!("seek() not supported on this backing store")
    }
    /// Total size of the underlying stream.
    fn size(&self) -> u64 {
        unimplemented!("size() not supported on this backing store")
    }
}

/// Implementation of ReadBytes on a byte slice (used for already-delimited
/// payloads, e.g. the body of a `data` atom once its header is stripped).
impl ReadBytes for &[u8] {
    fn read(&mut self, amount: u64) -> io::Result<&[u8]> {
        let mut amount = amount as usize;
        if amount > (*self).len() {
            return Err(UnexpectedEof.into());
        }
        if amount == 0 {
            amount = self.len();
        }
        let res = &self[0..amount];
        (*self) = &self[amount..];
        Ok(res)
    }

    fn skip(&mut self, amount: u64) -> io::Result<()> {
        if amount > (*self).len() as u64 {
            return Err(UnexpectedEof.into());
        }
        (*self) = &self[amount as usize..];
        Ok(())
    }

    fn left(&self) -> u64 {
        (*self).len() as u64
    }
}

impl BoxBytes for &[u8] {}

/// Implementation of WriteBytes on a mutable byte slice.
impl WriteBytes for &mut [u8] {
    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        if (*self).len() < data.len() {
            return Err(io::ErrorKind::WriteZero.into());
        }
        let nself = std::mem::replace(self, &mut [0u8; 0]);
        nself[..data.len()].copy_from_slice(data);
        *self = &mut nself[data.len()..];
        Ok(())
    }
    fn skip(&mut self, amount: u64) -> io::Result<()> {
        if amount > (*self).len() as u64 {
            return Err(io::ErrorKind::WriteZero.into());
        }
        let nself = std::mem::replace(self, &mut [0u8; 0]);
        *self = &mut nself[amount as usize..];
        Ok(())
    }
}

impl BoxBytes for &mut [u8] {}

/// Trait to deserialize a type from a byte stream.
pub trait FromBytes {
    fn from_bytes<R: ReadBytes>(bytes: &mut R) -> io::Result<Self>
    where
        Self: Sized;
    fn min_size() -> usize;
}

/// Trait to serialize a type to a byte stream.
pub trait ToBytes {
    fn to_bytes<W: WriteBytes>(&self, bytes: &mut W) -> io::Result<()>;
}

// Convenience macro to implement FromBytes/ToBytes for the u* primitives.
macro_rules! def_from_to_bytes {
    ($type:ident) => {
        impl FromBytes for $type {
            fn from_bytes<R: ReadBytes>(bytes: &mut R) -> io::Result<Self> {
                let sz = std::mem::size_of::<$type>();
                let data = bytes.read(sz as u64)?;
                let data = data.try_into().map_err(|_| UnexpectedEof)?;
                Ok($type::from_be_bytes(data))
            }
            fn min_size() -> usize {
                std::mem::size_of::<$type>()
            }
        }
        impl ToBytes for $type {
            fn to_bytes<W: WriteBytes>(&self, bytes: &mut W) -> io::Result<()> {
                bytes.write(&self.to_be_bytes()[..])
            }
        }
    };
}

def_from_to_bytes!(u8);
def_from_to_bytes!(u16);
def_from_to_bytes!(u32);
def_from_to_bytes!(u64);

impl FromBytes for i32 {
    fn from_bytes<R: ReadBytes>(bytes: &mut R) -> io::Result<Self> {
        Ok(u32::from_bytes(bytes)? as i32)
    }
    fn min_size() -> usize {
        4
    }
}

impl ToBytes for i32 {
    fn to_bytes<W: WriteBytes>(&self, bytes: &mut W) -> io::Result<()> {
        (*self as u32).to_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemWriter;

    #[test]
    fn roundtrip_u32() {
        let mut buf = MemWriter::new();
        42u32.to_bytes(&mut buf).unwrap();
        let mut s = &buf.into_inner()[..];
        assert_eq!(u32::from_bytes(&mut s).unwrap(), 42);
    }
}
