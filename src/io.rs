//! Backing stores that implement `ReadBytes`/`WriteBytes`/`BoxBytes`:
//! `Mp4File` wraps an on-disk file with the seek/read/insert/corrupt-flag
//! operations the parser and save path need; `Cursor`/`MemWriter` are the
//! in-memory equivalents used by the test suite and by anything that
//! serializes a sub-tree before splicing it into a file.
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::fromtobytes::{BoxBytes, ReadBytes, WriteBytes};

/// Whether a file was opened for reading only, for reading and writing, or
/// has been permanently shut (after a corruption or after `save`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Read,
    ReadWrite,
    Closed,
}

/// An on-disk `.m4a`/`.mp4` file. Reads are buffered through an internal
/// scratch buffer (`read` hands back a reference into it, mirroring the
/// slice-based `ReadBytes` impl); `insert` does the atomic splice the save
/// path needs to grow or shrink the metadata region in place.
pub struct Mp4File {
    file: File,
    mode: Mode,
    pos: u64,
    len: u64,
    scratch: Vec<u8>,
    corrupt: Option<String>,
}

impl Mp4File {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Mp4File> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let len = file.metadata()?.len();
        Ok(Mp4File { file, mode: Mode::ReadWrite, pos: 0, len, scratch: Vec::new(), corrupt: None })
    }

    pub fn open_readonly<P: AsRef<Path>>(path: P) -> io::Result<Mp4File> {
        let file = OpenOptions::new().read(true).open(path)?;
        let len = file.metadata()?.len();
        Ok(Mp4File { file, mode: Mode::Read, pos: 0, len, scratch: Vec::new(), corrupt: None })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn length(&self) -> u64 {
        self.len
    }

    pub fn tell(&self) -> u64 {
        self.pos
    }

    pub fn is_corrupt(&self) -> bool {
        self.corrupt.is_some()
    }

    pub fn corrupt_reason(&self) -> Option<&str> {
        self.corrupt.as_deref()
    }

    pub fn mark_as_corrupt(&mut self, reason: impl Into<String>) {
        self.corrupt = Some(reason.into());
        self.mode = Mode::Closed;
    }

    fn check_open(&self) -> io::Result<()> {
        if let Some(reason) = &self.corrupt {
            return Err(crate::ioerr!(io::ErrorKind::InvalidData, "file marked corrupt: {}", reason));
        }
        if self.mode == Mode::Closed {
            return Err(crate::ioerr!(io::ErrorKind::Other, "file is closed"));
        }
        Ok(())
    }

    pub fn read_block(&mut self, amount: u64) -> io::Result<&[u8]> {
        self.check_open()?;
        let amount = if amount == 0 { self.len.saturating_sub(self.pos) } else { amount };
        if self.pos + amount > self.len {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        self.scratch.resize(amount as usize, 0);
        self.file.seek(SeekFrom::Start(self.pos))?;
        self.file.read_exact(&mut self.scratch)?;
        self.pos += amount;
        Ok(&self.scratch[..])
    }

    /// Atomically splice `bytes` into the file at `at`, replacing the
    /// `replace_len` bytes that used to live there. Builds the new tail in
    /// memory first so a write failure partway through can't leave the file
    /// half-shifted.
    pub fn insert(&mut self, bytes: &[u8], at: u64, replace_len: u64) -> io::Result<()> {
        self.check_open()?;
        if self.mode != Mode::ReadWrite {
            return Err(crate::ioerr!(io::ErrorKind::PermissionDenied, "file not opened for writing"));
        }
        let tail_start = at + replace_len;
        if tail_start > self.len {
            return Err(crate::ioerr!(io::ErrorKind::InvalidInput, "insert range extends past end of file"));
        }
        let mut tail = Vec::with_capacity((self.len - tail_start) as usize);
        self.file.seek(SeekFrom::Start(tail_start))?;
        self.file.take(self.len - tail_start).read_to_end(&mut tail)?;

        self.file.seek(SeekFrom::Start(at))?;
        self.file.write_all(bytes)?;
        self.file.write_all(&tail)?;
        let new_len = at + bytes.len() as u64 + tail.len() as u64;
        self.file.set_len(new_len)?;
        self.file.flush()?;

        self.len = new_len;
        if self.pos > new_len {
            self.pos = new_len;
        }
        Ok(())
    }

    pub fn close(&mut self) {
        self.mode = Mode::Closed;
    }
}

impl ReadBytes for Mp4File {
    fn read(&mut self, amount: u64) -> io::Result<&[u8]> {
        self.read_block(amount)
    }
    fn skip(&mut self, amount: u64) -> io::Result<()> {
        self.check_open()?;
        if self.pos + amount > self.len {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        self.pos += amount;
        Ok(())
    }
    fn left(&self) -> u64 {
        self.len.saturating_sub(self.pos)
    }
}

impl WriteBytes for Mp4File {
    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        self.check_open()?;
        if self.mode != Mode::ReadWrite {
            return Err(crate::ioerr!(io::ErrorKind::PermissionDenied, "file not opened for writing"));
        }
        self.file.seek(SeekFrom::Start(self.pos))?;
        self.file.write_all(data)?;
        self.pos += data.len() as u64;
        if self.pos > self.len {
            self.len = self.pos;
        }
        Ok(())
    }
    fn skip(&mut self, amount: u64) -> io::Result<()> {
        self.check_open()?;
        let zeroes = vec![0u8; amount as usize];
        self.write(&zeroes)
    }
}

impl BoxBytes for Mp4File {
    fn pos(&self) -> u64 {
        self.pos
    }
    fn seek(&mut self, pos: u64) -> io::Result<()> {
        self.pos = pos;
        Ok(())
    }
    fn size(&self) -> u64 {
        self.len
    }
}

/// Read-only cursor over an in-memory byte slice, used by the parser's
/// byte-builder tests and anywhere a box tree needs to be re-read from a
/// buffer it was just serialized into.
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: u64,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Cursor<'a> {
        Cursor { data, pos: 0 }
    }
}

impl<'a> ReadBytes for Cursor<'a> {
    fn read(&mut self, amount: u64) -> io::Result<&[u8]> {
        let amount = if amount == 0 { self.left() } else { amount };
        let start = self.pos as usize;
        let end = start + amount as usize;
        if end > self.data.len() {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        self.pos = end as u64;
        Ok(&self.data[start..end])
    }
    fn skip(&mut self, amount: u64) -> io::Result<()> {
        if self.pos + amount > self.data.len() as u64 {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        self.pos += amount;
        Ok(())
    }
    fn left(&self) -> u64 {
        self.data.len() as u64 - self.pos
    }
}

impl<'a> BoxBytes for Cursor<'a> {
    fn pos(&self) -> u64 {
        self.pos
    }
    fn seek(&mut self, pos: u64) -> io::Result<()> {
        if pos > self.data.len() as u64 {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        self.pos = pos;
        Ok(())
    }
    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Growable in-memory write buffer, used to serialize a box tree before
/// splicing it into an `Mp4File`, and by every low-level round-trip test.
#[derive(Default)]
pub struct MemWriter {
    buf: Vec<u8>,
    pos: u64,
}

impl MemWriter {
    pub fn new() -> MemWriter {
        MemWriter { buf: Vec::new(), pos: 0 }
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

impl WriteBytes for MemWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        let start = self.pos as usize;
        let end = start + data.len();
        if end > self.buf.len() {
            self.buf.resize(end, 0);
        }
        self.buf[start..end].copy_from_slice(data);
        self.pos = end as u64;
        Ok(())
    }
    fn skip(&mut self, amount: u64) -> io::Result<()> {
        let end = self.pos + amount;
        if end > self.buf.len() as u64 {
            self.buf.resize(end as usize, 0);
        }
        self.pos = end;
        Ok(())
    }
}

impl BoxBytes for MemWriter {
    fn pos(&self) -> u64 {
        self.pos
    }
    fn seek(&mut self, pos: u64) -> io::Result<()> {
        self.pos = pos;
        Ok(())
    }
    fn size(&self) -> u64 {
        self.buf.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mem_writer_round_trips_through_cursor() {
        let mut w = MemWriter::new();
        w.write(b"hello").unwrap();
        let buf = w.into_inner();
        let mut c = Cursor::new(&buf);
        assert_eq!(c.read(5).unwrap(), b"hello");
        assert_eq!(c.left(), 0);
    }

    #[test]
    fn mem_writer_seek_then_patch() {
        let mut w = MemWriter::new();
        w.write(b"0000").unwrap();
        w.write(b"tail").unwrap();
        w.seek(0).unwrap();
        w.write(b"1234").unwrap();
        assert_eq!(w.into_inner(), b"1234tail");
    }
}
