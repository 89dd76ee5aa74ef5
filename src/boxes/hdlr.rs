//! `hdlr` — declares the handler type of the enclosing `mdia` (or, for an
//! iTunes `meta`, the fixed `mdir`). The parser propagates whichever
//! `hdlr` it sees down to every descendant box, most importantly to
//! disambiguate `stsd`'s sample-entry interpretation.
use std::io;

use crate::fromtobytes::{FromBytes, ReadBytes, ToBytes, WriteBytes};
use crate::mp4box::{read_full_box_header, write_full_box_header, BoxReader, BoxWriter};
use crate::types::{FourCC, ZString};

#[derive(Clone, Debug)]
pub struct HandlerBox {
    pub version: u8,
    pub flags: u32,
    pub handler_type: FourCC,
    pub name: ZString,
}

impl HandlerBox {
    pub fn read_data(reader: &mut BoxReader) -> io::Result<HandlerBox> {
        let (version, flags) = read_full_box_header(reader)?;
        reader.skip(4)?; // pre_defined
        let handler_type = FourCC::from_bytes(reader)?;
        reader.skip(12)?; // reserved(32)[3]
        let name = ZString::from_bytes(reader)?;
        Ok(HandlerBox { version, flags, handler_type, name })
    }

    pub fn write_data(&self, writer: &mut BoxWriter) -> io::Result<()> {
        write_full_box_header(writer, self.version, self.flags)?;
        writer.skip(4)?;
        self.handler_type.to_bytes(writer)?;
        writer.skip(12)?;
        self.name.to_bytes(writer)
    }

    pub fn is_audio(&self) -> bool {
        self.handler_type == &b"soun"[..] || self.handler_type == &b"alis"[..]
    }

    pub fn is_video(&self) -> bool {
        self.handler_type == &b"vide"[..]
    }

    pub fn is_metadata(&self) -> bool {
        self.handler_type == &b"mdir"[..]
    }
}

impl HandlerBox {
    /// The handler iTunes `meta` boxes that carry tags always declare.
    pub fn new_metadata() -> HandlerBox {
        HandlerBox { version: 0, flags: 0, handler_type: FourCC::from(&b"mdir"[..]), name: ZString(String::new()) }
    }
}
