//! `url ` — data-reference entry pointing at this file itself (flags bit 0
//! set) or at an external location (a `ZString`). Kept verbatim; this
//! crate never resolves external media references.
use crate::boxes::prelude::*;

#[derive(Clone, Debug, Default)]
pub struct UrlBox {
    pub version: u8,
    pub flags: u32,
    pub location: ZString,
}

impl UrlBox {
    /// Bit 0 of `flags` means "media data is in this same file".
    pub fn is_self_contained(&self) -> bool {
        self.flags & 1 != 0
    }
}

impl FromBytes for UrlBox {
    fn from_bytes<R: ReadBytes>(stream: &mut R) -> io::Result<UrlBox> {
        let (version, flags) = read_full_box_header(stream)?;
        let location = if stream.left() > 0 { ZString::from_bytes(stream)? } else { ZString::default() };
        Ok(UrlBox { version, flags, location })
    }
    fn min_size() -> usize {
        4
    }
}

impl ToBytes for UrlBox {
    fn to_bytes<W: WriteBytes>(&self, stream: &mut W) -> io::Result<()> {
        write_full_box_header(stream, self.version, self.flags)?;
        if !self.is_self_contained() {
            self.location.to_bytes(stream)?;
        }
        Ok(())
    }
}
