//! `meta` — ISO "metadata" box: a `FullBox` preamble followed by children,
//! conventionally `hdlr` (declaring handler `mdir` for iTunes tags) and
//! `ilst` (the actual Apple tag list).
use std::io;

use crate::boxes::ilst::AppleItemListBox;
use crate::boxes::hdlr::HandlerBox;
use crate::boxes::MP4Box;
use crate::fromtobytes::{FromBytes, ReadBytes, ToBytes, WriteBytes};
use crate::mp4box::{read_full_box_header, write_full_box_header};
use crate::types::FourCC;

#[derive(Clone, Debug, Default)]
pub struct MetaBox {
    pub version: u8,
    pub flags: u32,
    pub boxes: Vec<MP4Box>,
}

impl FromBytes for MetaBox {
    fn from_bytes<R: ReadBytes>(stream: &mut R) -> io::Result<MetaBox> {
        let (version, flags) = read_full_box_header(stream)?;
        let mut boxes = Vec::new();
        while stream.left() > 0 {
            boxes.push(MP4Box::from_bytes(stream)?);
        }
        Ok(MetaBox { version, flags, boxes })
    }
    fn min_size() -> usize {
        4
    }
}

impl ToBytes for MetaBox {
    fn to_bytes<W: WriteBytes>(&self, stream: &mut W) -> io::Result<()> {
        write_full_box_header(stream, self.version, self.flags)?;
        for b in &self.boxes {
            b.to_bytes(stream)?;
        }
        Ok(())
    }
}

impl MetaBox {
    declare_box_methods_opt!(HandlerBox, handler, handler_mut);
    declare_box_methods_opt!(AppleItemListBox, ilst, ilst_mut);

    /// Guarantee an `ilst` (and the `hdlr` it requires) exist, inserting
    /// them if this `meta` has neither yet.
    pub fn ensure_ilst(&mut self) -> &mut AppleItemListBox {
        if self.handler().is_none() {
            self.boxes.insert(0, MP4Box::HandlerBox(HandlerBox::new_metadata()));
        }
        if self.ilst().is_none() {
            self.boxes.push(MP4Box::AppleItemListBox(AppleItemListBox::default()));
        }
        self.ilst_mut().unwrap()
    }

    pub fn fourcc() -> FourCC {
        FourCC::from(&b"meta"[..])
    }
}
