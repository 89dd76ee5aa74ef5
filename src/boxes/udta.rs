//! `udta` — user-data box, the conventional home of `meta/ilst`. A plain
//! container; the file-assembly layer creates the `meta`/`ilst`/`hdlr`
//! chain inside one on demand when a tag is first written.
use std::io;

use crate::boxes::meta::MetaBox;
use crate::boxes::MP4Box;
use crate::fromtobytes::{FromBytes, ReadBytes, ToBytes, WriteBytes};

#[derive(Clone, Debug, Default)]
pub struct UserDataBox {
    pub boxes: Vec<MP4Box>,
}

impl FromBytes for UserDataBox {
    fn from_bytes<R: ReadBytes>(stream: &mut R) -> io::Result<UserDataBox> {
        let mut boxes = Vec::new();
        while stream.left() > 0 {
            boxes.push(MP4Box::from_bytes(stream)?);
        }
        Ok(UserDataBox { boxes })
    }
    fn min_size() -> usize {
        0
    }
}

impl ToBytes for UserDataBox {
    fn to_bytes<W: WriteBytes>(&self, stream: &mut W) -> io::Result<()> {
        for b in &self.boxes {
            b.to_bytes(stream)?;
        }
        Ok(())
    }
}

impl UserDataBox {
    declare_box_methods_opt!(MetaBox, meta, meta_mut);

    /// Guarantee a `meta` box (with `ilst`) exists under this `udta`.
    pub fn ensure_meta(&mut self) -> &mut MetaBox {
        if self.meta().is_none() {
            self.boxes.push(MP4Box::MetaBox(MetaBox::default()));
        }
        self.meta_mut().unwrap()
    }
}
