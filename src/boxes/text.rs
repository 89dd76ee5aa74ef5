//! `text` — the generic ISO "text" sample entry / chapter-text box. Not
//! interpreted any further by this crate; kept as opaque bytes so files
//! that carry one still round-trip exactly.
use crate::boxes::prelude::*;

#[derive(Clone, Debug, Default)]
pub struct TextBox {
    pub data: Vec<u8>,
}

impl FromBytes for TextBox {
    fn from_bytes<R: ReadBytes>(stream: &mut R) -> io::Result<TextBox> {
        let left = stream.left();
        let data = stream.read(left)?.to_vec();
        Ok(TextBox { data })
    }
    fn min_size() -> usize {
        0
    }
}

impl ToBytes for TextBox {
    fn to_bytes<W: WriteBytes>(&self, stream: &mut W) -> io::Result<()> {
        stream.write(&self.data)
    }
}
