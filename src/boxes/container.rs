//! The plain "load my children and nothing else" box shape shared by
//! `moov`, `trak`, `mdia`, `minf`, and `stbl`. Each gets its own type name
//! (matching the ISO box it represents) so `MP4Box`'s variants, and the
//! `first_box!`/`declare_box_methods!` accessors built on top of them,
//! read naturally — but all four share one implementation.
use std::io;

use crate::boxes::hdlr::HandlerBox;
use crate::boxes::mvhd::MovieHeaderBox;
use crate::boxes::stco::ChunkOffsetBox;
use crate::boxes::stsd::SampleDescriptionBox;
use crate::boxes::udta::UserDataBox;
use crate::boxes::MP4Box;
use crate::fromtobytes::{FromBytes, ReadBytes, ToBytes, WriteBytes};

#[derive(Clone, Debug, Default)]
pub struct Container {
    pub boxes: Vec<MP4Box>,
}

impl FromBytes for Container {
    fn from_bytes<R: ReadBytes>(stream: &mut R) -> io::Result<Container> {
        let mut boxes = Vec::new();
        while stream.left() > 0 {
            boxes.push(MP4Box::from_bytes(stream)?);
        }
        Ok(Container { boxes })
    }
    fn min_size() -> usize {
        0
    }
}

impl ToBytes for Container {
    fn to_bytes<W: WriteBytes>(&self, stream: &mut W) -> io::Result<()> {
        for b in &self.boxes {
            b.to_bytes(stream)?;
        }
        Ok(())
    }
}

pub type MovieBox = Container;
pub type TrackBox = Container;
pub type MediaBox = Container;
pub type MediaInformationBox = Container;
pub type SampleTableBox = Container;

impl Container {
    declare_box_methods_opt!(MovieHeaderBox, movie_header, movie_header_mut);
    declare_box_methods_opt!(UserDataBox, user_data, user_data_mut);
    declare_box_methods_opt!(HandlerBox, handler, handler_mut);
    declare_box_methods_opt!(SampleDescriptionBox, sample_description, sample_description_mut);
    declare_box_methods_opt!(MediaBox, media, media_mut);
    declare_box_methods_opt!(MediaInformationBox, media_information, media_information_mut);
    declare_box_methods_opt!(SampleTableBox, sample_table, sample_table_mut);

    /// The first child whose fourcc is `stco` or `co64`, whichever this
    /// track actually uses.
    pub fn chunk_offsets(&self) -> Option<&ChunkOffsetBox> {
        self.boxes.iter().find_map(|b| match b {
            MP4Box::ChunkOffsetBox(c) | MP4Box::ChunkLargeOffsetBox(c) => Some(c),
            _ => None,
        })
    }

    pub fn chunk_offsets_mut(&mut self) -> Option<&mut ChunkOffsetBox> {
        self.boxes.iter_mut().find_map(|b| match b {
            MP4Box::ChunkOffsetBox(c) | MP4Box::ChunkLargeOffsetBox(c) => Some(c),
            _ => None,
        })
    }

    pub fn ensure_user_data(&mut self) -> &mut UserDataBox {
        if self.user_data().is_none() {
            self.boxes.push(MP4Box::UserDataBox(UserDataBox::default()));
        }
        self.user_data_mut().unwrap()
    }

    pub fn tracks(&self) -> impl Iterator<Item = &TrackBox> {
        iter_box!(&self.boxes, TrackBox)
    }

    pub fn tracks_mut(&mut self) -> impl Iterator<Item = &mut TrackBox> {
        iter_box_mut!(&mut self.boxes, TrackBox)
    }
}
