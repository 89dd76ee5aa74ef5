//! Common imports for `boxes/*.rs` modules: the box sum type, the
//! header/reader/writer machinery, the byte-stream traits, and the
//! primitive value types. `use crate::boxes::prelude::*;` at the top of a
//! new box file pulls in everything the others already import by hand.
pub(crate) use crate::boxes::MP4Box;
pub(crate) use crate::fromtobytes::{BoxBytes, FromBytes, ReadBytes, ToBytes, WriteBytes};
pub(crate) use crate::mp4box::{read_full_box_header, write_full_box_header, BoxInfo, BoxReader, BoxWriter, FullBox};
pub(crate) use crate::types::*;
pub(crate) use std::io;
