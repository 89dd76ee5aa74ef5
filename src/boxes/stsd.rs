//! `stsd` — sample description: an `entry_count` followed by that many
//! sample-entry boxes. Codec-level decoding is out of scope, so entries
//! are kept as an opaque blob and only decoded into typed
//! `AudioSampleEntry`/`VisualSampleEntry` properties on demand, once the
//! caller knows the inherited handler (the factory rule in play: "first
//! `stsd` entry, interpreted per handler").
use std::io;

use crate::fromtobytes::{FromBytes, ReadBytes, ToBytes, WriteBytes};
use crate::io::Cursor;
use crate::mp4box::{read_full_box_header, write_full_box_header, BoxReader};
use crate::types::FixedFloat16_16;

#[derive(Clone, Debug, Default)]
pub struct SampleDescriptionBox {
    pub version: u8,
    pub flags: u32,
    pub entry_count: u32,
    /// The raw, still-encoded sample entries, verbatim from the wire.
    pub raw: Vec<u8>,
}

impl FromBytes for SampleDescriptionBox {
    fn from_bytes<R: ReadBytes>(stream: &mut R) -> io::Result<SampleDescriptionBox> {
        let (version, flags) = read_full_box_header(stream)?;
        let entry_count = u32::from_bytes(stream)?;
        let left = stream.left();
        let raw = stream.read(left)?.to_vec();
        Ok(SampleDescriptionBox { version, flags, entry_count, raw })
    }
    fn min_size() -> usize {
        8
    }
}

impl ToBytes for SampleDescriptionBox {
    fn to_bytes<W: WriteBytes>(&self, stream: &mut W) -> io::Result<()> {
        write_full_box_header(stream, self.version, self.flags)?;
        self.entry_count.to_bytes(stream)?;
        stream.write(&self.raw)
    }
}

#[derive(Clone, Debug)]
pub struct AudioSampleEntry {
    pub data_reference_index: u16,
    pub channel_count: u16,
    pub sample_size: u16,
    pub sample_rate_hz: u32,
}

#[derive(Clone, Debug)]
pub struct VisualSampleEntry {
    pub data_reference_index: u16,
    pub width: u16,
    pub height: u16,
}

#[derive(Clone, Debug)]
pub enum SampleEntry {
    Audio(AudioSampleEntry),
    Visual(VisualSampleEntry),
    Unknown,
}

impl SampleDescriptionBox {
    /// Decode just the first entry, interpreted per `handler` ("soun" ->
    /// audio, "vide" -> visual, anything else left opaque).
    pub fn decode_first_entry(&self, handler_is_audio: bool, handler_is_video: bool) -> io::Result<Option<SampleEntry>> {
        if self.raw.is_empty() {
            return Ok(None);
        }
        let mut cursor = Cursor::new(&self.raw);
        let mut reader = BoxReader::new(&mut cursor)?;
        reader.skip(6)?; // reserved
        let data_reference_index = u16::from_bytes(&mut reader)?;

        if handler_is_audio {
            reader.skip(8)?; // reserved(32)[2]
            let channel_count = u16::from_bytes(&mut reader)?;
            let sample_size = u16::from_bytes(&mut reader)?;
            reader.skip(2)?; // pre_defined
            reader.skip(2)?; // reserved
            let sample_rate = FixedFloat16_16::from_bytes(&mut reader)?;
            let sample_rate_hz = sample_rate.0 >> 16;
            Ok(Some(SampleEntry::Audio(AudioSampleEntry { data_reference_index, channel_count, sample_size, sample_rate_hz })))
        } else if handler_is_video {
            reader.skip(16)?; // pre_defined/reserved/pre_defined
            let width = u16::from_bytes(&mut reader)?;
            let height = u16::from_bytes(&mut reader)?;
            Ok(Some(SampleEntry::Visual(VisualSampleEntry { data_reference_index, width, height })))
        } else {
            Ok(Some(SampleEntry::Unknown))
        }
    }
}
