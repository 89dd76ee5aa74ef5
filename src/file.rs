//! File assembly: binds a parsed box tree to an on-disk file and
//! implements the in-place, chunk-offset-preserving save.
//!
//! `TaggedFile` always decodes the full `moov` subtree (`ParseMode::
//! TagAndProperties`) rather than lazily widening from a shallower mode;
//! see `DESIGN.md` for why that collapsing doesn't change observable
//! behaviour for this crate's scope.
use std::io;
use std::path::Path;

use crate::boxes::{AppleItemListBox, AudioSampleEntry, MovieHeaderBox, MP4Box, MovieBox, SampleEntry, TrackBox, UserDataBox, VisualSampleEntry};
use crate::fromtobytes::ToBytes;
use crate::io::{MemWriter, Mode, Mp4File};
use crate::mp4box::BoxWriter;
use crate::parser::{ParseMode, ParsedFile};
use crate::types::FourCC;

/// Where the `udta/meta/ilst` chain this file exposes as *the* tag lives.
/// Picked once at open time, preferring the shallowest existing `ilst`
/// (movie-level over any track's); a file with neither gets one created
/// at movie level the first time a caller asks to mutate the tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UdtaLocation {
    Movie,
    Track(usize),
}

/// A `.m4a`/`.mp4` file opened for reading (and, via `open`, writing) its
/// Apple tag. Wraps the on-disk `Mp4File`, the decoded box tree, and the
/// resolved tag location.
pub struct TaggedFile {
    file: Mp4File,
    parsed: ParsedFile,
    udta_location: UdtaLocation,
}

impl TaggedFile {
    /// Open for reading and writing.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<TaggedFile> {
        Self::open_internal(Mp4File::open(path)?)
    }

    /// Open read-only; `tag_mut()`/`save()` fail on the result.
    pub fn open_readonly<P: AsRef<Path>>(path: P) -> io::Result<TaggedFile> {
        Self::open_internal(Mp4File::open_readonly(path)?)
    }

    fn open_internal(mut file: Mp4File) -> io::Result<TaggedFile> {
        file.seek(0)?;
        let parsed = match ParsedFile::parse(&mut file, ParseMode::TagAndProperties) {
            Ok(p) => p,
            Err(e) => {
                warn!("marking file as corrupt: {}", e);
                file.mark_as_corrupt(e.to_string());
                ParsedFile::default()
            }
        };
        let udta_location = locate_udta(&parsed);
        Ok(TaggedFile { file, parsed, udta_location })
    }

    pub fn is_corrupt(&self) -> bool {
        self.file.is_corrupt()
    }

    pub fn corrupt_reason(&self) -> Option<&str> {
        self.file.corrupt_reason()
    }

    pub fn movie_header(&self) -> Option<&MovieHeaderBox> {
        self.parsed.moov.as_ref()?.movie_header()
    }

    /// `mvhd.duration / mvhd.timescale * 1000`; 0 if there is no `mvhd`.
    pub fn duration_ms(&self) -> u64 {
        self.movie_header().map(|h| h.duration_ms()).unwrap_or(0)
    }

    /// The codec-level properties of the first audio track, decoded from
    /// its `stsd`'s first sample entry per the handler it inherits from
    /// `mdia/hdlr`.
    pub fn audio_properties(&self) -> Option<AudioSampleEntry> {
        self.parsed.moov.as_ref()?.tracks().find_map(|trak| match sample_entry(trak) {
            Some(SampleEntry::Audio(a)) => Some(a),
            _ => None,
        })
    }

    /// The codec-level properties of the first video track, decoded the
    /// same way as `audio_properties`.
    pub fn video_properties(&self) -> Option<VisualSampleEntry> {
        self.parsed.moov.as_ref()?.tracks().find_map(|trak| match sample_entry(trak) {
            Some(SampleEntry::Visual(v)) => Some(v),
            _ => None,
        })
    }

    /// The resolved tag, if this file (or the track it falls back to) has
    /// one. Never creates anything — use `tag_mut()` to get a writable
    /// handle that creates the `udta/meta/ilst` chain on demand.
    pub fn tag(&self) -> Option<&AppleItemListBox> {
        let moov = self.parsed.moov.as_ref()?;
        match self.udta_location {
            UdtaLocation::Movie => moov.user_data()?.meta()?.ilst(),
            UdtaLocation::Track(i) => moov.tracks().nth(i)?.user_data()?.meta()?.ilst(),
        }
    }

    /// A writable handle to the tag, creating the `udta/meta/ilst`
    /// (and, inside `meta`, the `hdlr` it requires) chain if it doesn't
    /// exist yet.
    pub fn tag_mut(&mut self) -> io::Result<&mut AppleItemListBox> {
        if self.file.mode() != Mode::ReadWrite {
            return Err(crate::ioerr!(io::ErrorKind::PermissionDenied, "file not opened for writing"));
        }
        let location = self.udta_location;
        let moov = self.parsed.moov.as_mut().ok_or_else(|| crate::ioerr!(io::ErrorKind::Other, "no moov box decoded"))?;
        let udta: &mut UserDataBox = match location {
            UdtaLocation::Movie => moov.ensure_user_data(),
            UdtaLocation::Track(i) => moov
                .tracks_mut()
                .nth(i)
                .ok_or_else(|| crate::ioerr!(io::ErrorKind::Other, "track {} no longer present", i))?
                .ensure_user_data(),
        };
        Ok(udta.ensure_meta().ensure_ilst())
    }

    /// Re-serialize `moov` and splice it back into the file in place,
    /// adjusting every track's chunk-offset table by however much the
    /// rewritten `moov` grew or shrank `mdat`'s starting position.
    pub fn save(&mut self) -> io::Result<()> {
        if self.file.mode() != Mode::ReadWrite {
            return Err(crate::ioerr!(io::ErrorKind::PermissionDenied, "file not opened for writing"));
        }
        let moov_header = self.parsed.moov_header.clone().ok_or_else(|| crate::ioerr!(io::ErrorKind::Other, "no moov box to rewrite"))?;
        let mdat_start = self.parsed.mdat_start.unwrap_or(moov_header.position + moov_header.total_size);
        let moov = self.parsed.moov.as_mut().ok_or_else(|| crate::ioerr!(io::ErrorKind::Other, "no moov box decoded"))?;

        let mut bytes = serialize_moov(moov)?;
        let mut applied: i64 = 0;
        // A chunk-offset shift can itself grow `moov` (an stco entry
        // outgrowing 32 bits forces an stco -> co64 upgrade), so converge
        // rather than adjust once. Real files need at most one extra pass;
        // the bound is headroom against a pathological table.
        for _ in 0..4 {
            let current_delta = bytes.len() as i64 - moov_header.total_size as i64;
            let increment = current_delta - applied;
            if increment == 0 {
                break;
            }
            adjust_chunk_offsets(moov, mdat_start, increment);
            applied = current_delta;
            bytes = serialize_moov(moov)?;
        }

        self.file.insert(&bytes, moov_header.position, moov_header.total_size)?;
        self.file.close();
        Ok(())
    }
}

/// Resolve a track's inherited handler (`mdia/hdlr`) and, if present,
/// decode its `stsd`'s first sample entry accordingly.
fn sample_entry(trak: &TrackBox) -> Option<SampleEntry> {
    let mdia = trak.media()?;
    let handler = mdia.handler()?;
    let stsd = mdia.media_information()?.sample_table()?.sample_description()?;
    stsd.decode_first_entry(handler.is_audio(), handler.is_video()).ok().flatten()
}

fn locate_udta(parsed: &ParsedFile) -> UdtaLocation {
    let moov = match &parsed.moov {
        Some(m) => m,
        None => return UdtaLocation::Movie,
    };
    if has_ilst(moov.user_data()) {
        return UdtaLocation::Movie;
    }
    for (i, trak) in moov.tracks().enumerate() {
        if has_ilst(trak.user_data()) {
            return UdtaLocation::Track(i);
        }
    }
    UdtaLocation::Movie
}

fn has_ilst(udta: Option<&UserDataBox>) -> bool {
    udta.and_then(|u| u.meta()).and_then(|m| m.ilst()).is_some()
}

fn serialize_moov(moov: &MovieBox) -> io::Result<Vec<u8>> {
    let mut w = MemWriter::new();
    {
        let mut writer = BoxWriter::new(&mut w, FourCC::from(&b"moov"[..]))?;
        moov.to_bytes(&mut writer)?;
    }
    Ok(w.into_inner())
}

/// Shift every track's chunk-offset table by `delta`, upgrading `stco` to
/// `co64` in place wherever an adjusted entry no longer fits in 32 bits.
fn adjust_chunk_offsets(moov: &mut MovieBox, mdat_start: u64, delta: i64) {
    for trak in moov.tracks_mut() {
        let stbl = match trak.media_mut().and_then(|m| m.media_information_mut()).and_then(|mi| mi.sample_table_mut()) {
            Some(s) => s,
            None => continue,
        };
        let needs_upgrade = match stbl.chunk_offsets_mut() {
            Some(c) => {
                c.adjust(mdat_start, delta);
                c.needs_64_bit()
            }
            None => false,
        };
        if !needs_upgrade {
            continue;
        }
        if let Some(idx) = stbl.boxes.iter().position(|b| matches!(b, MP4Box::ChunkOffsetBox(_))) {
            if let MP4Box::ChunkOffsetBox(inner) = stbl.boxes[idx].clone() {
                stbl.boxes[idx] = MP4Box::ChunkLargeOffsetBox(inner);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::ftyp::FileTypeBox;
    use crate::boxes::hdlr::HandlerBox;
    use crate::boxes::mdat::{DataRef, MediaDataBox};
    use crate::boxes::meta::MetaBox;
    use crate::boxes::stco::ChunkOffsetBox;
    use crate::boxes::stsd::SampleDescriptionBox;
    use crate::boxes::udta::UserDataBox as Udta;
    use crate::fromtobytes::WriteBytes;
    use crate::tag::AppleTagExt;
    use crate::types::ZString;
    use std::io::Write as _;

    fn build_file(track_offset_bytes: u32) -> Vec<u8> {
        let mut w = MemWriter::new();
        MP4Box::FileTypeBox(FileTypeBox { major_brand: FourCC::new("M4A "), minor_version: 0, compatible_brands: vec![FourCC::new("M4A ")] })
            .to_bytes(&mut w)
            .unwrap();

        let stco = ChunkOffsetBox { version: 0, flags: 0, entries: vec![track_offset_bytes as u64] };
        let stbl = MovieBox { boxes: vec![MP4Box::ChunkOffsetBox(stco)] };
        let minf = MovieBox { boxes: vec![MP4Box::SampleTableBox(stbl)] };
        let mdia = MovieBox { boxes: vec![MP4Box::MediaInformationBox(minf)] };
        let trak = MovieBox { boxes: vec![MP4Box::MediaBox(mdia)] };
        let moov = MovieBox { boxes: vec![MP4Box::TrackBox(trak)] };
        MP4Box::MovieBox(moov).to_bytes(&mut w).unwrap();
        MP4Box::MediaDataBox(MediaDataBox { data: DataRef::Owned(vec![0xab; 8]) }).to_bytes(&mut w).unwrap();
        w.into_inner()
    }

    /// A single `mp4a` sample entry (reserved/data-ref-index/reserved/
    /// channel-count/sample-size/pre-defined/reserved/sample-rate), wrapped
    /// in its own box header so `SampleDescriptionBox::decode_first_entry`
    /// can read it back.
    fn audio_sample_entry_raw(sample_rate_hz: u32, channel_count: u16, sample_size: u16) -> Vec<u8> {
        let mut body = MemWriter::new();
        body.write(&[0u8; 6]).unwrap(); // reserved
        2u16.to_bytes(&mut body).unwrap(); // data_reference_index
        body.write(&[0u8; 8]).unwrap(); // reserved(32)[2]
        channel_count.to_bytes(&mut body).unwrap();
        sample_size.to_bytes(&mut body).unwrap();
        body.write(&[0u8; 4]).unwrap(); // pre_defined + reserved
        (sample_rate_hz << 16).to_bytes(&mut body).unwrap(); // 16.16 fixed point
        let payload = body.into_inner();

        let mut entry = MemWriter::new();
        {
            let mut w = BoxWriter::new(&mut entry, FourCC::new("mp4a")).unwrap();
            w.write(&payload).unwrap();
            w.finalize().unwrap();
        }
        entry.into_inner()
    }

    fn build_audio_file() -> Vec<u8> {
        let mut w = MemWriter::new();
        MP4Box::FileTypeBox(FileTypeBox { major_brand: FourCC::new("M4A "), minor_version: 0, compatible_brands: vec![FourCC::new("M4A ")] })
            .to_bytes(&mut w)
            .unwrap();

        let stsd = SampleDescriptionBox { version: 0, flags: 0, entry_count: 1, raw: audio_sample_entry_raw(44100, 2, 16) };
        let stco = ChunkOffsetBox { version: 0, flags: 0, entries: vec![1000] };
        let stbl = MovieBox { boxes: vec![MP4Box::SampleDescriptionBox(stsd), MP4Box::ChunkOffsetBox(stco)] };
        let minf = MovieBox { boxes: vec![MP4Box::SampleTableBox(stbl)] };
        let hdlr = HandlerBox { version: 0, flags: 0, handler_type: FourCC::new("soun"), name: ZString(String::new()) };
        let mdia = MovieBox { boxes: vec![MP4Box::HandlerBox(hdlr), MP4Box::MediaInformationBox(minf)] };
        let trak = MovieBox { boxes: vec![MP4Box::MediaBox(mdia)] };
        let moov = MovieBox { boxes: vec![MP4Box::TrackBox(trak)] };
        MP4Box::MovieBox(moov).to_bytes(&mut w).unwrap();
        MP4Box::MediaDataBox(MediaDataBox { data: DataRef::Owned(vec![0xab; 4000]) }).to_bytes(&mut w).unwrap();
        w.into_inner()
    }

    #[test]
    fn audio_properties_decoded_from_first_stsd_entry() {
        let bytes = build_audio_file();
        let path = write_temp(&bytes);
        let f = TaggedFile::open_readonly(&path).unwrap();
        assert!(!f.is_corrupt());
        let props = f.audio_properties().expect("audio sample entry");
        assert_eq!(props.channel_count, 2);
        assert_eq!(props.sample_size, 16);
        assert_eq!(props.sample_rate_hz, 44100);
        assert!(f.video_properties().is_none());
        std::fs::remove_file(&path).ok();
    }

    fn write_temp(bytes: &[u8]) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("m4ameta-test-{}-{}.m4a", std::process::id(), bytes.len()));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn locates_shallow_ilst_at_movie_level() {
        let mut moov: MovieBox = Default::default();
        let mut udta = Udta::default();
        let meta = MetaBox { version: 0, flags: 0, boxes: vec![MP4Box::HandlerBox(HandlerBox::new_metadata()), MP4Box::AppleItemListBox(AppleItemListBox::default())] };
        udta.boxes.push(MP4Box::MetaBox(meta));
        moov.boxes.push(MP4Box::UserDataBox(udta));
        let parsed = ParsedFile { ftyp: None, moov: Some(moov), moov_header: None, top_level: Vec::new(), mdat_start: None, mdat_end: None };
        assert_eq!(locate_udta(&parsed), UdtaLocation::Movie);
    }

    #[test]
    fn open_missing_tag_then_create_and_round_trip() {
        let bytes = build_file(1000);
        let path = write_temp(&bytes);

        {
            let mut f = TaggedFile::open(&path).unwrap();
            assert!(!f.is_corrupt());
            assert!(f.tag().is_none());
            f.tag_mut().unwrap().set_title("Hello");
            f.save().unwrap();
        }

        let f = TaggedFile::open_readonly(&path).unwrap();
        assert_eq!(f.tag().unwrap().title(), Some("Hello"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn rejects_mutation_on_readonly_handle() {
        let bytes = build_file(1000);
        let path = write_temp(&bytes);
        let mut f = TaggedFile::open_readonly(&path).unwrap();
        assert!(f.tag_mut().is_err());
        std::fs::remove_file(&path).ok();
    }
}
