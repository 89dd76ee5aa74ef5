//! Builds minimal `.m4a` byte strings in memory (ftyp+moov+udta/meta/ilst
//! +mdat, one track with a small stco table) and round-trips them through
//! the parser, tag façade, and on-disk save.
use std::io::Write;

use m4ameta::boxes::mdat::DataRef;
use m4ameta::boxes::{
    AppleItemListBox, ChunkOffsetBox, FileTypeBox, HandlerBox, MP4Box, MediaBox, MediaDataBox, MediaInformationBox, MetaBox, MovieBox, SampleTableBox,
    TrackBox, UserDataBox,
};
use m4ameta::fromtobytes::ToBytes;
use m4ameta::io::{Cursor, MemWriter};
use m4ameta::parser::ParsedFile;
use m4ameta::tag::AppleTagExt;
use m4ameta::types::FourCC;
use m4ameta::TaggedFile;

fn tagged_ilst() -> AppleItemListBox {
    let mut ilst = AppleItemListBox::default();
    ilst.set_title("Integration Test Track");
    ilst.set_album("Integration Test Album");
    ilst.set_artists(&["Artist One".to_string(), "Artist Two".to_string()]);
    ilst.set_year(2020);
    ilst.set_track_number(3);
    ilst.set_track_total(12);
    ilst
}

fn sample_file(chunk_offset: u32, with_tag: bool) -> Vec<u8> {
    let mut w = MemWriter::new();
    MP4Box::FileTypeBox(FileTypeBox { major_brand: FourCC::new("M4A "), minor_version: 0, compatible_brands: vec![FourCC::new("M4A "), FourCC::new("mp42")] })
        .to_bytes(&mut w)
        .unwrap();

    let stco = ChunkOffsetBox { version: 0, flags: 0, entries: vec![chunk_offset as u64] };
    let stbl: SampleTableBox = MovieBox { boxes: vec![MP4Box::ChunkOffsetBox(stco)] };
    let minf: MediaInformationBox = MovieBox { boxes: vec![MP4Box::SampleTableBox(stbl)] };
    let mdia: MediaBox = MovieBox { boxes: vec![MP4Box::MediaInformationBox(minf)] };
    let trak: TrackBox = MovieBox { boxes: vec![MP4Box::MediaBox(mdia)] };

    let mut moov_boxes = vec![MP4Box::TrackBox(trak)];
    if with_tag {
        let meta = MetaBox { version: 0, flags: 0, boxes: vec![MP4Box::HandlerBox(HandlerBox::new_metadata()), MP4Box::AppleItemListBox(tagged_ilst())] };
        let udta: UserDataBox = MovieBox { boxes: vec![MP4Box::MetaBox(meta)] };
        moov_boxes.push(MP4Box::UserDataBox(udta));
    }
    let moov = MovieBox { boxes: moov_boxes };

    MP4Box::MovieBox(moov).to_bytes(&mut w).unwrap();
    MP4Box::MediaDataBox(MediaDataBox { data: DataRef::Owned(vec![0x11; 16]) }).to_bytes(&mut w).unwrap();
    w.into_inner()
}

#[test]
fn parses_tag_out_of_a_byte_built_file() {
    let bytes = sample_file(512, true);
    let mut cursor = Cursor::new(&bytes);
    let parsed = ParsedFile::parse_tag_and_properties(&mut cursor).unwrap();
    let moov = parsed.moov.unwrap();
    let ilst = moov.user_data().unwrap().meta().unwrap().ilst().unwrap();
    assert_eq!(ilst.title(), Some("Integration Test Track"));
    assert_eq!(ilst.artists(), vec!["Artist One".to_string(), "Artist Two".to_string()]);
    assert_eq!(ilst.track_number(), 3);
    assert_eq!(ilst.track_total(), 12);
}

#[test]
fn save_preserves_chunk_offsets_after_growing_the_tag() {
    // Chosen far past where ftyp+moov could plausibly end, so `save()`'s
    // delta shift is guaranteed to apply to this entry.
    let original_offset: u64 = 100_000;
    let bytes = sample_file(original_offset as u32, false);
    let original_len = bytes.len() as u64;

    let mut path = std::env::temp_dir();
    path.push(format!("m4ameta-roundtrip-{}.m4a", std::process::id()));
    std::fs::File::create(&path).unwrap().write_all(&bytes).unwrap();

    {
        let mut file = TaggedFile::open(&path).unwrap();
        assert!(!file.is_corrupt());
        assert!(file.tag().is_none());
        let tag = file.tag_mut().unwrap();
        tag.set_title("A freshly created, considerably longer title than before");
        tag.set_album("Album");
        file.save().unwrap();
    }

    let new_len = std::fs::metadata(&path).unwrap().len();
    let delta = new_len as i64 - original_len as i64;
    assert!(delta > 0, "adding a tag to an untagged file should grow it");

    let saved = std::fs::read(&path).unwrap();
    let mut cursor = Cursor::new(&saved);
    let parsed = ParsedFile::parse_tag_and_properties(&mut cursor).unwrap();
    let moov = parsed.moov.unwrap();
    let tag = moov.user_data().unwrap().meta().unwrap().ilst().unwrap();
    assert_eq!(tag.title(), Some("A freshly created, considerably longer title than before"));
    assert_eq!(tag.album(), Some("Album"));

    let stco = moov.tracks().next().unwrap().media().unwrap().media_information().unwrap().sample_table().unwrap().chunk_offsets().unwrap();
    assert_eq!(stco.entries, vec![(original_offset as i64 + delta) as u64]);

    std::fs::remove_file(&path).ok();
}

#[test]
fn rejects_a_file_whose_first_box_is_not_ftyp() {
    let mut w = MemWriter::new();
    let moov = MovieBox { boxes: Vec::new() };
    MP4Box::MovieBox(moov).to_bytes(&mut w).unwrap();
    let bytes = w.into_inner();
    let mut cursor = Cursor::new(&bytes);
    assert!(ParsedFile::parse_tag(&mut cursor).is_err());
}
