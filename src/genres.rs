//! The ID3v1 genre table. Apple's legacy `gnre` atom stores a genre as a
//! big-endian `u16` equal to the table index (0 means "unset"); the tag
//! façade (`tag.rs`) uses this to translate `gnre` into the same
//! genre-name strings `©gen` carries as text.
const ID3V1_GENRES: &[&str] = &[
    "Blues", "Classic Rock", "Country", "Dance", "Disco", "Funk", "Grunge", "Hip-Hop", "Jazz", "Metal", "New Age",
    "Oldies", "Other", "Pop", "R&B", "Rap", "Reggae", "Rock", "Techno", "Industrial", "Alternative", "Ska",
    "Death Metal", "Pranks", "Soundtrack", "Euro-Techno", "Ambient", "Trip-Hop", "Vocal", "Jazz+Funk", "Fusion",
    "Trance", "Classical", "Instrumental", "Acid", "House", "Game", "Sound Clip", "Gospel", "Noise", "AlternRock",
    "Bass", "Soul", "Punk", "Space", "Meditative", "Instrumental Pop", "Instrumental Rock", "Ethnic", "Gothic",
    "Darkwave", "Techno-Industrial", "Electronic", "Pop-Folk", "Eurodance", "Dream", "Southern Rock", "Comedy",
    "Cult", "Gangsta", "Top 40", "Christian Rap", "Pop/Funk", "Jungle", "Native American", "Cabaret", "New Wave",
    "Psychedelic", "Rave", "Showtunes", "Trailer", "Lo-Fi", "Tribal", "Acid Punk", "Acid Jazz", "Polka", "Retro",
    "Musical", "Rock & Roll", "Hard Rock", "Folk", "Folk-Rock", "National Folk", "Swing", "Fast Fusion", "Bebop",
    "Latin", "Revival", "Celtic", "Bluegrass", "Avantgarde", "Gothic Rock", "Progressive Rock", "Psychedelic Rock",
    "Symphonic Rock", "Slow Rock", "Big Band", "Chorus", "Easy Listening", "Acoustic", "Humour", "Speech", "Chanson",
    "Opera", "Chamber Music", "Sonata", "Symphony", "Booty Bass", "Primus", "Porn Groove", "Satire", "Slow Jam",
    "Club", "Tango", "Samba", "Folklore", "Ballad", "Power Ballad", "Rhythmic Soul", "Freestyle", "Duet",
    "Punk Rock", "Drum Solo", "A Cappella", "Euro-House", "Dance Hall", "Goa", "Drum & Bass", "Club-House",
    "Hardcore", "Terror", "Indie", "BritPop", "Negerpunk", "Polsk Punk", "Beat", "Christian Gangsta Rap",
    "Heavy Metal", "Black Metal", "Crossover", "Contemporary Christian", "Christian Rock", "Merengue", "Salsa",
    "Thrash Metal", "Anime", "JPop", "Synthpop",
];

/// `gnre`'s stored value indexes the table directly; 0 means "unset".
/// Returns `None` for 0 or an index past the end of the table.
pub fn name_for_id3_index(stored: u16) -> Option<&'static str> {
    if stored == 0 {
        return None;
    }
    ID3V1_GENRES.get(stored as usize).copied()
}

/// Inverse lookup, case-insensitive, used nowhere in the write path (the
/// writer always prefers the text `©gen` atom) but kept alongside the
/// forward table for completeness and tests.
pub fn id3_index_for_name(name: &str) -> Option<u16> {
    ID3V1_GENRES.iter().position(|g| g.eq_ignore_ascii_case(name)).map(|i| i as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_13_is_pop() {
        assert_eq!(name_for_id3_index(13), Some("Pop"));
    }

    #[test]
    fn zero_is_unset() {
        assert_eq!(name_for_id3_index(0), None);
    }

    #[test]
    fn round_trips_through_index_lookup() {
        let idx = id3_index_for_name("pop").unwrap();
        assert_eq!(name_for_id3_index(idx), Some("Pop"));
    }
}
