//! The Apple `ilst` tag façade: typed getters/setters over
//! an `AppleItemListBox`'s children, implemented as an extension trait
//! rather than a wrapper type — the box itself already owns its child
//! list, so there is nothing for a façade struct to hold but a borrow of
//! it, and `TaggedFile::tag_mut()` already hands that borrow out directly.
use crate::boxes::ilst::{AppleAnnotationBox, AppleDataFlags, AppleItemListBox};
use crate::genres;
use crate::types::FourCC;

/// Vendor namespace iTunes uses for every dash (`----`) extension atom
/// this crate knows how to read/write.
pub const ITUNES_MEAN: &str = "com.apple.iTunes";

fn fourcc(s: &str) -> FourCC {
    FourCC::new(s)
}

/// Split a "; "-joined multi-valued field back into trimmed elements,
/// dropping empties (mirrors how the getters for performers/composers/
/// genres/album-artists read their stored text back out).
fn split_list(s: &str) -> Vec<String> {
    s.split(';').map(|p| p.trim().to_string()).filter(|p| !p.is_empty()).collect()
}

fn join_list(items: &[String]) -> String {
    items.join("; ")
}

impl AppleItemListBox {
    fn text_of(&self, tag: FourCC) -> Option<&str> {
        self.find(tag).and_then(|a| a.first_data()).and_then(|d| d.as_text())
    }

    fn set_text(&mut self, tag: FourCC, value: &str) {
        if value.is_empty() {
            self.remove(tag);
            return;
        }
        match self.find_mut(tag) {
            Some(item) => {
                item.children.retain(|c| !matches!(c, crate::boxes::ilst::AppleChild::Data(_)));
                item.children.push(crate::boxes::ilst::AppleChild::Data(crate::boxes::ilst::IDataBox::text(value)));
            }
            None => self.items.push(AppleAnnotationBox::new_text(tag, value)),
        }
    }

    fn list_of(&self, tag: FourCC) -> Vec<String> {
        self.text_of(tag).map(split_list).unwrap_or_default()
    }

    fn set_list(&mut self, tag: FourCC, values: &[String]) {
        self.set_text(tag, &join_list(values));
    }
}

/// Typed metadata access over an `ilst` box. All setters with an empty
/// value (empty string, empty list, or `0` for the numeric fields)
/// remove the underlying atom rather than writing a degenerate one.
pub trait AppleTagExt {
    fn title(&self) -> Option<&str>;
    fn set_title(&mut self, value: &str);

    fn album(&self) -> Option<&str>;
    fn set_album(&mut self, value: &str);

    fn comment(&self) -> Option<&str>;
    fn set_comment(&mut self, value: &str);

    fn grouping(&self) -> Option<&str>;
    fn set_grouping(&mut self, value: &str);

    fn lyrics(&self) -> Option<&str>;
    fn set_lyrics(&mut self, value: &str);

    fn copyright(&self) -> Option<&str>;
    fn set_copyright(&mut self, value: &str);

    fn sort_title(&self) -> Option<&str>;
    fn set_sort_title(&mut self, value: &str);
    fn sort_album(&self) -> Option<&str>;
    fn set_sort_album(&mut self, value: &str);
    fn sort_artist(&self) -> Option<&str>;
    fn set_sort_artist(&mut self, value: &str);
    fn sort_album_artist(&self) -> Option<&str>;
    fn set_sort_album_artist(&mut self, value: &str);
    fn sort_composer(&self) -> Option<&str>;
    fn set_sort_composer(&mut self, value: &str);

    fn artists(&self) -> Vec<String>;
    fn set_artists(&mut self, values: &[String]);

    fn album_artists(&self) -> Vec<String>;
    fn set_album_artists(&mut self, values: &[String]);

    fn composers(&self) -> Vec<String>;
    fn set_composers(&mut self, values: &[String]);

    /// Performer roles: like the other multi-valued fields, "; "-joined on
    /// the public API, but stored internally with `/` separating each
    /// role, matching the legacy storage convention other taggers expect.
    fn performer_roles(&self) -> Vec<String>;
    fn set_performer_roles(&mut self, values: &[String]);

    fn genres(&self) -> Vec<String>;
    fn set_genres(&mut self, values: &[String]);

    fn year(&self) -> u32;
    fn set_year(&mut self, value: u32);

    fn track_number(&self) -> u16;
    fn track_total(&self) -> u16;
    fn set_track_number(&mut self, value: u16);
    fn set_track_total(&mut self, value: u16);

    fn disk_number(&self) -> u16;
    fn disk_total(&self) -> u16;
    fn set_disk_number(&mut self, value: u16);
    fn set_disk_total(&mut self, value: u16);

    fn bpm(&self) -> u16;
    fn set_bpm(&mut self, value: u16);

    fn compilation(&self) -> bool;
    fn set_compilation(&mut self, value: bool);

    fn replaygain_track_gain(&self) -> Option<f64>;
    fn set_replaygain_track_gain(&mut self, value: Option<f64>);
    fn replaygain_track_peak(&self) -> Option<f64>;
    fn set_replaygain_track_peak(&mut self, value: Option<f64>);
    fn replaygain_album_gain(&self) -> Option<f64>;
    fn set_replaygain_album_gain(&mut self, value: Option<f64>);
    fn replaygain_album_peak(&self) -> Option<f64>;
    fn set_replaygain_album_peak(&mut self, value: Option<f64>);

    fn musicbrainz_track_id(&self) -> Option<&str>;
    fn set_musicbrainz_track_id(&mut self, value: &str);
    fn musicbrainz_release_id(&self) -> Option<&str>;
    fn set_musicbrainz_release_id(&mut self, value: &str);
    fn musicbrainz_artist_ids(&self) -> Vec<String>;
    fn set_musicbrainz_artist_ids(&mut self, values: &[String]);
    fn musicbrainz_release_artist_ids(&self) -> Vec<String>;
    fn set_musicbrainz_release_artist_ids(&mut self, values: &[String]);

    fn amazon_id(&self) -> Option<&str>;
    fn set_amazon_id(&mut self, value: &str);
    fn isrc(&self) -> Option<&str>;
    fn set_isrc(&mut self, value: &str);
    fn initial_key(&self) -> Option<&str>;
    fn set_initial_key(&mut self, value: &str);
    fn publisher(&self) -> Option<&str>;
    fn set_publisher(&mut self, value: &str);
    fn remixer(&self) -> Option<&str>;
    fn set_remixer(&mut self, value: &str);

    /// Arbitrary free-form `----` atom under the `com.apple.iTunes`
    /// namespace, keyed by `name` (case-insensitive).
    fn custom_field(&self, name: &str) -> Option<&str>;
    fn set_custom_field(&mut self, name: &str, value: &str);

    fn artwork(&self) -> Option<&[u8]>;
    fn set_artwork_jpeg(&mut self, bytes: Vec<u8>);
    fn set_artwork_png(&mut self, bytes: Vec<u8>);
    fn remove_artwork(&mut self);
}

impl AppleTagExt for AppleItemListBox {
    fn title(&self) -> Option<&str> {
        self.text_of(fourcc("©nam"))
    }
    fn set_title(&mut self, value: &str) {
        self.set_text(fourcc("©nam"), value)
    }

    fn album(&self) -> Option<&str> {
        self.text_of(fourcc("©alb"))
    }
    fn set_album(&mut self, value: &str) {
        self.set_text(fourcc("©alb"), value)
    }

    fn comment(&self) -> Option<&str> {
        self.text_of(fourcc("©cmt"))
    }
    fn set_comment(&mut self, value: &str) {
        self.set_text(fourcc("©cmt"), value)
    }

    fn grouping(&self) -> Option<&str> {
        self.text_of(fourcc("©grp"))
    }
    fn set_grouping(&mut self, value: &str) {
        self.set_text(fourcc("©grp"), value)
    }

    fn lyrics(&self) -> Option<&str> {
        self.text_of(fourcc("©lyr"))
    }
    fn set_lyrics(&mut self, value: &str) {
        self.set_text(fourcc("©lyr"), value)
    }

    fn copyright(&self) -> Option<&str> {
        self.text_of(fourcc("cprt"))
    }
    fn set_copyright(&mut self, value: &str) {
        self.set_text(fourcc("cprt"), value)
    }

    fn sort_title(&self) -> Option<&str> {
        self.text_of(fourcc("sonm"))
    }
    fn set_sort_title(&mut self, value: &str) {
        self.set_text(fourcc("sonm"), value)
    }
    fn sort_album(&self) -> Option<&str> {
        self.text_of(fourcc("soal"))
    }
    fn set_sort_album(&mut self, value: &str) {
        self.set_text(fourcc("soal"), value)
    }
    fn sort_artist(&self) -> Option<&str> {
        self.text_of(fourcc("soar"))
    }
    fn set_sort_artist(&mut self, value: &str) {
        self.set_text(fourcc("soar"), value)
    }
    fn sort_album_artist(&self) -> Option<&str> {
        self.text_of(fourcc("soaa"))
    }
    fn set_sort_album_artist(&mut self, value: &str) {
        self.set_text(fourcc("soaa"), value)
    }
    fn sort_composer(&self) -> Option<&str> {
        self.text_of(fourcc("soco"))
    }
    fn set_sort_composer(&mut self, value: &str) {
        self.set_text(fourcc("soco"), value)
    }

    fn artists(&self) -> Vec<String> {
        self.list_of(fourcc("©ART"))
    }
    fn set_artists(&mut self, values: &[String]) {
        self.set_list(fourcc("©ART"), values)
    }

    fn album_artists(&self) -> Vec<String> {
        self.list_of(fourcc("aART"))
    }
    fn set_album_artists(&mut self, values: &[String]) {
        self.set_list(fourcc("aART"), values)
    }

    fn composers(&self) -> Vec<String> {
        self.list_of(fourcc("©wrt"))
    }
    fn set_composers(&mut self, values: &[String]) {
        self.set_list(fourcc("©wrt"), values)
    }

    fn performer_roles(&self) -> Vec<String> {
        let raw = self.find_dash(ITUNES_MEAN, "PERFORMER").and_then(|a| a.first_data()).and_then(|d| d.as_text());
        match raw {
            Some(s) => split_list(&s.replace('/', ";")),
            None => Vec::new(),
        }
    }
    fn set_performer_roles(&mut self, values: &[String]) {
        let stored = join_list(values).replace(';', "/");
        self.set_dash(ITUNES_MEAN, "PERFORMER", &stored);
    }

    fn genres(&self) -> Vec<String> {
        if let Some(text) = self.text_of(fourcc("©gen")) {
            return split_list(text);
        }
        let stored = self.find(fourcc("gnre")).and_then(|a| a.first_data()).map(|d| d.as_bytes());
        match stored {
            Some(bytes) if bytes.len() >= 2 => {
                let idx = u16::from_be_bytes([bytes[0], bytes[1]]);
                genres::name_for_id3_index(idx).map(|s| vec![s.to_string()]).unwrap_or_default()
            }
            _ => Vec::new(),
        }
    }
    fn set_genres(&mut self, values: &[String]) {
        self.remove(fourcc("gnre"));
        self.set_list(fourcc("©gen"), values);
    }

    fn year(&self) -> u32 {
        self.text_of(fourcc("©day")).and_then(|s| s.get(0..4.min(s.len()))).and_then(|s| s.parse().ok()).unwrap_or(0)
    }
    fn set_year(&mut self, value: u32) {
        if value == 0 {
            self.remove(fourcc("©day"));
        } else {
            self.set_text(fourcc("©day"), &value.to_string());
        }
    }

    fn track_number(&self) -> u16 {
        int_pair(self, fourcc("trkn")).0
    }
    fn track_total(&self) -> u16 {
        int_pair(self, fourcc("trkn")).1
    }
    fn set_track_number(&mut self, value: u16) {
        set_int_pair(self, fourcc("trkn"), Some(value), None)
    }
    fn set_track_total(&mut self, value: u16) {
        set_int_pair(self, fourcc("trkn"), None, Some(value))
    }

    fn disk_number(&self) -> u16 {
        int_pair(self, fourcc("disk")).0
    }
    fn disk_total(&self) -> u16 {
        int_pair(self, fourcc("disk")).1
    }
    fn set_disk_number(&mut self, value: u16) {
        set_int_pair(self, fourcc("disk"), Some(value), None)
    }
    fn set_disk_total(&mut self, value: u16) {
        set_int_pair(self, fourcc("disk"), None, Some(value))
    }

    fn bpm(&self) -> u16 {
        self.find(fourcc("tmpo"))
            .and_then(|a| a.first_data())
            .map(|d| d.as_bytes())
            .filter(|b| b.len() >= 2)
            .map(|b| u16::from_be_bytes([b[0], b[1]]))
            .unwrap_or(0)
    }
    fn set_bpm(&mut self, value: u16) {
        let tag = fourcc("tmpo");
        if value == 0 {
            self.remove(tag);
            return;
        }
        let data = crate::boxes::ilst::IDataBox::binary(AppleDataFlags::ForTempo, value.to_be_bytes().to_vec());
        upsert_data(self, tag, data);
    }

    fn compilation(&self) -> bool {
        self.find(fourcc("cpil")).and_then(|a| a.first_data()).map(|d| d.as_bytes()).map(|b| b.first().copied().unwrap_or(0) != 0).unwrap_or(false)
    }
    fn set_compilation(&mut self, value: bool) {
        let tag = fourcc("cpil");
        if !value {
            self.remove(tag);
            return;
        }
        let data = crate::boxes::ilst::IDataBox::binary(AppleDataFlags::ForTempo, vec![1]);
        upsert_data(self, tag, data);
    }

    fn replaygain_track_gain(&self) -> Option<f64> {
        read_gain(self, "replaygain_track_gain")
    }
    fn set_replaygain_track_gain(&mut self, value: Option<f64>) {
        write_gain(self, "replaygain_track_gain", value)
    }
    fn replaygain_track_peak(&self) -> Option<f64> {
        read_peak(self, "replaygain_track_peak")
    }
    fn set_replaygain_track_peak(&mut self, value: Option<f64>) {
        write_peak(self, "replaygain_track_peak", value)
    }
    fn replaygain_album_gain(&self) -> Option<f64> {
        read_gain(self, "replaygain_album_gain")
    }
    fn set_replaygain_album_gain(&mut self, value: Option<f64>) {
        write_gain(self, "replaygain_album_gain", value)
    }
    fn replaygain_album_peak(&self) -> Option<f64> {
        read_peak(self, "replaygain_album_peak")
    }
    fn set_replaygain_album_peak(&mut self, value: Option<f64>) {
        write_peak(self, "replaygain_album_peak", value)
    }

    fn musicbrainz_track_id(&self) -> Option<&str> {
        dash_text(self, "MusicBrainz Track Id")
    }
    fn set_musicbrainz_track_id(&mut self, value: &str) {
        self.set_dash(ITUNES_MEAN, "MusicBrainz Track Id", value)
    }
    fn musicbrainz_release_id(&self) -> Option<&str> {
        dash_text(self, "MusicBrainz Album Id")
    }
    fn set_musicbrainz_release_id(&mut self, value: &str) {
        self.set_dash(ITUNES_MEAN, "MusicBrainz Album Id", value)
    }
    fn musicbrainz_artist_ids(&self) -> Vec<String> {
        dash_text(self, "MusicBrainz Artist Id").map(|s| s.split('/').map(|p| p.trim().to_string()).filter(|p| !p.is_empty()).collect()).unwrap_or_default()
    }
    fn set_musicbrainz_artist_ids(&mut self, values: &[String]) {
        self.set_dash(ITUNES_MEAN, "MusicBrainz Artist Id", &values.join("/"))
    }
    fn musicbrainz_release_artist_ids(&self) -> Vec<String> {
        dash_text(self, "MusicBrainz Album Artist Id").map(|s| s.split('/').map(|p| p.trim().to_string()).filter(|p| !p.is_empty()).collect()).unwrap_or_default()
    }
    fn set_musicbrainz_release_artist_ids(&mut self, values: &[String]) {
        self.set_dash(ITUNES_MEAN, "MusicBrainz Album Artist Id", &values.join("/"))
    }

    fn amazon_id(&self) -> Option<&str> {
        dash_text(self, "ASIN")
    }
    fn set_amazon_id(&mut self, value: &str) {
        self.set_dash(ITUNES_MEAN, "ASIN", value)
    }
    fn isrc(&self) -> Option<&str> {
        dash_text(self, "ISRC")
    }
    fn set_isrc(&mut self, value: &str) {
        self.set_dash(ITUNES_MEAN, "ISRC", value)
    }
    fn initial_key(&self) -> Option<&str> {
        dash_text(self, "initialkey")
    }
    fn set_initial_key(&mut self, value: &str) {
        self.set_dash(ITUNES_MEAN, "initialkey", value)
    }
    fn publisher(&self) -> Option<&str> {
        dash_text(self, "publisher")
    }
    fn set_publisher(&mut self, value: &str) {
        self.set_dash(ITUNES_MEAN, "publisher", value)
    }
    fn remixer(&self) -> Option<&str> {
        dash_text(self, "REMIXER")
    }
    fn set_remixer(&mut self, value: &str) {
        self.set_dash(ITUNES_MEAN, "REMIXER", value)
    }

    fn custom_field(&self, name: &str) -> Option<&str> {
        dash_text(self, name)
    }
    fn set_custom_field(&mut self, name: &str, value: &str) {
        self.set_dash(ITUNES_MEAN, name, value)
    }

    fn artwork(&self) -> Option<&[u8]> {
        self.find(fourcc("covr")).and_then(|a| a.first_data()).map(|d| d.as_bytes())
    }
    fn set_artwork_jpeg(&mut self, bytes: Vec<u8>) {
        set_artwork(self, AppleDataFlags::ContainsJpegData, bytes)
    }
    fn set_artwork_png(&mut self, bytes: Vec<u8>) {
        set_artwork(self, AppleDataFlags::ContainsPngData, bytes)
    }
    fn remove_artwork(&mut self) {
        self.remove(fourcc("covr"))
    }
}

fn set_artwork(ilst: &mut AppleItemListBox, flags: AppleDataFlags, bytes: Vec<u8>) {
    let tag = fourcc("covr");
    if bytes.is_empty() {
        ilst.remove(tag);
        return;
    }
    upsert_data(ilst, tag, crate::boxes::ilst::IDataBox::binary(flags, bytes));
}

fn upsert_data(ilst: &mut AppleItemListBox, tag: FourCC, data: crate::boxes::ilst::IDataBox) {
    match ilst.find_mut(tag) {
        Some(item) => {
            item.children.retain(|c| !matches!(c, crate::boxes::ilst::AppleChild::Data(_)));
            item.children.push(crate::boxes::ilst::AppleChild::Data(data));
        }
        None => ilst.items.push(AppleAnnotationBox { fourcc: tag, children: vec![crate::boxes::ilst::AppleChild::Data(data)] }),
    }
}

/// `trkn`/`disk` payload: `reserved(16) | index(16) | total(16) | reserved(16)`.
fn int_pair(ilst: &AppleItemListBox, tag: FourCC) -> (u16, u16) {
    match ilst.find(tag).and_then(|a| a.first_data()).map(|d| d.as_bytes()) {
        Some(b) if b.len() >= 6 => (u16::from_be_bytes([b[2], b[3]]), u16::from_be_bytes([b[4], b[5]])),
        _ => (0, 0),
    }
}

fn set_int_pair(ilst: &mut AppleItemListBox, tag: FourCC, index: Option<u16>, total: Option<u16>) {
    let (mut idx, mut tot) = int_pair(ilst, tag);
    if let Some(i) = index {
        idx = i;
    }
    if let Some(t) = total {
        tot = t;
    }
    if idx == 0 && tot == 0 {
        ilst.remove(tag);
        return;
    }
    let mut bytes = vec![0u8, 0];
    bytes.extend_from_slice(&idx.to_be_bytes());
    bytes.extend_from_slice(&tot.to_be_bytes());
    bytes.extend_from_slice(&[0u8, 0]);
    upsert_data(ilst, tag, crate::boxes::ilst::IDataBox::binary(AppleDataFlags::ContainsData, bytes));
}

fn dash_text<'a>(ilst: &'a AppleItemListBox, name: &str) -> Option<&'a str> {
    ilst.find_dash(ITUNES_MEAN, name).and_then(|a| a.first_data()).and_then(|d| d.as_text())
}

impl AppleItemListBox {
    fn set_dash(&mut self, mean: &str, name: &str, value: &str) {
        if value.is_empty() {
            self.remove_dash(mean, name);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.fourcc == fourcc("----") && i.mean() == Some(mean) && i.name().map(|n| n.eq_ignore_ascii_case(name)).unwrap_or(false)) {
            item.children.retain(|c| !matches!(c, crate::boxes::ilst::AppleChild::Data(_)));
            item.children.push(crate::boxes::ilst::AppleChild::Data(crate::boxes::ilst::IDataBox::text(value)));
        } else {
            self.items.push(AppleAnnotationBox::new_dash(mean, name, value));
        }
    }
}

fn read_gain(ilst: &AppleItemListBox, name: &str) -> Option<f64> {
    let raw = dash_text(ilst, name)?;
    raw.trim().trim_end_matches("dB").trim_end_matches("db").trim().parse().ok()
}

fn write_gain(ilst: &mut AppleItemListBox, name: &str, value: Option<f64>) {
    match value {
        Some(v) => ilst.set_dash(ITUNES_MEAN, name, &format!("{:.2} dB", v)),
        None => ilst.set_dash(ITUNES_MEAN, name, ""),
    }
}

fn read_peak(ilst: &AppleItemListBox, name: &str) -> Option<f64> {
    dash_text(ilst, name)?.trim().parse().ok()
}

fn write_peak(ilst: &mut AppleItemListBox, name: &str, value: Option<f64>) {
    match value {
        Some(v) => ilst.set_dash(ITUNES_MEAN, name, &format!("{:.6}", v)),
        None => ilst.set_dash(ITUNES_MEAN, name, ""),
    }
}

/// A flattened, serializable snapshot of the common fields, for `mp4cli
/// dump --json` and anything else that wants the tag without linking
/// against the box tree.
#[derive(Debug, Default, serde::Serialize)]
pub struct TagSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub artists: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub album_artists: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_number: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_total: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_number: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_total: Option<u16>,
    pub compilation: bool,
}

impl From<&AppleItemListBox> for TagSummary {
    fn from(tag: &AppleItemListBox) -> TagSummary {
        let zero_to_none = |v: u16| if v == 0 { None } else { Some(v) };
        TagSummary {
            title: tag.title().map(str::to_string),
            album: tag.album().map(str::to_string),
            artists: tag.artists(),
            album_artists: tag.album_artists(),
            genres: tag.genres(),
            year: if tag.year() == 0 { None } else { Some(tag.year()) },
            track_number: zero_to_none(tag.track_number()),
            track_total: zero_to_none(tag.track_total()),
            disk_number: zero_to_none(tag.disk_number()),
            disk_total: zero_to_none(tag.disk_total()),
            compilation: tag.compilation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> AppleItemListBox {
        AppleItemListBox::default()
    }

    #[test]
    fn summary_omits_absent_fields_and_keeps_present_ones() {
        let mut t = empty();
        t.set_title("Hello");
        t.set_artists(&["A".to_string(), "B".to_string()]);
        t.set_year(2001);
        let summary = TagSummary::from(&t);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["title"], "Hello");
        assert_eq!(json["year"], 2001);
        assert!(json.get("album").is_none());
        assert_eq!(json["artists"], serde_json::json!(["A", "B"]));
    }

    #[test]
    fn title_round_trips() {
        let mut t = empty();
        t.set_title("Main Title");
        assert_eq!(t.title(), Some("Main Title"));
    }

    #[test]
    fn empty_string_removes_atom() {
        let mut t = empty();
        t.set_title("Main Title");
        t.set_title("");
        assert_eq!(t.title(), None);
        assert!(t.is_empty());
    }

    #[test]
    fn multi_valued_field_joins_and_splits() {
        let mut t = empty();
        t.set_artists(&["Artist One".to_string(), "Artist Two".to_string()]);
        assert_eq!(t.text_of(fourcc("©ART")), Some("Artist One; Artist Two"));
        assert_eq!(t.artists(), vec!["Artist One".to_string(), "Artist Two".to_string()]);
    }

    #[test]
    fn track_pair_packs_reserved_fields() {
        let mut t = empty();
        t.set_track_number(3);
        t.set_track_total(12);
        let bytes = t.find(fourcc("trkn")).unwrap().first_data().unwrap().as_bytes().to_vec();
        assert_eq!(bytes, vec![0x00, 0x00, 0x00, 0x03, 0x00, 0x0c, 0x00, 0x00]);
        assert_eq!(t.track_number(), 3);
        assert_eq!(t.track_total(), 12);
    }

    #[test]
    fn track_pair_removed_when_both_sides_zero() {
        let mut t = empty();
        t.set_track_number(3);
        t.set_track_number(0);
        assert_eq!(t.track_number(), 0);
        assert!(t.find(fourcc("trkn")).is_none());
    }

    #[test]
    fn legacy_gnre_translates_through_id3_table() {
        let mut t = empty();
        let data = crate::boxes::ilst::IDataBox::binary(AppleDataFlags::ContainsData, 13u16.to_be_bytes().to_vec());
        t.items.push(AppleAnnotationBox { fourcc: fourcc("gnre"), children: vec![crate::boxes::ilst::AppleChild::Data(data)] });
        assert_eq!(t.genres(), vec!["Pop".to_string()]);

        t.set_genres(&["Rock".to_string()]);
        assert!(t.find(fourcc("gnre")).is_none());
        assert_eq!(t.text_of(fourcc("©gen")), Some("Rock"));
    }

    #[test]
    fn dash_atom_round_trips_and_clears() {
        let mut t = empty();
        t.set_musicbrainz_track_id("abc");
        let item = t.find_dash(ITUNES_MEAN, "MusicBrainz Track Id").unwrap();
        assert_eq!(item.mean(), Some(ITUNES_MEAN));
        assert_eq!(item.name(), Some("MusicBrainz Track Id"));
        assert_eq!(t.musicbrainz_track_id(), Some("abc"));

        t.set_musicbrainz_track_id("");
        assert_eq!(t.musicbrainz_track_id(), None);
        assert!(t.find_dash(ITUNES_MEAN, "MusicBrainz Track Id").is_none());
    }

    #[test]
    fn replaygain_gain_strips_db_suffix() {
        let mut t = empty();
        t.set_replaygain_track_gain(Some(-6.5));
        assert_eq!(t.text_of(fourcc("----")), None); // sanity: not stored under the literal tag
        assert_eq!(t.replaygain_track_gain(), Some(-6.5));
    }

    #[test]
    fn replaygain_peak_formats_six_decimals() {
        let mut t = empty();
        t.set_replaygain_track_peak(Some(0.5));
        let raw = dash_text(&t, "replaygain_track_peak").unwrap();
        assert_eq!(raw, "0.500000");
    }

    #[test]
    fn year_reads_first_four_digits() {
        let mut t = empty();
        t.set_text(fourcc("©day"), "2005-06-01");
        assert_eq!(t.year(), 2005);
    }

    #[test]
    fn year_zero_clears() {
        let mut t = empty();
        t.set_year(2005);
        t.set_year(0);
        assert_eq!(t.year(), 0);
        assert!(t.find(fourcc("©day")).is_none());
    }

    #[test]
    fn compilation_flag_is_bit_exact_single_byte() {
        let mut t = empty();
        t.set_compilation(true);
        let bytes = t.find(fourcc("cpil")).unwrap().first_data().unwrap().as_bytes().to_vec();
        assert_eq!(bytes, vec![1]);
        assert!(t.compilation());
        t.set_compilation(false);
        assert!(!t.compilation());
    }
}
