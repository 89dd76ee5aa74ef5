//! The Apple `ilst` item-list box and its children: annotation boxes keyed
//! by a 4-byte tag (`©nam`, `aART`, `trkn`, `----`, ...), each wrapping one
//! or more `data` atoms and, for the `----` free-form namespace, a
//! `mean`/`name` pair identifying the vendor and key.
use std::fmt::Debug;
use std::io;

use crate::fromtobytes::{FromBytes, ReadBytes, ToBytes, WriteBytes};
use crate::mp4box::{read_full_box_header, write_full_box_header, BoxReader, BoxWriter};
use crate::types::FourCC;

/// The semantic interpretation of an Apple `data` atom's 24-bit flags
/// field (ISO/IEC 14496-12 FullBox `flags`, Apple's private reuse of it).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppleDataFlags {
    ContainsData,
    ContainsText,
    ContainsJpegData,
    ContainsPngData,
    ContainsBmpData,
    ForTempo,
    ContainsExplicitData,
    Other(u32),
}

impl From<u32> for AppleDataFlags {
    fn from(v: u32) -> AppleDataFlags {
        match v {
            0x00 => AppleDataFlags::ContainsData,
            0x01 => AppleDataFlags::ContainsText,
            0x0d => AppleDataFlags::ContainsJpegData,
            0x0e => AppleDataFlags::ContainsPngData,
            0x1b => AppleDataFlags::ContainsBmpData,
            0x15 => AppleDataFlags::ForTempo,
            0x17 => AppleDataFlags::ContainsExplicitData,
            other => AppleDataFlags::Other(other),
        }
    }
}

impl From<AppleDataFlags> for u32 {
    fn from(f: AppleDataFlags) -> u32 {
        match f {
            AppleDataFlags::ContainsData => 0x00,
            AppleDataFlags::ContainsText => 0x01,
            AppleDataFlags::ContainsJpegData => 0x0d,
            AppleDataFlags::ContainsPngData => 0x0e,
            AppleDataFlags::ContainsBmpData => 0x1b,
            AppleDataFlags::ForTempo => 0x15,
            AppleDataFlags::ContainsExplicitData => 0x17,
            AppleDataFlags::Other(v) => v,
        }
    }
}

#[derive(Clone, Debug)]
pub enum AppleData {
    Text(String),
    Binary(Vec<u8>),
}

/// `data` — the payload atom. `flags` is the raw 24-bit value; use
/// `AppleDataFlags::from(flags)` to interpret it.
#[derive(Clone, Debug)]
pub struct IDataBox {
    pub flags: u32,
    pub data: AppleData,
}

impl IDataBox {
    fn read_data(reader: &mut BoxReader) -> io::Result<IDataBox> {
        let (_version, flags) = read_full_box_header(reader)?;
        let _locale = u32::from_bytes(reader)?;
        let left = reader.left();
        let raw = reader.read(left)?.to_vec();
        let data = match AppleDataFlags::from(flags) {
            AppleDataFlags::ContainsText => {
                AppleData::Text(String::from_utf8(raw).map_err(|_| crate::ioerr!(io::ErrorKind::InvalidData, "data atom flagged ContainsText is not valid UTF-8"))?)
            }
            _ => AppleData::Binary(raw),
        };
        Ok(IDataBox { flags, data })
    }

    fn write_data(&self, writer: &mut BoxWriter) -> io::Result<()> {
        write_full_box_header(writer, 0, self.flags)?;
        0u32.to_bytes(writer)?;
        match &self.data {
            AppleData::Text(s) => writer.write(s.as_bytes()),
            AppleData::Binary(b) => writer.write(b),
        }
    }

    pub fn text(value: impl Into<String>) -> IDataBox {
        IDataBox { flags: AppleDataFlags::ContainsText.into(), data: AppleData::Text(value.into()) }
    }

    pub fn binary(flags: AppleDataFlags, bytes: Vec<u8>) -> IDataBox {
        IDataBox { flags: flags.into(), data: AppleData::Binary(bytes) }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            AppleData::Text(s) => Some(s),
            AppleData::Binary(_) => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.data {
            AppleData::Text(s) => s.as_bytes(),
            AppleData::Binary(b) => b,
        }
    }
}

/// `mean` — the vendor namespace of a `----` dash atom (e.g.
/// `com.apple.iTunes`).
#[derive(Clone, Debug)]
pub struct IMeanBox {
    pub text: String,
}

impl IMeanBox {
    fn read_data(reader: &mut BoxReader) -> io::Result<IMeanBox> {
        let (_version, _flags) = read_full_box_header(reader)?;
        let left = reader.left();
        let raw = reader.read(left)?;
        Ok(IMeanBox { text: raw.iter().map(|&b| b as char).collect() })
    }
    fn write_data(&self, writer: &mut BoxWriter) -> io::Result<()> {
        write_full_box_header(writer, 0, 0)?;
        let raw: Vec<u8> = self.text.chars().map(|c| c as u8).collect();
        writer.write(&raw)
    }
}

/// `name` — the key within a `----` dash atom's vendor namespace.
#[derive(Clone, Debug)]
pub struct INameBox {
    pub text: String,
}

impl INameBox {
    fn read_data(reader: &mut BoxReader) -> io::Result<INameBox> {
        let (_version, _flags) = read_full_box_header(reader)?;
        let left = reader.left();
        let raw = reader.read(left)?;
        Ok(INameBox { text: raw.iter().map(|&b| b as char).collect() })
    }
    fn write_data(&self, writer: &mut BoxWriter) -> io::Result<()> {
        write_full_box_header(writer, 0, 0)?;
        let raw: Vec<u8> = self.text.chars().map(|c| c as u8).collect();
        writer.write(&raw)
    }
}

#[derive(Clone, Debug)]
pub enum AppleChild {
    Mean(IMeanBox),
    Name(INameBox),
    Data(IDataBox),
}

/// One `ilst` child: a tag key (e.g. `©nam`, `trkn`, `----`) wrapping its
/// `mean`/`name`/`data` children in parse order.
#[derive(Clone, Debug)]
pub struct AppleAnnotationBox {
    pub fourcc: FourCC,
    pub children: Vec<AppleChild>,
}

impl AppleAnnotationBox {
    fn read_data(reader: &mut BoxReader, fourcc: FourCC) -> io::Result<AppleAnnotationBox> {
        let mut children = Vec::new();
        while reader.left() > 0 {
            let mut child = BoxReader::new(reader)?;
            let child_fourcc = child.header.fourcc;
            let parsed = if child_fourcc == b"data" {
                Some(AppleChild::Data(IDataBox::read_data(&mut child)?))
            } else if child_fourcc == b"mean" {
                Some(AppleChild::Mean(IMeanBox::read_data(&mut child)?))
            } else if child_fourcc == b"name" {
                Some(AppleChild::Name(INameBox::read_data(&mut child)?))
            } else {
                None
            };
            if let Some(c) = parsed {
                children.push(c);
            }
        }
        Ok(AppleAnnotationBox { fourcc, children })
    }

    fn write_data(&self, writer: &mut BoxWriter) -> io::Result<()> {
        for child in &self.children {
            match child {
                AppleChild::Mean(b) => {
                    let mut w = BoxWriter::new(writer, FourCC::from(&b"mean"[..]))?;
                    b.write_data(&mut w)?;
                    w.finalize()?;
                }
                AppleChild::Name(b) => {
                    let mut w = BoxWriter::new(writer, FourCC::from(&b"name"[..]))?;
                    b.write_data(&mut w)?;
                    w.finalize()?;
                }
                AppleChild::Data(b) => {
                    let mut w = BoxWriter::new(writer, FourCC::from(&b"data"[..]))?;
                    b.write_data(&mut w)?;
                    w.finalize()?;
                }
            }
        }
        Ok(())
    }

    pub fn data_atoms(&self) -> impl Iterator<Item = &IDataBox> {
        self.children.iter().filter_map(|c| match c {
            AppleChild::Data(d) => Some(d),
            _ => None,
        })
    }

    pub fn first_data(&self) -> Option<&IDataBox> {
        self.data_atoms().next()
    }

    pub fn mean(&self) -> Option<&str> {
        self.children.iter().find_map(|c| match c {
            AppleChild::Mean(m) => Some(m.text.as_str()),
            _ => None,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.children.iter().find_map(|c| match c {
            AppleChild::Name(n) => Some(n.text.as_str()),
            _ => None,
        })
    }

    pub fn new_text(fourcc: FourCC, value: impl Into<String>) -> AppleAnnotationBox {
        AppleAnnotationBox { fourcc, children: vec![AppleChild::Data(IDataBox::text(value))] }
    }

    pub fn new_dash(mean: &str, name: &str, value: &str) -> AppleAnnotationBox {
        AppleAnnotationBox {
            fourcc: FourCC::from(&b"----"[..]),
            children: vec![
                AppleChild::Mean(IMeanBox { text: mean.to_string() }),
                AppleChild::Name(INameBox { text: name.to_string() }),
                AppleChild::Data(IDataBox::text(value)),
            ],
        }
    }
}

/// `ilst` — the Apple item-list box itself. A plain container whose
/// direct children are annotation boxes keyed by tag type.
#[derive(Clone, Debug, Default)]
pub struct AppleItemListBox {
    pub items: Vec<AppleAnnotationBox>,
}

impl AppleItemListBox {
    pub fn read_data(reader: &mut BoxReader) -> io::Result<AppleItemListBox> {
        let mut items = Vec::new();
        while reader.left() > 0 {
            let mut child = BoxReader::new(reader)?;
            let fourcc = child.header.fourcc;
            items.push(AppleAnnotationBox::read_data(&mut child, fourcc)?);
        }
        Ok(AppleItemListBox { items })
    }

    pub fn write_data(&self, writer: &mut BoxWriter) -> io::Result<()> {
        for item in &self.items {
            let mut w = BoxWriter::new(writer, item.fourcc)?;
            item.write_data(&mut w)?;
            w.finalize()?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn find(&self, fourcc: FourCC) -> Option<&AppleAnnotationBox> {
        self.items.iter().find(|i| i.fourcc == fourcc)
    }

    pub fn find_mut(&mut self, fourcc: FourCC) -> Option<&mut AppleAnnotationBox> {
        self.items.iter_mut().find(|i| i.fourcc == fourcc)
    }

    pub fn remove(&mut self, fourcc: FourCC) {
        self.items.retain(|i| i.fourcc != fourcc);
    }

    /// Find a `----` dash atom by exact `mean` and case-insensitive `name`.
    pub fn find_dash(&self, mean: &str, name: &str) -> Option<&AppleAnnotationBox> {
        self.items.iter().find(|i| {
            i.fourcc == &b"----"[..] && i.mean() == Some(mean) && i.name().map(|n| n.eq_ignore_ascii_case(name)).unwrap_or(false)
        })
    }

    pub fn remove_dash(&mut self, mean: &str, name: &str) {
        self.items.retain(|i| !(i.fourcc == &b"----"[..] && i.mean() == Some(mean) && i.name().map(|n| n.eq_ignore_ascii_case(name)).unwrap_or(false)));
    }
}
