//! `ftyp` — file type / compatibility box. Every `.m4a`/`.mp4` file must
//! start with one; the parser refuses to construct over a file that
//! doesn't.
use std::io;

use crate::fromtobytes::{FromBytes, ReadBytes, ToBytes, WriteBytes};
use crate::types::FourCC;

#[derive(Clone, Debug)]
pub struct FileTypeBox {
    pub major_brand: FourCC,
    pub minor_version: u32,
    pub compatible_brands: Vec<FourCC>,
}

impl FromBytes for FileTypeBox {
    fn from_bytes<R: ReadBytes>(stream: &mut R) -> io::Result<FileTypeBox> {
        let major_brand = FourCC::from_bytes(stream)?;
        let minor_version = u32::from_bytes(stream)?;
        let mut compatible_brands = Vec::new();
        while stream.left() > 0 {
            compatible_brands.push(FourCC::from_bytes(stream)?);
        }
        Ok(FileTypeBox { major_brand, minor_version, compatible_brands })
    }
    fn min_size() -> usize {
        8
    }
}

impl ToBytes for FileTypeBox {
    fn to_bytes<W: WriteBytes>(&self, stream: &mut W) -> io::Result<()> {
        self.major_brand.to_bytes(stream)?;
        self.minor_version.to_bytes(stream)?;
        for b in &self.compatible_brands {
            b.to_bytes(stream)?;
        }
        Ok(())
    }
}
