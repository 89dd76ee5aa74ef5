//! Fundamental value types shared by box implementations.
//!
//! `Time`/`Duration_` read their width (32 vs. 64 bit) from an explicit
//! `version` argument rather than through implicit stream state — callers
//! are the `FullBox`-bearing boxes (`mvhd`, `mdhd`) that already know their
//! own version after reading the version/flags preamble.
use std::convert::TryInto;
use std::fmt::{Debug, Display, Write};
use std::io;
use std::time::{Duration, SystemTime};

use chrono::offset::{Local, TimeZone};

use crate::fromtobytes::{FromBytes, ReadBytes, ToBytes, WriteBytes};

/// The optional "usertype" of a box with an extended (`uuid`) header.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Uuid(pub [u8; 16]);

impl FromBytes for Uuid {
    fn from_bytes<R: ReadBytes>(bytes: &mut R) -> io::Result<Self> {
        let data = bytes.read(16)?;
        let mut u = [0u8; 16];
        u.copy_from_slice(data);
        Ok(Uuid(u))
    }
    fn min_size() -> usize {
        16
    }
}

impl ToBytes for Uuid {
    fn to_bytes<W: WriteBytes>(&self, bytes: &mut W) -> io::Result<()> {
        bytes.write(&self.0[..])
    }
}

impl Display for Uuid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let p1 = u32::from_be_bytes((self.0)[0..4].try_into().unwrap());
        let p2 = u16::from_be_bytes((self.0)[4..6].try_into().unwrap());
        let p3 = u16::from_be_bytes((self.0)[6..8].try_into().unwrap());
        let p4 = u16::from_be_bytes((self.0)[8..10].try_into().unwrap());
        let p5 = u16::from_be_bytes((self.0)[10..12].try_into().unwrap());
        let p6 = u32::from_be_bytes((self.0)[12..16].try_into().unwrap());
        write!(f, "{:08x}-{:04x}-{:04x}-{:04x}-{:04x}{:08x}", p1, p2, p3, p4, p5, p6)
    }
}

impl Debug for Uuid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "\"{}\"", self)
    }
}

/// A blob of opaque bytes, owned in memory.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Data(pub Vec<u8>);

impl Data {
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromBytes for Data {
    fn from_bytes<R: ReadBytes>(bytes: &mut R) -> io::Result<Self> {
        let left = bytes.left();
        let data = bytes.read(left)?;
        Ok(Data(data.to_vec()))
    }
    fn min_size() -> usize {
        0
    }
}

impl ToBytes for Data {
    fn to_bytes<W: WriteBytes>(&self, bytes: &mut W) -> io::Result<()> {
        bytes.write(&self.0[..])
    }
}

impl Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.0.len() <= 16 {
            let mut s = String::from("[");
            for (i, d) in self.0.iter().enumerate() {
                if i != 0 {
                    s.push(' ');
                }
                let _ = write!(s, "{:02x}", d);
            }
            s.push(']');
            write!(f, "{}", s)
        } else {
            write!(f, "[u8; {}]", self.0.len())
        }
    }
}

/// Time measured in seconds since 1904-01-01 00:00:00 UTC, 32 or 64 bits
/// wide depending on the enclosing `FullBox`'s version.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Time(pub u64);

// `date +%s -d "1904-01-01 00:00:00"`, i.e. the ISO-BMFF epoch expressed as
// a Unix timestamp.
const OFFSET_TO_UNIX: i64 = 2082844800;

impl Time {
    pub fn read<R: ReadBytes>(stream: &mut R, version: u8) -> io::Result<Time> {
        Ok(Time(if version == 1 {
            u64::from_bytes(stream)?
        } else {
            u32::from_bytes(stream)? as u64
        }))
    }
    pub fn write<W: WriteBytes>(&self, stream: &mut W, version: u8) -> io::Result<()> {
        if version == 1 {
            self.0.to_bytes(stream)
        } else {
            (self.0 as u32).to_bytes(stream)
        }
    }
    #[allow(dead_code)]
    pub fn to_system_time(&self) -> SystemTime {
        let unix = self.to_unixtime();
        if unix >= 0 {
            SystemTime::UNIX_EPOCH + Duration::new(unix as u64, 0)
        } else {
            SystemTime::UNIX_EPOCH - Duration::new((-unix) as u64, 0)
        }
    }
    pub fn to_unixtime(&self) -> i64 {
        self.0 as i64 - OFFSET_TO_UNIX
    }
    pub fn to_rfc3339(&self) -> String {
        Local.timestamp(self.to_unixtime(), 0).to_rfc3339()
    }
}

impl Debug for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self.to_rfc3339())
    }
}

/// Duration in `timescale` ticks, 32 or 64 bits wide depending on version.
/// "All ones" in the 32-bit encoding means "unknown".
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Duration_(pub u64);

impl Duration_ {
    pub fn read<R: ReadBytes>(stream: &mut R, version: u8) -> io::Result<Duration_> {
        Ok(Duration_(if version == 1 {
            u64::from_bytes(stream)?
        } else {
            u32::from_bytes(stream)? as u64
        }))
    }
    pub fn write<W: WriteBytes>(&self, stream: &mut W, version: u8) -> io::Result<()> {
        if version == 1 {
            self.0.to_bytes(stream)
        } else {
            (std::cmp::min(self.0, 0x7fffffff) as u32).to_bytes(stream)
        }
    }
}

impl Debug for Duration_ {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

/// FourCC is the 4-byte type tag of every box.
///
/// Legacy 3-byte iTunes atom names (`alb`, `ART`, ...) are canonicalised by
/// prefixing `0xA9` (the iTunes "©" sigil), matching how the real files on
/// disk spell them (`©alb`, `©ART`, ...); comparisons are always against
/// this 4-byte canonical form.
#[derive(Clone, Copy, Default)]
pub struct FourCC(pub u32);

impl FromBytes for FourCC {
    fn from_bytes<R: ReadBytes>(bytes: &mut R) -> io::Result<Self> {
        Ok(FourCC(u32::from_bytes(bytes)?))
    }
    fn min_size() -> usize {
        4
    }
}

impl ToBytes for FourCC {
    fn to_bytes<W: WriteBytes>(&self, bytes: &mut W) -> io::Result<()> {
        self.0.to_bytes(bytes)
    }
}

impl FourCC {
    pub fn new(s: &str) -> FourCC {
        let b = s.as_bytes();
        if b.len() == 3 {
            FourCC(u32::from_be_bytes([0xa9, b[0], b[1], b[2]]))
        } else {
            FourCC::from(b)
        }
    }

    #[inline]
    pub fn to_be_bytes(&self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    fn fmt_fourcc(&self, dbg: bool) -> String {
        let c = self.to_be_bytes();
        for (i, &byte) in c.iter().enumerate() {
            if (byte < 32 || byte > 126) && !(i == 0 && byte == 0xa9) {
                return format!("0x{:08x}", self.0);
            }
        }
        let mut s = String::new();
        if dbg {
            s.push('"');
        }
        for &byte in &c {
            s.push(byte as char);
        }
        if dbg {
            s.push('"');
        }
        s
    }
}

impl std::cmp::PartialEq<&[u8]> for FourCC {
    fn eq(&self, other: &&[u8]) -> bool {
        &(self.to_be_bytes())[..] == *other
    }
}

impl std::cmp::PartialEq<&[u8; 4]> for FourCC {
    fn eq(&self, other: &&[u8; 4]) -> bool {
        &self.to_be_bytes() == *other
    }
}

impl std::cmp::PartialEq<FourCC> for FourCC {
    fn eq(&self, other: &FourCC) -> bool {
        self.0 == other.0
    }
}
impl std::cmp::Eq for FourCC {}

impl std::hash::Hash for FourCC {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl Debug for FourCC {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.fmt_fourcc(true))
    }
}

impl Display for FourCC {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.fmt_fourcc(false))
    }
}

impl From<&[u8]> for FourCC {
    fn from(b: &[u8]) -> FourCC {
        let mut a = [0u8; 4];
        a.copy_from_slice(&b[..4]);
        FourCC(u32::from_be_bytes(a))
    }
}

/// Language code ('eng', 'dut', ...): 3 packed 5-bit values, each letter
/// offset from 0x60.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct IsoLanguageCode(pub u16);

impl FromBytes for IsoLanguageCode {
    fn from_bytes<R: ReadBytes>(bytes: &mut R) -> io::Result<Self> {
        Ok(IsoLanguageCode(u16::from_bytes(bytes)?))
    }
    fn min_size() -> usize {
        2
    }
}

impl ToBytes for IsoLanguageCode {
    fn to_bytes<W: WriteBytes>(&self, bytes: &mut W) -> io::Result<()> {
        self.0.to_bytes(bytes)
    }
}

impl Display for IsoLanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = String::new();
        s.push((((self.0 >> 10) & 0x1f) + 0x60) as u8 as char);
        s.push((((self.0 >> 5) & 0x1f) + 0x60) as u8 as char);
        s.push((((self.0 >> 0) & 0x1f) + 0x60) as u8 as char);
        write!(f, "{}", s)
    }
}

impl Debug for IsoLanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl Default for IsoLanguageCode {
    fn default() -> IsoLanguageCode {
        IsoLanguageCode(0x55c4) // "und"
    }
}

/// Zero-terminated (Latin-1-ish) string, as used by `hdlr`'s component name
/// and the DataReferenceBox entries.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ZString(pub String);

impl ZString {
    fn as_str(&self) -> &str {
        self.0.strip_suffix('\0').unwrap_or(&self.0)
    }
}

impl std::ops::Deref for ZString {
    type Target = str;
    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl FromBytes for ZString {
    fn from_bytes<R: ReadBytes>(bytes: &mut R) -> io::Result<Self> {
        let left = bytes.left();
        let data = bytes.read(left)?;
        let mut s = String::new();
        for &b in data {
            if b == 0 {
                break;
            }
            s.push(b as char);
        }
        Ok(ZString(s))
    }
    fn min_size() -> usize {
        0
    }
}

impl ToBytes for ZString {
    fn to_bytes<W: WriteBytes>(&self, bytes: &mut W) -> io::Result<()> {
        let mut v: Vec<u8> = self.0.chars().map(|c| if (c as u32) < 256 { c as u8 } else { 0x3f }).collect();
        v.push(0);
        bytes.write(&v)
    }
}

impl Display for ZString {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Debug for ZString {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "\"{}\"", self.as_str())
    }
}

/// A plain 3x3 transformation matrix, as used by `mvhd`/`tkhd` (9 32-bit
/// fixed-point entries, 36 bytes); we carry it opaquely since no box in
/// this crate's scope interprets it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Matrix(pub [u8; 36]);

impl FromBytes for Matrix {
    fn from_bytes<R: ReadBytes>(bytes: &mut R) -> io::Result<Self> {
        let data = bytes.read(36)?;
        let mut m = [0u8; 36];
        m.copy_from_slice(data);
        Ok(Matrix(m))
    }
    fn min_size() -> usize {
        36
    }
}

impl ToBytes for Matrix {
    fn to_bytes<W: WriteBytes>(&self, bytes: &mut W) -> io::Result<()> {
        bytes.write(&self.0[..])
    }
}

impl Debug for Matrix {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Matrix(unity)")
    }
}

impl Matrix {
    /// The identity matrix ISO BMFF boxes default to.
    pub fn unity() -> Matrix {
        let mut m = [0u8; 36];
        // 0x00010000 (1.0 in 16.16 fixed point) at (0,0), (1,1), and
        // 0x40000000 (1.0 in 2.30 fixed point) at (2,2).
        m[0..4].copy_from_slice(&0x00010000u32.to_be_bytes());
        m[16..20].copy_from_slice(&0x00010000u32.to_be_bytes());
        m[32..36].copy_from_slice(&0x40000000u32.to_be_bytes());
        Matrix(m)
    }
}

/// 16.16 fixed-point value (e.g. `mvhd.rate`).
#[derive(Clone, Copy, Default, PartialEq)]
pub struct FixedFloat16_16(pub u32);

impl FromBytes for FixedFloat16_16 {
    fn from_bytes<R: ReadBytes>(bytes: &mut R) -> io::Result<Self> {
        Ok(FixedFloat16_16(u32::from_bytes(bytes)?))
    }
    fn min_size() -> usize {
        4
    }
}
impl ToBytes for FixedFloat16_16 {
    fn to_bytes<W: WriteBytes>(&self, bytes: &mut W) -> io::Result<()> {
        self.0.to_bytes(bytes)
    }
}
impl FixedFloat16_16 {
    pub fn get(&self) -> f64 {
        (self.0 as f64) / 65536.0
    }
}
impl Debug for FixedFloat16_16 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// 8.8 fixed-point value (e.g. `mvhd.volume`).
#[derive(Clone, Copy, Default, PartialEq)]
pub struct FixedFloat8_8(pub u16);

impl FromBytes for FixedFloat8_8 {
    fn from_bytes<R: ReadBytes>(bytes: &mut R) -> io::Result<Self> {
        Ok(FixedFloat8_8(u16::from_bytes(bytes)?))
    }
    fn min_size() -> usize {
        2
    }
}
impl ToBytes for FixedFloat8_8 {
    fn to_bytes<W: WriteBytes>(&self, bytes: &mut W) -> io::Result<()> {
        self.0.to_bytes(bytes)
    }
}
impl FixedFloat8_8 {
    pub fn get(&self) -> f64 {
        (self.0 as f64) / 256.0
    }
}
impl Debug for FixedFloat8_8 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Generic 24-bit `FullBox` flags field.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags(pub u32);

impl Flags {
    pub fn get(&self, bit: u32) -> bool {
        self.0 & (1 << bit) != 0
    }
    pub fn set(&mut self, bit: u32, on: bool) {
        if on {
            self.0 |= 1 << bit;
        } else {
            self.0 &= !(1 << bit);
        }
    }
}

impl Debug for Flags {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Flags({:#x})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourcc_pads_legacy_three_byte_atom() {
        let raw = FourCC::from(&[0xa9u8, b'a', b'l', b'b'][..]);
        assert_eq!(FourCC::new("alb"), raw);
    }

    #[test]
    fn fourcc_display_roundtrip() {
        assert_eq!(format!("{}", FourCC::new("moov")), "moov");
    }

    #[test]
    fn zstring_strips_nul_terminator() {
        let mut buf = crate::io::MemWriter::new();
        ZString("Apple".to_string()).to_bytes(&mut buf).unwrap();
        let mut s = &buf.into_inner()[..];
        let z = ZString::from_bytes(&mut s).unwrap();
        assert_eq!(&*z, "Apple");
    }
}
