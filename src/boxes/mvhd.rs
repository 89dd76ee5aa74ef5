//! `mvhd` — movie header: creation/modification times, the track-agnostic
//! `timescale`/`duration` pair, and a few rendering hints (`rate`,
//! `volume`, `matrix`) this crate carries through unexamined.
use std::io;

use crate::fromtobytes::{FromBytes, ReadBytes, ToBytes, WriteBytes};
use crate::mp4box::{read_full_box_header, write_full_box_header, BoxReader, BoxWriter};
use crate::types::{Duration_, FixedFloat16_16, FixedFloat8_8, Matrix, Time};

#[derive(Clone, Debug)]
pub struct MovieHeaderBox {
    pub version: u8,
    pub flags: u32,
    pub creation_time: Time,
    pub modification_time: Time,
    pub timescale: u32,
    pub duration: Duration_,
    pub rate: FixedFloat16_16,
    pub volume: FixedFloat8_8,
    pub matrix: Matrix,
    pub next_track_id: u32,
}

impl MovieHeaderBox {
    pub fn read_data(reader: &mut BoxReader) -> io::Result<MovieHeaderBox> {
        let (version, flags) = read_full_box_header(reader)?;
        let creation_time = Time::read(reader, version)?;
        let modification_time = Time::read(reader, version)?;
        let timescale = u32::from_bytes(reader)?;
        let duration = Duration_::read(reader, version)?;
        let rate = FixedFloat16_16::from_bytes(reader)?;
        let volume = FixedFloat8_8::from_bytes(reader)?;
        reader.skip(2)?; // reserved(16)
        reader.skip(8)?; // reserved(32)[2]
        let matrix = Matrix::from_bytes(reader)?;
        reader.skip(24)?; // pre_defined(32)[6]
        let next_track_id = u32::from_bytes(reader)?;
        Ok(MovieHeaderBox { version, flags, creation_time, modification_time, timescale, duration, rate, volume, matrix, next_track_id })
    }

    pub fn write_data(&self, writer: &mut BoxWriter) -> io::Result<()> {
        write_full_box_header(writer, self.version, self.flags)?;
        self.creation_time.write(writer, self.version)?;
        self.modification_time.write(writer, self.version)?;
        self.timescale.to_bytes(writer)?;
        self.duration.write(writer, self.version)?;
        self.rate.to_bytes(writer)?;
        self.volume.to_bytes(writer)?;
        writer.skip(2)?;
        writer.skip(8)?;
        self.matrix.to_bytes(writer)?;
        writer.skip(24)?;
        self.next_track_id.to_bytes(writer)
    }

    /// `duration / timescale * 1000`, per the wire definition of `mvhd`.
    pub fn duration_ms(&self) -> u64 {
        if self.timescale == 0 {
            return 0;
        }
        (self.duration.0 as u128 * 1000 / self.timescale as u128) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_ms_divides_by_timescale() {
        let mvhd = MovieHeaderBox {
            version: 0,
            flags: 0,
            creation_time: Time(0),
            modification_time: Time(0),
            timescale: 1000,
            duration: Duration_(5000),
            rate: FixedFloat16_16::default(),
            volume: FixedFloat8_8::default(),
            matrix: Matrix::unity(),
            next_track_id: 1,
        };
        assert_eq!(mvhd.duration_ms(), 5000);
    }

    #[test]
    fn duration_ms_zero_timescale_is_zero() {
        let mvhd = MovieHeaderBox {
            version: 0,
            flags: 0,
            creation_time: Time(0),
            modification_time: Time(0),
            timescale: 0,
            duration: Duration_(5000),
            rate: FixedFloat16_16::default(),
            volume: FixedFloat8_8::default(),
            matrix: Matrix::unity(),
            next_track_id: 1,
        };
        assert_eq!(mvhd.duration_ms(), 0);
    }
}
