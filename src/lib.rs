#[macro_use]
extern crate log;

#[macro_use]
mod macros;
pub mod ioerr;
pub mod fromtobytes;
pub mod io;
pub mod mp4box;
pub mod boxes;
pub mod genres;
pub mod tag;
pub mod parser;
pub mod file;
pub mod types;

pub use file::TaggedFile;
pub use tag::AppleTagExt;
