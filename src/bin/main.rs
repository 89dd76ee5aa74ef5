//! `m4ameta` — dump, read, or edit the Apple tag on an `.m4a`/`.mp4` file.
use anyhow::{anyhow, Context, Result};
use clap::{App, Arg, SubCommand};

use m4ameta::tag::{AppleTagExt, TagSummary};
use m4ameta::TaggedFile;

fn main() -> Result<()> {
    env_logger::init();

    let matches = App::new("m4ameta")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Read and write iTunes-style tags on .m4a/.mp4 files")
        .subcommand(
            SubCommand::with_name("dump")
                .about("print the box tree and resolved tag")
                .arg(Arg::with_name("file").required(true))
                .arg(Arg::with_name("json").long("json").help("print the tag as JSON instead")),
        )
        .subcommand(
            SubCommand::with_name("get")
                .about("print one tag field")
                .arg(Arg::with_name("file").required(true))
                .arg(Arg::with_name("field").required(true)),
        )
        .subcommand(
            SubCommand::with_name("set")
                .about("set one tag field and save")
                .arg(Arg::with_name("file").required(true))
                .arg(Arg::with_name("field").required(true))
                .arg(Arg::with_name("value").required(true)),
        )
        .get_matches();

    match matches.subcommand() {
        ("dump", Some(m)) => dump(m.value_of("file").unwrap(), m.is_present("json")),
        ("get", Some(m)) => get(m.value_of("file").unwrap(), m.value_of("field").unwrap()),
        ("set", Some(m)) => set(m.value_of("file").unwrap(), m.value_of("field").unwrap(), m.value_of("value").unwrap()),
        _ => {
            eprintln!("{}", matches.usage());
            Ok(())
        }
    }
}

fn dump(path: &str, as_json: bool) -> Result<()> {
    let file = TaggedFile::open_readonly(path).with_context(|| format!("opening {}", path))?;
    if file.is_corrupt() {
        return Err(anyhow!("{} is corrupt: {}", path, file.corrupt_reason().unwrap_or("unknown reason")));
    }
    if as_json {
        let summary = file.tag().map(TagSummary::from).unwrap_or_default();
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    println!("{:#?}", file.movie_header());
    println!("duration: {} ms", file.duration_ms());
    println!("{:#?}", file.tag());
    Ok(())
}

fn get(path: &str, field: &str) -> Result<()> {
    let file = TaggedFile::open_readonly(path).with_context(|| format!("opening {}", path))?;
    if file.is_corrupt() {
        return Err(anyhow!("{} is corrupt: {}", path, file.corrupt_reason().unwrap_or("unknown reason")));
    }
    let tag = match file.tag() {
        Some(t) => t,
        None => return Ok(()),
    };
    let value = read_field(tag, field).ok_or_else(|| anyhow!("unknown field {:?}", field))?;
    println!("{}", value);
    Ok(())
}

fn set(path: &str, field: &str, value: &str) -> Result<()> {
    let mut file = TaggedFile::open(path).with_context(|| format!("opening {}", path))?;
    if file.is_corrupt() {
        return Err(anyhow!("{} is corrupt: {}", path, file.corrupt_reason().unwrap_or("unknown reason")));
    }
    let tag = file.tag_mut()?;
    write_field(tag, field, value).ok_or_else(|| anyhow!("unknown or read-only field {:?}", field))?;
    file.save().with_context(|| format!("saving {}", path))?;
    Ok(())
}

fn read_field(tag: &m4ameta::boxes::AppleItemListBox, field: &str) -> Option<String> {
    Some(match field {
        "title" => tag.title()?.to_string(),
        "album" => tag.album()?.to_string(),
        "artist" | "artists" => tag.artists().join("; "),
        "album_artist" | "album_artists" => tag.album_artists().join("; "),
        "genre" | "genres" => tag.genres().join("; "),
        "year" => tag.year().to_string(),
        "comment" => tag.comment()?.to_string(),
        "composer" | "composers" => tag.composers().join("; "),
        "grouping" => tag.grouping()?.to_string(),
        "compilation" => tag.compilation().to_string(),
        "bpm" => tag.bpm().to_string(),
        _ => return None,
    })
}

fn write_field(tag: &mut m4ameta::boxes::AppleItemListBox, field: &str, value: &str) -> Option<()> {
    match field {
        "title" => tag.set_title(value),
        "album" => tag.set_album(value),
        "artist" | "artists" => tag.set_artists(&split(value)),
        "album_artist" | "album_artists" => tag.set_album_artists(&split(value)),
        "genre" | "genres" => tag.set_genres(&split(value)),
        "year" => tag.set_year(value.parse().ok()?),
        "comment" => tag.set_comment(value),
        "composer" | "composers" => tag.set_composers(&split(value)),
        "grouping" => tag.set_grouping(value),
        "compilation" => tag.set_compilation(value.parse().ok()?),
        "bpm" => tag.set_bpm(value.parse().ok()?),
        _ => return None,
    }
    Some(())
}

fn split(value: &str) -> Vec<String> {
    value.split(';').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
}
