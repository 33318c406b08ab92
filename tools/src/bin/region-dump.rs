use clap::{App, Arg};
use env_logger::Env;
use log::{info, warn};
use voxanvil::{Chunk, DecodeOptions, RegionDecoder};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn summary(chunk: &Chunk) -> String {
    format!(
        "{} blocks, y {}..={}",
        chunk.blocks.len(),
        chunk.min_y,
        chunk.max_y
    )
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let matches = App::new("region-dump")
        .about("decode every chunk of a region file")
        .arg(Arg::with_name("region").takes_value(true).required(true))
        .arg(
            Arg::with_name("json")
                .long("json")
                .takes_value(false)
                .help("print the decoded region as JSON"),
        )
        .arg(
            Arg::with_name("sequential")
                .long("sequential")
                .takes_value(false)
                .help("decode chunks on a single thread"),
        )
        .arg(
            Arg::with_name("max-depth")
                .long("max-depth")
                .takes_value(true)
                .help("maximum nesting of a chunk's tag tree"),
        )
        .arg(
            Arg::with_name("skip-air")
                .long("skip-air")
                .takes_value(false)
                .help("leave air blocks out"),
        )
        .get_matches();

    let mut opts = DecodeOptions::new()
        .parallel(!matches.is_present("sequential"))
        .skip_air(matches.is_present("skip-air"));
    if let Some(depth) = matches.value_of("max-depth") {
        opts = opts.max_depth(depth.parse()?);
    }

    let path = matches.value_of("region").ok_or("no region given")?;
    let data = std::fs::read(path)?;
    let region = RegionDecoder::new(opts).decode(&data)?;

    if matches.is_present("json") {
        println!("{}", serde_json::to_string(&region)?);
    } else {
        let mut chunks: Vec<_> = region.iter().collect();
        chunks.sort_by_key(|(coord, _)| (coord.z, coord.x));

        for (coord, chunk) in chunks {
            println!("{}: {}", coord, summary(chunk));
        }
    }

    for diag in region.diagnostics() {
        warn!("{}: {}", diag.coord, diag.error);
    }
    info!(
        "{} chunks decoded, {} failed",
        region.len(),
        region.diagnostics().len()
    );

    Ok(())
}
