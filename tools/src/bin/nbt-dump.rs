use std::io::{self, Read};

use clap::{App, Arg};
use env_logger::Env;
use flate2::read::GzDecoder;
use voxnbt::{from_bytes_named, DeOpts, Value};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn dump(name: &str, value: &Value, indent: usize) {
    let label = if name.is_empty() {
        String::new()
    } else {
        format!("{}: ", name)
    };

    match value {
        Value::Compound(members) => {
            println!("{:indent$}{}{{", "", label, indent = indent);
            for (name, member) in members {
                dump(name, member, indent + 4);
            }
            println!("{:indent$}}}", "", indent = indent);
        }
        Value::List(tag, elements) => {
            println!("{:indent$}{}[{:?}; {}]", "", label, tag, elements.len(), indent = indent);
            for element in elements {
                dump("", element, indent + 4);
            }
        }
        Value::ByteArray(v) => println!("{:indent$}{}[B; {}]", "", label, v.len(), indent = indent),
        Value::IntArray(v) => println!("{:indent$}{}[I; {}]", "", label, v.len(), indent = indent),
        Value::LongArray(v) => println!("{:indent$}{}[L; {}]", "", label, v.len(), indent = indent),
        other => println!("{:indent$}{}{:?}", "", label, other, indent = indent),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let matches = App::new("nbt-dump")
        .about("print a tag tree read from stdin")
        .arg(
            Arg::with_name("gzip")
                .long("gzip")
                .takes_value(false)
                .help("input is gzip compressed"),
        )
        .arg(
            Arg::with_name("max-depth")
                .long("max-depth")
                .takes_value(true),
        )
        .get_matches();

    let mut data = vec![];
    if matches.is_present("gzip") {
        GzDecoder::new(io::stdin()).read_to_end(&mut data)?;
    } else {
        io::stdin().read_to_end(&mut data)?;
    }

    let mut opts = DeOpts::new();
    if let Some(depth) = matches.value_of("max-depth") {
        opts = opts.max_depth(depth.parse()?);
    }

    let (name, value) = from_bytes_named(&data, opts)?;
    dump(&name, &value, 0);

    Ok(())
}
