use clap::{ArgMatches, Command, arg, value_parser};

use anyhow::Context;
use sphix::{HtmPixelization, Mq3cPixelization, Pixelization, RangeSet, Region};

pub fn cli() -> Command {
    Command::new("envelope")
        .about("Compute the pixel index ranges covering a region")
        .arg(arg!(<REGION> "Base64-encoded region string"))
        .arg(
            arg!(--level <LEVEL> "Subdivision level")
                .required(true)
                .value_parser(value_parser!(u32)),
        )
        .arg(
            arg!(--scheme <SCHEME> "Pixelization scheme")
                .value_parser(["htm", "mq3c"])
                .default_value("htm"),
        )
        .arg(
            arg!(--"max-ranges" <N> "Maximum number of ranges (0 = unlimited)")
                .value_parser(value_parser!(usize))
                .default_value("0"),
        )
        .arg(arg!(--interior "Report interior pixels instead of the envelope"))
}

pub fn exec(args: &ArgMatches) -> anyhow::Result<()> {
    let encoded = args
        .get_one::<String>("REGION")
        .expect("REGION is a required argument");
    let level = *args.get_one::<u32>("level").expect("level is required");
    let scheme = args
        .get_one::<String>("scheme")
        .expect("scheme has a default");
    let max_ranges = *args
        .get_one::<usize>("max-ranges")
        .expect("max-ranges has a default");
    let interior = args.get_flag("interior");
    let region = Region::decode_base64(encoded)?;
    let ranges = match scheme.as_str() {
        "htm" => {
            let p = HtmPixelization::new(level).context("invalid HTM level")?;
            if interior {
                p.interior(&region, max_ranges)
            } else {
                p.envelope(&region, max_ranges)
            }
        }
        _ => {
            let p = Mq3cPixelization::new(level).context("invalid modified-Q3C level")?;
            if interior {
                p.interior(&region, max_ranges)
            } else {
                p.envelope(&region, max_ranges)
            }
        }
    };
    print_ranges(&ranges);
    Ok(())
}

fn print_ranges(ranges: &RangeSet) {
    println!("Ranges:      {}", ranges.len());
    println!("Cardinality: {}", ranges.cardinality());
    for (begin, end) in ranges.iter() {
        println!("    [{begin}, {end})");
    }
}
