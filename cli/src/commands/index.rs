use std::fmt::{self, Display, Formatter};

use anyhow::Context;
use clap::{ArgMatches, Command, arg, value_parser};

use sphix::{Angle, HtmPixelization, Mq3cPixelization, Pixelization, UnitVector3d};

pub fn cli() -> Command {
    Command::new("index")
        .about("Compute the pixel index of a point")
        .arg(
            arg!(--lon <DEGREES> "Longitude in degrees")
                .required(true)
                .value_parser(value_parser!(f64)),
        )
        .arg(
            arg!(--lat <DEGREES> "Latitude in degrees")
                .required(true)
                .value_parser(value_parser!(f64)),
        )
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
}

pub fn exec(args: &ArgMatches) -> anyhow::Result<()> {
    let lon = *args.get_one::<f64>("lon").expect("lon is required");
    let lat = *args.get_one::<f64>("lat").expect("lat is required");
    let level = *args.get_one::<u32>("level").expect("level is required");
    let scheme = args
        .get_one::<String>("scheme")
        .expect("scheme has a default");
    let v = UnitVector3d::from_lon_lat(Angle::from_degrees(lon), Angle::from_degrees(lat));
    let (index, name) = match scheme.as_str() {
        "htm" => {
            let p = HtmPixelization::new(level).context("invalid HTM level")?;
            let i = p.index(&v);
            (i, p.index_to_string(i)?)
        }
        _ => {
            let p = Mq3cPixelization::new(level).context("invalid modified-Q3C level")?;
            let i = p.index(&v);
            (i, p.index_to_string(i)?)
        }
    };
    print!("{}", IndexView(scheme, level, index, &name));
    Ok(())
}

struct IndexView<'v>(&'v str, u32, u64, &'v str);

impl Display for IndexView<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let Self(scheme, level, index, name) = self;
        writeln!(f, "Scheme:  {scheme}")?;
        writeln!(f, "Level:   {level}")?;
        writeln!(f, "Index:   {index}")?;
        writeln!(f, "Name:    {name}")
    }
}
