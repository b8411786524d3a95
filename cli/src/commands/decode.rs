use std::fmt::{self, Display, Formatter};

use clap::{ArgMatches, Command, arg};

use sphix::{LonLat, Region};

pub fn cli() -> Command {
    Command::new("decode")
        .about("Decode a base64-encoded region and describe it")
        .arg(arg!(<REGION> "Base64-encoded region string"))
}

pub fn exec(args: &ArgMatches) -> anyhow::Result<()> {
    let encoded = args
        .get_one::<String>("REGION")
        .expect("REGION is a required argument");
    let region = Region::decode_base64(encoded)?;
    print!("{}", RegionView(&region));
    Ok(())
}

struct RegionView<'r>(&'r Region);

impl Display for RegionView<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let Self(region) = self;
        let circle = region.bounding_circle();
        let center = LonLat::from_vector(circle.center().as_vector());
        let bbox = region.bounding_box();
        writeln!(f, "Region:                 {region}")?;
        writeln!(f, "Empty:                  {}", region.is_empty())?;
        writeln!(
            f,
            "Bounding circle center: lon {:.6}°, lat {:.6}°",
            center.lon().as_degrees(),
            center.lat().as_degrees()
        )?;
        writeln!(
            f,
            "Bounding circle radius: {:.6}°",
            circle.opening_angle().as_degrees()
        )?;
        writeln!(
            f,
            "Bounding box:           lon [{:.6}°, {:.6}°], lat [{:.6}°, {:.6}°]",
            bbox.lon().a().as_degrees(),
            bbox.lon().b().as_degrees(),
            bbox.lat().a().as_degrees(),
            bbox.lat().b().as_degrees()
        )
    }
}
