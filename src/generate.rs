use std::error::Error;
use std::fs::File;
use std::io::Write;

use schemars::schema_for;
use shanwan::config::Config;

const SCHEMA_PATH: &str = "./rootfs/usr/share/shanwan/schema/config_v1.json";

fn main() -> Result<(), Box<dyn Error>> {
    let config_schema = schema_for!(Config);
    let mut file = File::create(SCHEMA_PATH)?;
    writeln!(file, "{}", serde_json::to_string_pretty(&config_schema)?)?;
    println!("Wrote config schema to {SCHEMA_PATH}");
    Ok(())
}
