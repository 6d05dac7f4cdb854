use std::error::Error;
use std::path::PathBuf;

use polyjson::Inventory;

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=shapes.json");

    let inventory = Inventory::from_path("shapes.json")?;
    let out = PathBuf::from(std::env::var("OUT_DIR")?).join("shapes_codec.rs");
    polyjson::write_codec_file(
        &out,
        inventory.package.as_deref().unwrap_or_default(),
        &inventory.unions,
        &inventory.containers,
    )?;
    Ok(())
}
