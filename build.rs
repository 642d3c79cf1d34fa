use std::env;
use std::fs;
use std::path::Path;

fn main() {
    // Create config template if it doesn't exist
    let out_dir = env::var("OUT_DIR").unwrap_or_else(|_| "./".to_string());
    let template_path = Path::new(&out_dir).join("../../../bitcrc.template.toml");

    let template = r#"# bitcrc Configuration Template
# Copy this file to 'bitcrc.toml' and pick the default CRC preset

# One of: crc8-smbus, crc16-ccitt, crc16-x25, crc32-iso, crc32-mpeg2, crc64-xz
crc_preset = "crc32-iso"
"#;

    let _ = fs::write(template_path, template);
    println!("cargo:rerun-if-changed=build.rs");
}
