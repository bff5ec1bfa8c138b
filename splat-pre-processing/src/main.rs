/// Splat gallery pre-processing entry point
mod bounds;
mod converter;
mod dds_writer;
mod error;
mod manifest;
mod ply;

use converter::GalleryConverter;
use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut input_dirs = Vec::new();
    let mut output_dir = None;
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--output" | "-o" => output_dir = rest.next().map(PathBuf::from),
            _ => input_dirs.push(PathBuf::from(arg)),
        }
    }

    let Some(output_dir) = output_dir.filter(|_| !input_dirs.is_empty()) else {
        eprintln!(
            "Usage: {} <gallery_dir> [<extra_dir>...] --output <dir>",
            args.first().map(String::as_str).unwrap_or("splat-pre-processing")
        );
        std::process::exit(1);
    };

    let converter = GalleryConverter::new(input_dirs, &output_dir)?;
    let manifest = converter.convert()?;

    println!(
        "Conversion complete! {} scenes written to {}",
        manifest.scenes.len(),
        output_dir.display()
    );
    Ok(())
}
