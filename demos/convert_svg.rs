use std::{env, fs};

use anyhow::{bail, Context};
use svg_slides_tools::{convert_svg_file, ConversionOptions};

fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the default level.
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (svg_path, options_path) = match args.as_slice() {
        [svg] => (svg, None),
        [svg, options] => (svg, Some(options)),
        _ => bail!("usage: convert_svg <input.svg> [options.json]"),
    };

    let options = match options_path {
        Some(path) => ConversionOptions::from_json_file(path)
            .with_context(|| format!("failed to load options from {}", path))?,
        None => ConversionOptions::default(),
    };

    log::info!("Converting {}...", svg_path);
    let (tree, report) = convert_svg_file(svg_path, &options)
        .with_context(|| format!("failed to convert {}", svg_path))?;
    for warning in &report.warnings {
        log::warn!("<{}> {:?}: {}", warning.tag, warning.kind, warning.message);
    }

    let output_path = format!("{}.spTree.xml", svg_path.trim_end_matches(".svg"));
    fs::write(&output_path, tree.to_xml()?)
        .with_context(|| format!("unable to write {}", output_path))?;
    log::info!(
        "{} shapes written to {} ({} warnings)",
        report.shapes_emitted,
        output_path,
        report.warnings.len()
    );
    Ok(())
}
