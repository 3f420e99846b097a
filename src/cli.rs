use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::config::load_config;
use crate::layout::{apply_layout, Direction, Point};
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_outline;
use crate::render::{render_svg, write_output_svg};
use crate::style::GlobalLayoutOptions;

#[derive(Parser, Debug)]
#[command(name = "markmind", version, about = "Markdown outline to mindmap renderer")]
pub struct Args {
    /// Input markdown file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (themes, per-level styles, layout)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Layout for the whole map: horizontal, vertical, taproot or classic
    #[arg(short = 'l', long = "layout")]
    pub layout: Option<String>,

    /// Growth direction for directional layouts
    #[arg(short = 'd', long = "direction")]
    pub direction: Option<String>,

    /// Theme preset: light or dark
    #[arg(short = 't', long = "theme")]
    pub theme: Option<String>,

    /// Write the computed layout as JSON next to the rendered output
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,

    /// Width
    #[arg(short = 'w', long = "width", default_value_t = 1200.0)]
    pub width: f32,

    /// Height
    #[arg(short = 'H', long = "height", default_value_t = 800.0)]
    pub height: f32,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    config.render.width = args.width;
    config.render.height = args.height;

    if let Some(name) = args.theme.as_deref() {
        config.theme = crate::theme::Theme::from_name(name)
            .ok_or_else(|| anyhow::anyhow!("unknown theme: {name}"))?;
    }
    if let Some(layout) = args.layout.as_deref() {
        let direction = args
            .direction
            .as_deref()
            .map(|tag| {
                Direction::from_token(tag)
                    .ok_or_else(|| anyhow::anyhow!("unknown direction: {tag}"))
            })
            .transpose()?;
        let options = GlobalLayoutOptions {
            direction,
            ..GlobalLayoutOptions::default()
        };
        config.styles.set_global_layout_type(layout, &options)?;
    }

    let input = read_input(args.input.as_deref())?;
    let mut tree = parse_outline(&input)
        .ok_or_else(|| anyhow::anyhow!("No headings or bullets found in input"))?;
    apply_layout(&mut tree, Point::new(0.0, 0.0), &config.styles)
        .ok_or_else(|| anyhow::anyhow!("Nothing to lay out"))?;

    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &tree, &config.styles)?;
    }

    let svg = render_svg(&tree, &config.theme, &config.styles);
    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            #[cfg(feature = "png")]
            {
                let output = ensure_output(&args.output, "png")?;
                crate::render::write_output_png(&svg, &output, &config.render)?;
            }
            #[cfg(not(feature = "png"))]
            {
                return Err(anyhow::anyhow!(
                    "PNG output requires the 'png' feature"
                ));
            }
        }
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok(buf);
        }
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[cfg(feature = "png")]
fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
