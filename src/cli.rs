use crate::config::{Config, load_config};
use crate::ir::{BubbleGroup, group_records};
use crate::layout::{Layout, compute_layout};
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_input;
use crate::render::{render_svg, write_output_png, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "rbubbles",
    version,
    about = "Pack labeled bubbles on concentric rings and render them"
)]
pub struct Args {
    /// Input file (JSON, JSON5 or line format) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png/json). Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, themeVariables, layout, render)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas edge length; overrides the config file
    #[arg(short = 's', long = "canvasSize")]
    pub canvas_size: Option<f32>,

    /// Only lay out the named group
    #[arg(short = 'g', long = "group")]
    pub group: Option<String>,

    /// Write one output file per group
    #[arg(long = "split")]
    pub split: bool,

    /// Draw bubbles that could not be placed cleanly with a warning stroke
    #[arg(long = "highlightOverlaps")]
    pub highlight_overlaps: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            OutputFormat::Json => "json",
        }
    }
}

pub fn run() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(size) = args.canvas_size {
        config.layout.pack.canvas_size = size;
    }
    if args.highlight_overlaps {
        config.layout.highlight_overlaps = true;
    }
    config.layout.validate()?;

    let input = read_input(args.input.as_deref())?;
    let records = parse_input(&input)?;
    let groups = select_group(group_records(records), args.group.as_deref())?;
    log::info!(
        "laying out {} group(s) on a {} canvas",
        groups.len(),
        config.layout.pack.canvas_size
    );

    if args.split {
        write_split(&groups, &config, args.output_format, args.output.as_deref())?;
        return Ok(());
    }

    let layout = compute_layout(&groups, &config.layout);
    write_layout(&layout, &config, args.output_format, args.output.as_deref())
}

/// One file per group, even when there is only one group.
fn write_split(
    groups: &[BubbleGroup],
    config: &Config,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let outputs = resolve_split_outputs(output, format, groups.len())?;
    for (group, output) in groups.iter().zip(&outputs) {
        let layout = compute_layout(std::slice::from_ref(group), &config.layout);
        write_layout(&layout, config, format, Some(output.as_path()))?;
    }
    Ok(outputs)
}

fn write_layout(
    layout: &Layout,
    config: &Config,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    match format {
        OutputFormat::Svg => {
            let svg = render_svg(layout, &config.theme, &config.layout);
            write_output_svg(&svg, output)
        }
        OutputFormat::Png => {
            let output = output
                .ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
            let svg = render_svg(layout, &config.theme, &config.layout);
            write_output_png(&svg, output, &config.render)
        }
        OutputFormat::Json => write_layout_dump(output, layout),
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn select_group(groups: Vec<BubbleGroup>, name: Option<&str>) -> Result<Vec<BubbleGroup>> {
    let Some(name) = name else {
        return Ok(groups);
    };
    let available: Vec<String> = groups
        .iter()
        .map(|group| format!("{:?}", group.display_name()))
        .collect();
    let selected: Vec<BubbleGroup> = groups
        .into_iter()
        .filter(|group| group.display_name() == name)
        .collect();
    if selected.is_empty() {
        return Err(anyhow::anyhow!(
            "No group named {name:?} (available: {})",
            available.join(", ")
        ));
    }
    Ok(selected)
}

fn resolve_split_outputs(
    output: Option<&Path>,
    format: OutputFormat,
    count: usize,
) -> Result<Vec<PathBuf>> {
    let ext = format.extension();
    let base = output.ok_or_else(|| anyhow::anyhow!("Output path required with --split"))?;
    if base.is_dir() {
        return Ok((1..=count)
            .map(|idx| base.join(format!("group-{idx}.{ext}")))
            .collect());
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("group");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    Ok((1..=count)
        .map(|idx| parent.join(format!("{stem}-{idx}.{ext}")))
        .collect())
}
