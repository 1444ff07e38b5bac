#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]

mod settings;

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use flexi_logger::Logger;
use unifont_glyph::{parse_codepoint_hex, Glyph, GlyphCodec, GlyphFile};

use crate::settings::ProjectSettings;

#[derive(Parser)]
#[command(version, about = "Checks, formats and inspects Unifont .hex glyph files.")]
pub struct Cli {
    #[arg(help = "Log debug output.", long, short, default_value_t = false)]
    verbose: bool,

    #[arg(help = "Project settings file (TOML).", long, value_name = "FILE")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Reports every line that can't be parsed")]
    Check { file: PathBuf },

    #[command(about = "Rewrites a file in canonical form")]
    Format {
        file: PathBuf,
        #[arg(help = "Output file, the input is overwritten if omitted.", short, long)]
        output: Option<PathBuf>,
    },

    #[command(about = "Prints a single glyph")]
    Show {
        file: PathBuf,
        #[arg(help = "Codepoint in hex, e.g. 41 or U+0041.")]
        codepoint: String,
    },
}

fn main() -> ExitCode {
    let args = Cli::parse();

    let level = if args.verbose { "debug" } else { "info" };
    let _logger = match Logger::try_with_env_or_str(level).and_then(|logger| logger.log_to_stderr().start()) {
        Ok(logger) => Some(logger),
        Err(err) => {
            eprintln!("Failed to start logger: {err}");
            None
        }
    };

    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Cli) -> anyhow::Result<ExitCode> {
    let codec = GlyphCodec::global();
    match &args.command {
        Commands::Check { file } => {
            let text = read_text(file)?;
            let (font, errors) = GlyphFile::parse_lenient(codec, &text);
            for err in &errors {
                println!("{}: {err}", file.display());
            }
            println!("{} glyphs, {} errors", font.len(), errors.len());
            Ok(if errors.is_empty() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Commands::Format { file, output } => {
            let text = read_text(file)?;
            let font = GlyphFile::parse(codec, &text)?;
            let output = output.as_deref().unwrap_or(file.as_path());
            font.write(codec, output)?;
            log::info!("wrote {} glyphs to {}", font.len(), output.display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Show { file, codepoint } => {
            let settings = ProjectSettings::load(args.settings.as_deref())?;
            let codepoint = parse_codepoint_arg(codepoint)?;
            let text = read_text(file)?;
            let (font, _) = GlyphFile::parse_lenient(codec, &text);
            let Some(glyph) = font.get(codepoint) else {
                anyhow::bail!("no glyph for U+{codepoint:04X} in {}", file.display());
            };
            print!("{}", describe(codec, glyph, &settings)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("can't read {}", path.display()))
}

fn parse_codepoint_arg(arg: &str) -> anyhow::Result<u32> {
    let hex = ["U+", "u+", "0x", "0X"].iter().find_map(|prefix| arg.strip_prefix(prefix)).unwrap_or(arg);
    parse_codepoint_hex(hex).with_context(|| format!("invalid codepoint {arg}, expected hex up to 10FFFF"))
}

/// Metadata header followed by the bitmap with the vertical metrics drawn as guide lines.
fn describe(codec: GlyphCodec<'_>, glyph: &Glyph, settings: &ProjectSettings) -> anyhow::Result<String> {
    let mut result = String::new();
    let ch = glyph.character().map(|ch| format!(" ({ch:?})")).unwrap_or_default();
    result.push_str(&format!("U+{:04X}{ch} {}x{}", glyph.codepoint(), glyph.width(), glyph.height()));
    if glyph.missing {
        result.push_str(" missing");
    }
    result.push('\n');
    if let Some(bounds) = glyph.bounds() {
        result.push_str(&format!(
            "ink: x {}..={} y {}..={}\n",
            bounds.left, bounds.right, bounds.top, bounds.bottom
        ));
    }
    result.push_str(&codec.serialize(glyph)?);
    result.push('\n');

    if settings.size != glyph.height() {
        log::warn!("project size {} doesn't match the glyph height {}", settings.size, glyph.height());
    }
    let guides = settings.guide_lines();
    let guide = "=".repeat(glyph.width());
    let push_guides = |result: &mut String, y: usize| {
        for (_, label) in guides.iter().filter(|(row, _)| *row == y) {
            result.push_str(&format!("   {guide} {label}\n"));
        }
    };
    for (y, row) in glyph.bitmap.to_string().lines().enumerate() {
        push_guides(&mut result, y);
        result.push_str(&format!("{y:2} {row}\n"));
    }
    push_guides(&mut result, glyph.height());
    Ok(result)
}
