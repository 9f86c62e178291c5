//! qrsmith: QR Code encoder on the command line.
//!
//! Arguments except for flags are joined by " " and encoded. The PNG goes to
//! stdout unless `-o` names a file prefix.
//!
//! ```text
//! qrsmith hello world | display
//! qrsmith -o out "homepage: https://example.com"
//! qrsmith -f data.csv --split-long -o output
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use qrsmith::{helper, split, EncodeError, RecoveryLevel, RenderOptions, Symbol};

#[derive(Parser, Debug)]
#[command(name = "qrsmith")]
#[command(about = "QR Code encoder")]
struct Args {
    /// Out PNG file prefix, empty for stdout.
    #[arg(short = 'o', default_value = "")]
    out: String,

    /// Image size in pixels; negative means pixels per module.
    #[arg(short = 's', default_value_t = 256, allow_negative_numbers = true)]
    size: i32,

    /// Print as text art on stdout.
    #[arg(short = 't')]
    text_art: bool,

    /// Invert black and white.
    #[arg(short = 'i')]
    invert: bool,

    /// Disable the quiet zone.
    #[arg(short = 'd')]
    disable_border: bool,

    /// Read input from a file, hex-encoding its bytes to text first.
    #[arg(short = 'f')]
    input_file: Option<PathBuf>,

    /// Error correction level: low, medium, quartile or highest.
    #[arg(short = 'l', default_value = "highest")]
    level: RecoveryLevel,

    /// Split long content into multiple QR codes.
    #[arg(long)]
    split_long: bool,

    /// Combine split QR codes into a single grid image (with --split-long).
    #[arg(long)]
    grid: bool,

    /// Content to encode.
    words: Vec<String>,
}

fn load_content(args: &Args) -> Result<String> {
    match (&args.input_file, args.words.is_empty()) {
        (Some(_), false) => bail!("cannot use both -f and positional content"),
        (None, true) => bail!("no content to encode"),
        (Some(path), true) => {
            let data =
                fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            Ok(hex::encode(data))
        }
        (None, false) => Ok(args.words.join(" ")),
    }
}

fn render_options(args: &Args) -> RenderOptions {
    let options = if args.disable_border {
        RenderOptions::without_border()
    } else {
        RenderOptions::default()
    };
    if args.invert {
        options.inverted()
    } else {
        options
    }
}

fn write_file(path: &str, data: &[u8]) -> Result<()> {
    fs::write(path, data).with_context(|| format!("writing {}", path))
}

fn write_single_code(symbol: &Symbol, args: &Args) -> Result<()> {
    let png = helper::to_png(symbol, args.size, &render_options(args))?;
    if args.out.is_empty() {
        io::stdout().write_all(&png)?;
        return Ok(());
    }
    write_file(&format!("{}.png", args.out), &png)
}

fn split_and_write(content: &str, args: &Args) -> Result<()> {
    if args.text_art {
        bail!("--split-long does not support text-art output");
    }
    if args.out.is_empty() {
        bail!("--split-long requires an output file prefix via -o");
    }

    let symbols = split::encode_multi(content, args.level)?;
    let options = render_options(args);

    if args.grid {
        let png = split::grid_png(&symbols, args.size, 0, &options)?;
        return write_file(&format!("{}-grid.png", args.out), &png);
    }

    for (i, symbol) in symbols.iter().enumerate() {
        let png = helper::to_png(symbol, args.size, &options)?;
        write_file(&format!("{}-{}.png", args.out, i), &png)?;
    }
    eprintln!("Split into {} QR codes", symbols.len());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // stdout may carry the PNG, so logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let content = load_content(&args)?;
    debug!(bytes = content.len(), level = ?args.level, "loaded content");

    match qrsmith::encode_text(&content, args.level) {
        Ok(symbol) => {
            if args.text_art {
                let border = if args.disable_border { 0 } else { 4 };
                println!("{}", helper::to_text_art(&symbol, args.invert, border));
                return Ok(());
            }
            write_single_code(&symbol, &args)
        }
        Err(EncodeError::ContentTooLong { .. }) if args.split_long => {
            split_and_write(&content, &args)
        }
        Err(err) => Err(err.into()),
    }
}
