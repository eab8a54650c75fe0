//! Command-line front end: read a raw 8-bit plane, render its spectrum,
//! write the result as a binary PGM.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};

use fftspectrum::{DispatchOverride, PlaneMut, PlaneRef, SpectrumConfig, SpectrumPipeline};

const USAGE: &str = "\
usage: fftspectrum <input.raw> <width> <height> <output.pgm> [options]

options:
  --grid              overlay the coordinate grid
  --opt <tier>        kernel tier: auto, scalar, w4, w8, w16
  --config <file>     JSON config (flags above override it)
";

struct Args {
    input: PathBuf,
    width: usize,
    height: usize,
    output: PathBuf,
    grid: bool,
    opt: Option<DispatchOverride>,
    config: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut positional = Vec::new();
    let mut grid = false;
    let mut opt = None;
    let mut config = None;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--grid" => grid = true,
            "--opt" => {
                let tier = iter.next().context("--opt needs a value")?;
                opt = Some(parse_tier(&tier)?);
            }
            "--config" => {
                let path = iter.next().context("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                print!("{USAGE}");
                std::process::exit(0);
            }
            other if other.starts_with('-') => bail!("unknown option '{other}'\n{USAGE}"),
            other => positional.push(other.to_string()),
        }
    }

    let [input, width, height, output] = positional.try_into().map_err(|_| {
        anyhow::anyhow!("expected <input.raw> <width> <height> <output.pgm>\n{USAGE}")
    })?;
    Ok(Args {
        input: PathBuf::from(input),
        width: width.parse().context("width must be a positive integer")?,
        height: height.parse().context("height must be a positive integer")?,
        output: PathBuf::from(output),
        grid,
        opt,
        config,
    })
}

fn parse_tier(text: &str) -> anyhow::Result<DispatchOverride> {
    Ok(match text {
        "auto" => DispatchOverride::Auto,
        "scalar" => DispatchOverride::Scalar,
        "w4" => DispatchOverride::Width4,
        "w8" => DispatchOverride::Width8,
        "w16" => DispatchOverride::Width16,
        other => bail!("unknown kernel tier '{other}' (expected auto, scalar, w4, w8, w16)"),
    })
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => SpectrumConfig::load_or_default(path),
        None => SpectrumConfig::default(),
    };
    if args.grid {
        config.grid = true;
    }
    if let Some(opt) = args.opt {
        config.dispatch = opt;
    }

    let data = std::fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let expected = args
        .width
        .checked_mul(args.height)
        .context("frame size overflows")?;
    if data.len() != expected {
        bail!(
            "{} holds {} bytes, expected {} ({}x{})",
            args.input.display(),
            data.len(),
            expected,
            args.width,
            args.height
        );
    }

    let mut pipeline = SpectrumPipeline::new(args.width, args.height, config)?;
    let src = PlaneRef::packed(&data, args.width, args.height)?;
    let mut out = vec![0u8; expected];
    let mut dst = PlaneMut::packed(&mut out, args.width, args.height)?;
    pipeline.process(&src, &mut dst);

    write_pgm(&args.output, &out, args.width, args.height)
        .with_context(|| format!("writing {}", args.output.display()))?;
    Ok(())
}

fn write_pgm(path: &std::path::Path, pixels: &[u8], width: usize, height: usize) -> std::io::Result<()> {
    let mut bytes = format!("P5\n{width} {height}\n255\n").into_bytes();
    bytes.extend_from_slice(pixels);
    std::fs::write(path, bytes)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let result = parse_args().and_then(run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("fftspectrum: {err:#}");
            ExitCode::FAILURE
        }
    }
}
