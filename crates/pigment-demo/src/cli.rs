use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use pigment_core::{BlendMode, CurvePoint, KernelPreset, ResizeMethod};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Method {
    /// Pixel replication
    #[value(name = "nearest")]
    Nearest,
    /// Four-tap linear blend
    #[value(name = "bilinear")]
    Bilinear,
}

impl From<Method> for ResizeMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Nearest => ResizeMethod::Nearest,
            Method::Bilinear => ResizeMethod::Bilinear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Blend {
    #[value(name = "normal")]
    Normal,
    #[value(name = "multiply")]
    Multiply,
    #[value(name = "screen")]
    Screen,
    #[value(name = "overlay")]
    Overlay,
}

impl From<Blend> for BlendMode {
    fn from(blend: Blend) -> Self {
        match blend {
            Blend::Normal => BlendMode::Normal,
            Blend::Multiply => BlendMode::Multiply,
            Blend::Screen => BlendMode::Screen,
            Blend::Overlay => BlendMode::Overlay,
        }
    }
}

/// Control points given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curve(pub Vec<CurvePoint>);

#[derive(Parser, Debug)]
#[command(
    name = "pigment-demo",
    about = "Run an image through the Pigment engine and write the composite as PNG",
    long_about = "
Loads a GrayBit-7 (.gb7) or generic image as the base layer, optionally
filters it on the background worker, applies a tone curve, resizes it, adds a
solid color layer on top and writes the flattened result.

Example Usage:
  # Sharpen and write
  pigment-demo -i scan.gb7 -o out.png --preset sharpen

  # Invert with a curve, halve the size, tint with a multiply layer
  pigment-demo -i photo.jpg -o out.png --curve 0:255,255:0 --resize 400x300 \\
    --overlay '#ff8800' --blend multiply --opacity 0.5

  # Give up on the filter after 200 ms and keep the original pixels
  pigment-demo -i big.png -o out.png --preset gaussian --timeout-ms 200"
)]
pub struct Args {
    /// Input image (.gb7 or any format the generic decoder reads)
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// Output PNG path
    #[arg(short = 'o', long = "output", value_name = "FILE", default_value = "out.png")]
    pub output: PathBuf,

    /// Kernel preset: identity, sharpen, gaussian, boxBlur, prewittX, prewittY
    #[arg(short = 'k', long = "preset", value_name = "NAME")]
    pub preset: Option<KernelPreset>,

    /// Cancel the background filter after this many milliseconds
    #[arg(long = "timeout-ms", value_name = "MS", requires = "preset")]
    pub timeout_ms: Option<u64>,

    /// Tone curve as input:output pairs, e.g. 0:0,128:200,255:255
    #[arg(short = 'c', long = "curve", value_name = "POINTS", value_parser = parse_curve)]
    pub curve: Option<Curve>,

    /// Resize the base layer (format: WIDTHxHEIGHT)
    #[arg(short = 's', long = "resize", value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub resize: Option<(u32, u32)>,

    /// Resampling method for --resize
    #[arg(long = "method", default_value = "bilinear")]
    pub method: Method,

    /// Add a solid color layer (#rrggbb or #rrggbbaa)
    #[arg(long = "overlay", value_name = "HEX", value_parser = parse_hex_color)]
    pub overlay: Option<[u8; 4]>,

    /// Blend mode of the color layer
    #[arg(long = "blend", default_value = "normal")]
    pub blend: Blend,

    /// Opacity of the color layer, 0 to 1
    #[arg(long = "opacity", default_value_t = 1.0)]
    pub opacity: f32,

    /// Report the color at X,Y of the composite
    #[arg(long = "sample", value_name = "X,Y", value_parser = parse_point)]
    pub sample: Option<(u32, u32)>,
}

/// Parse `WIDTHxHEIGHT`.
pub fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let w = w.trim().parse::<u32>().map_err(|e| format!("bad width {w:?}: {e}"))?;
    let h = h.trim().parse::<u32>().map_err(|e| format!("bad height {h:?}: {e}"))?;
    Ok((w, h))
}

/// Parse `X,Y`.
pub fn parse_point(s: &str) -> Result<(u32, u32), String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let x = x.trim().parse::<u32>().map_err(|e| format!("bad x {x:?}: {e}"))?;
    let y = y.trim().parse::<u32>().map_err(|e| format!("bad y {y:?}: {e}"))?;
    Ok((x, y))
}

/// Parse comma-separated `input:output` pairs.
pub fn parse_curve(s: &str) -> Result<Curve, String> {
    s.split(',')
        .map(|pair| {
            let (input, output) = pair
                .split_once(':')
                .ok_or_else(|| format!("expected input:output, got {pair:?}"))?;
            let input = input
                .trim()
                .parse::<u8>()
                .map_err(|e| format!("bad input {input:?}: {e}"))?;
            let output = output
                .trim()
                .parse::<u8>()
                .map_err(|e| format!("bad output {output:?}: {e}"))?;
            Ok(CurvePoint::new(input, output))
        })
        .collect::<Result<_, String>>()
        .map(Curve)
}

/// Parse `#rrggbb` or `#rrggbbaa`. The leading `#` is optional.
pub fn parse_hex_color(s: &str) -> Result<[u8; 4], String> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return Err(format!("expected #rrggbb or #rrggbbaa, got {s:?}"));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| format!("bad color {s:?}: {e}"))
    };
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Ok([channel(0)?, channel(2)?, channel(4)?, alpha])
}
