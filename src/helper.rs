//! Rendering helpers: text art, SVG and raster images of a finished [`Symbol`].
//!
//! These only read the module grid through [`Symbol::is_dark`]; the encoder
//! never calls into this module.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};
use tracing::debug;

use crate::error::RenderError;
use crate::qrcode::Symbol;

/// Largest image edge, in pixels, the raster helpers will allocate.
pub const MAX_IMAGE_EDGE: u32 = 1 << 15;

/// Colours and quiet zone for raster output.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RenderOptions {
    /// Quiet zone width in modules.
    pub border: u32,
    /// RGBA colour of dark modules.
    pub foreground: [u8; 4],
    /// RGBA colour of light modules, the quiet zone and any padding.
    pub background: [u8; 4],
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            border: 4,
            foreground: [0, 0, 0, 255],
            background: [255, 255, 255, 255],
        }
    }
}

impl RenderOptions {
    /// Default colours with no quiet zone.
    pub fn without_border() -> Self {
        Self {
            border: 0,
            ..Self::default()
        }
    }

    /// The same options with foreground and background swapped.
    pub fn inverted(self) -> Self {
        Self {
            foreground: self.background,
            background: self.foreground,
            ..self
        }
    }
}

/// Renders the symbol as text, two characters per module and one line per row.
///
/// Dark modules are `██`, light ones two spaces; `inverse` swaps them.
pub fn to_text_art(symbol: &Symbol, inverse: bool, border: u32) -> String {
    let (dark, light) = if inverse { ("  ", "██") } else { ("██", "  ") };
    let border = border as usize;
    let edge = symbol.dimension() + 2 * border;
    let mut result = String::with_capacity(edge * (edge * 6 + 1));
    for y in 0..edge {
        for x in 0..edge {
            let isdark = y >= border && x >= border && symbol.is_dark(y - border, x - border);
            result += if isdark { dark } else { light };
        }
        result.push('\n');
    }
    result
}

/// Returns a string of SVG code for an image depicting the symbol, with the
/// given number of border modules. The string always uses Unix newlines.
pub fn to_svg_string(symbol: &Symbol, border: u32) -> String {
    let border = border as usize;
    let dimension = symbol.dimension() + 2 * border;
    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"0 0 {0} {0}\" stroke=\"none\">\n",
        dimension
    );
    result += "\t<rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>\n";
    result += "\t<path d=\"";
    let mut first = true;
    for (y, row) in symbol.rows().enumerate() {
        for (x, &isdark) in row.iter().enumerate() {
            if isdark {
                if !first {
                    result += " ";
                }
                first = false;
                result += &format!("M{},{}h1v1h-1z", x + border, y + border);
            }
        }
    }
    result += "\" fill=\"#000000\"/>\n";
    result += "</svg>\n";
    result
}

/// Renders the symbol into an RGBA image buffer.
///
/// A positive `size` is the requested edge in pixels. Every module gets
/// `size / modules` pixels (at least one, so the image grows to one pixel per
/// module when `size` is smaller), the drawing is centred, and the leftover
/// margin takes the background colour. A negative `size` means `-size` pixels
/// per module.
///
/// # Errors
///
/// [`RenderError::InvalidSize`] for a zero size, or one that would make the
/// image edge larger than [`MAX_IMAGE_EDGE`].
pub fn to_image(symbol: &Symbol, size: i32, options: &RenderOptions) -> Result<RgbaImage, RenderError> {
    let real = symbol.dimension() as u32 + 2 * options.border;
    let (edge, module_px) = match size {
        0 => return Err(RenderError::InvalidSize(size)),
        s if s < 0 => {
            let px = s.unsigned_abs();
            (real.checked_mul(px), px)
        }
        s => {
            let edge = (s as u32).max(real);
            (Some(edge), edge / real)
        }
    };
    let edge = edge
        .filter(|&e| e <= MAX_IMAGE_EDGE)
        .ok_or(RenderError::InvalidSize(size))?;
    let offset = (edge - real * module_px) / 2;
    let border = options.border;
    let foreground = Rgba(options.foreground);

    let mut img = RgbaImage::from_pixel(edge, edge, Rgba(options.background));
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let module = |p: u32| {
            p.checked_sub(offset)
                .map(|p| p / module_px)
                .and_then(|m| m.checked_sub(border))
        };
        if let (Some(col), Some(row)) = (module(x), module(y)) {
            if symbol.is_dark(row as usize, col as usize) {
                *pixel = foreground;
            }
        }
    }
    debug!(edge, module_px, offset, "rendered image");
    Ok(img)
}

/// Encodes an image buffer as PNG bytes.
pub(crate) fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// Renders the symbol as in [`to_image`] and returns PNG bytes.
pub fn to_png(symbol: &Symbol, size: i32, options: &RenderOptions) -> Result<Vec<u8>, RenderError> {
    encode_png(&to_image(symbol, size, options)?)
}

/// Renders the symbol and writes it as a PNG file, creating the parent
/// directory if it does not exist yet.
///
/// # Example
///
/// ```rust
/// use qrsmith::{encode_text, helper, RecoveryLevel, RenderOptions};
///
/// let dir = std::env::temp_dir().join("qrsmith-doc");
/// let symbol = encode_text("Hello, World!", RecoveryLevel::Low).unwrap();
/// helper::save_png(&symbol, dir.join("qr_code.png"), 256, &RenderOptions::default()).unwrap();
/// ```
pub fn save_png<P: AsRef<Path>>(
    symbol: &Symbol,
    path: P,
    size: i32,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, to_png(symbol, size, options)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qrcode::{encode_text, RecoveryLevel};

    fn hello() -> Symbol {
        encode_text("HELLO WORLD", RecoveryLevel::Medium).unwrap()
    }

    #[test]
    fn test_text_art_layout() {
        let qr = hello();
        let art = to_text_art(&qr, false, 2);
        let lines: Vec<&str> = art.lines().collect();
        assert_eq!(lines.len(), 25);
        assert!(lines.iter().all(|l| l.chars().count() == 50));
        // Row 2 is the top edge of the top-left finder.
        assert!(lines[2].starts_with("    ██████████████  "));
        assert_eq!(lines[0], " ".repeat(50));

        let inverse = to_text_art(&qr, true, 2);
        assert_eq!(inverse.lines().next().unwrap(), "█".repeat(50));
    }

    #[test]
    fn test_to_svg_string() {
        let qr = hello();
        let svg = to_svg_string(&qr, 4);
        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(svg.contains("viewBox=\"0 0 29 29\""));
        assert!(svg.contains("<path d=\"M4,4h1v1h-1z M5,4h1v1h-1z"));
        let dark = qr.rows().flatten().filter(|&&d| d).count();
        assert_eq!(svg.matches("h1v1h-1z").count(), dark);
    }

    #[test]
    fn test_image_is_centred_with_whole_pixels_per_module() {
        let qr = hello();
        let img = to_image(&qr, 256, &RenderOptions::default()).unwrap();
        assert_eq!(img.dimensions(), (256, 256));
        // 29 modules at 8 px = 232 px, 12 px margin each side.
        let black = Rgba([0, 0, 0, 255]);
        let white = Rgba([255, 255, 255, 255]);
        assert_eq!(*img.get_pixel(0, 0), white);
        assert_eq!(*img.get_pixel(43, 44), white);
        assert_eq!(*img.get_pixel(44, 44), black);
        assert_eq!(*img.get_pixel(44 + 55, 44 + 55), black);
        // The light ring inside the finder.
        assert_eq!(*img.get_pixel(44 + 8, 44 + 8), white);
    }

    #[test]
    fn test_image_size_modes() {
        let qr = hello();
        let opts = RenderOptions::default();
        assert_eq!(to_image(&qr, -3, &opts).unwrap().dimensions(), (87, 87));
        assert_eq!(to_image(&qr, 10, &opts).unwrap().dimensions(), (29, 29));
        let bare = to_image(&qr, -1, &RenderOptions::without_border()).unwrap();
        assert_eq!(bare.dimensions(), (21, 21));
        assert!(matches!(to_image(&qr, 0, &opts), Err(RenderError::InvalidSize(0))));
        assert!(matches!(
            to_image(&qr, -5000, &opts),
            Err(RenderError::InvalidSize(-5000))
        ));
    }

    #[test]
    fn test_inverted_colours() {
        let qr = hello();
        let img = to_image(&qr, -1, &RenderOptions::default().inverted()).unwrap();
        assert_eq!(*img.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*img.get_pixel(4, 4), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_png_and_save() {
        let qr = hello();
        let png = to_png(&qr, 128, &RenderOptions::default()).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("qr.png");
        save_png(&qr, &path, 128, &RenderOptions::default()).unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (128, 128));
    }
}
