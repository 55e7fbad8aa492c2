//! Raw frame dumps: headerless RGB triples of a square image.

use crate::error::ScalingError;

use plotters::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    side: u32,
    pixels: Vec<u8>,
}

impl RawImage {
    pub fn side(&self) -> u32 {
        self.side
    }

    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let i = 3 * (y as usize * self.side as usize + x as usize);
        (self.pixels[i], self.pixels[i + 1], self.pixels[i + 2])
    }
}

/// Validate a dump and recover its side length.
pub fn decode(path: &Path, bytes: Vec<u8>) -> Result<RawImage, ScalingError> {
    let fail = |message: String| ScalingError::RawImage {
        path: path.to_path_buf(),
        message,
    };

    if bytes.is_empty() {
        return Err(fail("dump is empty".to_string()));
    }
    if bytes.len() % 3 != 0 {
        return Err(fail(format!(
            "{} bytes is not a whole number of RGB pixels",
            bytes.len()
        )));
    }

    let count = bytes.len() / 3;
    let side = integer_sqrt(count);
    if side * side != count {
        return Err(fail(format!("{} pixels do not form a square image", count)));
    }
    let side = u32::try_from(side).map_err(|_| fail(format!("side {} is too large", side)))?;

    Ok(RawImage {
        side,
        pixels: bytes,
    })
}

fn integer_sqrt(n: usize) -> usize {
    let mut r = (n as f64).sqrt() as usize;
    while r * r > n {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n {
        r += 1;
    }
    r
}

/// Write the image as PNG through the bitmap backend.
pub fn write_png(image: &RawImage, out: &Path) -> anyhow::Result<()> {
    let root = BitMapBackend::new(out, (image.side, image.side)).into_drawing_area();
    for y in 0..image.side {
        for x in 0..image.side {
            let (r, g, b) = image.pixel(x, y);
            root.draw_pixel((x as i32, y as i32), &RGBColor(r, g, b))
                .map_err(|e| anyhow::anyhow!("draw {}: {}", out.display(), e))?;
        }
    }
    root.present()
        .map_err(|e| anyhow::anyhow!("write {}: {}", out.display(), e))?;
    Ok(())
}

/// Convert one dump to `<stem>.png` next to it; remove the dump unless `keep`.
pub fn convert_file(path: &Path, keep: bool) -> anyhow::Result<PathBuf> {
    let bytes = std::fs::read(path).map_err(|e| ScalingError::io(path, e))?;
    let image = decode(path, bytes)?;
    let out = path.with_extension("png");
    write_png(&image, &out)?;
    tracing::info!(
        from = %path.display(),
        to = %out.display(),
        side = image.side(),
        "converted raw dump"
    );
    if !keep {
        std::fs::remove_file(path).map_err(|e| ScalingError::io(path, e))?;
    }
    Ok(out)
}
