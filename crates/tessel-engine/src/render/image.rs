use std::path::Path;

use rand::Rng;

use super::color::Rgba8;
use super::error::RenderError;

/// CPU-side RGBA8 raster, rows top to bottom with no padding.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl Image {
    /// Image filled with one color.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Image of uniformly random pixels, alpha included.
    pub fn noise(width: u32, height: u32, rng: &mut impl Rng) -> Self {
        let pixels = (0..width as usize * height as usize)
            .map(|_| Rgba8::from(rng.r#gen::<[u8; 4]>()))
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Decode any raster format the `image` crate understands into RGBA8.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RenderError::FileNotFound(path.to_path_buf()));
        }
        let decoded = image::open(path)
            .map_err(|source| RenderError::Image {
                path: path.to_path_buf(),
                source,
            })?
            .into_rgba8();
        let (width, height) = decoded.dimensions();
        let pixels = bytemuck::cast_slice::<u8, Rgba8>(decoded.as_raw()).to_vec();
        log::debug!("image loaded: {} ({width}x{height})", path.display());
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Encode to a file; the format follows the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        image::save_buffer(
            path,
            self.as_bytes(),
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|source| RenderError::Image {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row.
    pub fn pitch(&self) -> u32 {
        self.width * 4
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba8> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Writes one pixel; out-of-range coordinates are ignored.
    pub fn put(&mut self, x: u32, y: u32, color: Rgba8) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    pub fn clear(&mut self, color: Rgba8) {
        self.pixels.fill(color);
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn pitch_is_four_bytes_per_pixel() {
        let img = Image::filled(7, 3, Rgba8::RED);
        assert_eq!(img.pitch(), 28);
        assert_eq!(img.as_bytes().len(), 7 * 3 * 4);
        assert_eq!(&img.as_bytes()[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn put_and_get() {
        let mut img = Image::filled(4, 4, Rgba8::BLACK);
        img.put(2, 1, Rgba8::CYAN);
        img.put(9, 9, Rgba8::CYAN);
        assert_eq!(img.get(2, 1), Some(Rgba8::CYAN));
        assert_eq!(img.get(1, 2), Some(Rgba8::BLACK));
        assert_eq!(img.get(4, 0), None);
    }

    #[test]
    fn noise_is_seeded() {
        let a = Image::noise(8, 8, &mut rand::rngs::StdRng::seed_from_u64(3));
        let b = Image::noise(8, 8, &mut rand::rngs::StdRng::seed_from_u64(3));
        assert_eq!(a, b);
        assert!(a.pixels().iter().any(|p| *p != a.pixels()[0]));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = Image::from_file("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, RenderError::FileNotFound(_)));
    }

    #[test]
    fn png_round_trips_through_disk() {
        let path = std::env::temp_dir().join(format!("tessel-image-{}.png", std::process::id()));
        let mut img = Image::filled(3, 2, Rgba8::LIGHT_GRAY);
        img.put(0, 0, Rgba8::MAGENTA);
        img.save(&path).unwrap();
        let loaded = Image::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, img);
    }
}
