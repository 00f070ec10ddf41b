// The live bitmap the drawing surface paints into.
// Pixels are egui colors so the front end can upload them without conversion.

use easel_core::Rgb;
use easel_store::{CodecError, DecodedImage, Snapshot};
use egui::Color32;
use tracing::{debug, info, trace, warn};

#[derive(Debug, Clone)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color32>,
    generation: u64,
}

/// egui color for a core RGB value.
pub fn color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.r, rgb.g, rgb.b)
}

/// Core RGB for an egui color, ignoring alpha.
pub fn rgb_of(color: Color32) -> Rgb {
    Rgb::new(color.r(), color.g(), color.b())
}

impl Canvas {
    /// Largest bitmap area the editor will allocate (256 MiB of pixels).
    pub const MAX_PIXELS: u64 = 1 << 26;

    /// Whether a `width` x `height` bitmap stays within [`Canvas::MAX_PIXELS`].
    pub fn fits(width: u32, height: u32) -> bool {
        width as u64 * height as u64 <= Self::MAX_PIXELS
    }

    pub fn new(width: u32, height: u32, background: Color32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        info!(width, height, ?background, "creating canvas");

        let total_pixels = width as usize * height as usize;
        let pixels = vec![background; total_pixels];
        trace!(total_pixels, "canvas created");

        Self {
            width,
            height,
            pixels,
            generation: 0,
        }
    }

    // Check if coordinates are within canvas bounds
    fn is_valid_coordinate(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    //convert 2d coordinates to 1d index
    fn coord_to_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    // Get the color of a pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color32> {
        if !self.is_valid_coordinate(x, y) {
            return None;
        }
        Some(self.pixels[self.coord_to_index(x, y)])
    }

    // Set the color of a pixel at (x, y)
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color32) -> bool {
        if !self.is_valid_coordinate(x, y) {
            return false;
        }

        let index = self.coord_to_index(x, y);
        self.pixels[index] = color;
        self.generation += 1;
        true
    }

    // Fill entire canvas with a color
    pub fn fill(&mut self, color: Color32) {
        info!(?color, "filling canvas");
        self.pixels.fill(color);
        self.generation += 1;
    }

    /// True if every pixel is `color`.
    pub fn is_solid(&self, color: Color32) -> bool {
        self.pixels.iter().all(|p| *p == color)
    }

    /// Bumped on every mutation; lets the front end skip texture uploads.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Row-major RGBA bytes.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| p.to_srgba_unmultiplied())
            .collect()
    }

    /// Encode the current pixels.
    pub fn snapshot(&self) -> Result<Snapshot, CodecError> {
        Snapshot::encode(self.width, self.height, &self.to_rgba())
    }

    /// Paint a decoded image over the whole canvas, stretching it to fit when
    /// the sizes differ (nearest neighbour).
    pub fn draw_scaled(&mut self, image: &DecodedImage) {
        if image.width == 0 || image.height == 0 {
            warn!("ignoring empty image");
            return;
        }

        if image.width != self.width || image.height != self.height {
            debug!(
                from_width = image.width,
                from_height = image.height,
                to_width = self.width,
                to_height = self.height,
                "scaling image onto canvas"
            );
        }

        for y in 0..self.height {
            let sy = (y as u64 * image.height as u64 / self.height as u64) as u32;
            for x in 0..self.width {
                let sx = (x as u64 * image.width as u64 / self.width as u64) as u32;
                let [r, g, b, a] = image.pixel(sx, sy);
                let index = self.coord_to_index(x, y);
                self.pixels[index] = Color32::from_rgba_unmultiplied(r, g, b, a);
            }
        }
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_is_rejected() {
        let mut canvas = Canvas::new(4, 4, Color32::WHITE);
        assert_eq!(canvas.get_pixel(4, 0), None);
        assert!(!canvas.set_pixel(0, 4, Color32::BLACK));
        assert!(canvas.is_solid(Color32::WHITE));
    }

    #[test]
    fn snapshot_roundtrip_restores_pixels() {
        let mut canvas = Canvas::new(6, 4, Color32::WHITE);
        canvas.set_pixel(2, 1, Color32::RED);
        let snap = canvas.snapshot().unwrap();

        let mut other = Canvas::new(6, 4, Color32::BLACK);
        other.draw_scaled(&snap.decode().unwrap());
        assert_eq!(other.pixels, canvas.pixels);
    }

    #[test]
    fn draw_scaled_stretches() {
        let mut small = Canvas::new(2, 1, Color32::WHITE);
        small.set_pixel(1, 0, Color32::BLUE);
        let image = small.snapshot().unwrap().decode().unwrap();

        let mut big = Canvas::new(4, 2, Color32::BLACK);
        big.draw_scaled(&image);
        assert_eq!(big.get_pixel(0, 1), Some(Color32::WHITE));
        assert_eq!(big.get_pixel(1, 0), Some(Color32::WHITE));
        assert_eq!(big.get_pixel(2, 0), Some(Color32::BLUE));
        assert_eq!(big.get_pixel(3, 1), Some(Color32::BLUE));
    }

    #[test]
    fn generation_tracks_mutation() {
        let mut canvas = Canvas::new(2, 2, Color32::WHITE);
        let g0 = canvas.generation();
        canvas.fill(Color32::BLACK);
        assert!(canvas.generation() > g0);
    }

    #[test]
    fn oversized_areas_do_not_fit() {
        assert!(Canvas::fits(8192, 8192));
        assert!(!Canvas::fits(70_000, 70_000));
        assert!(!Canvas::fits(u32::MAX, u32::MAX));
    }

    #[test]
    fn color_conversion() {
        let rgb = Rgb::new(0x11, 0x22, 0x33);
        assert_eq!(rgb_of(color32(rgb)), rgb);
    }
}
