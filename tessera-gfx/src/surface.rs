//! In-memory pixel surfaces
//!
//! A surface is one display-sized RGB565 image with primitive write
//! operations. Every mutating operation returns the rectangle it actually
//! modified after clipping, so the caller can feed dirty tracking; a write
//! that lands entirely off the surface returns `Rect::EMPTY` and touches
//! nothing. Out-of-bounds access is never an error here.
//!
//! The backing store is heap-allocated fallibly: a full 240x240 surface is
//! 112.5 KiB, and on a small controller the second one of a double-buffered
//! pair is exactly the allocation that may not fit.

use alloc::vec::Vec;

use crate::color::Rgb565;
use crate::rect::Rect;

/// The backing pixel store could not be allocated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AllocError;

/// A display-sized rectangular array of RGB565 pixels
#[derive(Debug)]
pub struct PixelSurface {
    width: u16,
    height: u16,
    pixels: Vec<Rgb565>,
}

impl PixelSurface {
    /// Allocate a surface of the given size, cleared to black
    ///
    /// Fails cleanly if the allocator cannot provide `width * height`
    /// pixels; the caller decides whether that is fatal or a degrade.
    pub fn new(width: u16, height: u16) -> Result<Self, AllocError> {
        let count = width as usize * height as usize;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(count).map_err(|_| AllocError)?;
        pixels.resize(count, Rgb565::BLACK);

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Total pixel count
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Backing store size in bytes
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * core::mem::size_of::<Rgb565>()
    }

    /// The full-surface rectangle
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Read one pixel, `None` if out of bounds
    pub fn get_pixel(&self, x: i16, y: i16) -> Option<Rgb565> {
        if x < 0 || y < 0 || x as u16 >= self.width || y as u16 >= self.height {
            return None;
        }
        Some(self.pixels[self.index(x as u16, y as u16)])
    }

    /// The whole pixel array, row-major
    pub fn pixels(&self) -> &[Rgb565] {
        &self.pixels
    }

    /// One full row, for row-at-a-time streaming
    ///
    /// # Panics
    /// Panics if `y` is outside the surface; flush code only asks for rows
    /// of rectangles already clipped to the surface.
    pub fn row(&self, y: u16) -> &[Rgb565] {
        let start = y as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }

    /// Write one pixel; no-op outside the surface
    pub fn set_pixel(&mut self, x: i16, y: i16, color: Rgb565) -> Rect {
        if x < 0 || y < 0 || x as u16 >= self.width || y as u16 >= self.height {
            return Rect::EMPTY;
        }
        let idx = self.index(x as u16, y as u16);
        self.pixels[idx] = color;
        Rect::new(x, y, 1, 1)
    }

    /// Fill a rectangle with one color, clipped to the surface
    pub fn fill_rect(&mut self, x: i16, y: i16, w: u16, h: u16, color: Rgb565) -> Rect {
        let clipped = Rect::new(x, y, w, h).clipped(self.width, self.height);
        if clipped.is_empty() {
            return clipped;
        }

        let width = self.width as usize;
        let x0 = clipped.x as usize;
        for row in clipped.y as usize..clipped.y as usize + clipped.h as usize {
            let start = row * width + x0;
            self.pixels[start..start + clipped.w as usize].fill(color);
        }
        clipped
    }

    /// Copy a row-major pixel block into the surface at (x, y)
    ///
    /// `src` holds the full `w * h` block; when the origin is negative the
    /// leading source rows/columns are skipped so the visible part stays
    /// aligned. The source stride is always the unclipped `w`. A source
    /// shorter than `w * h` is ignored entirely.
    pub fn blit_rect(&mut self, x: i16, y: i16, w: u16, h: u16, src: &[Rgb565]) -> Rect {
        if src.len() < w as usize * h as usize {
            return Rect::EMPTY;
        }
        let clipped = Rect::new(x, y, w, h).clipped(self.width, self.height);
        if clipped.is_empty() {
            return clipped;
        }

        let skip_x = (clipped.x as i32 - x as i32) as usize;
        let skip_y = (clipped.y as i32 - y as i32) as usize;
        let stride = w as usize;
        let width = self.width as usize;
        let run = clipped.w as usize;

        for j in 0..clipped.h as usize {
            let src_start = (skip_y + j) * stride + skip_x;
            let dst_start = (clipped.y as usize + j) * width + clipped.x as usize;
            self.pixels[dst_start..dst_start + run]
                .copy_from_slice(&src[src_start..src_start + run]);
        }
        clipped
    }

    /// Nearest-neighbor scaled copy of a `src_w * src_h` block into a
    /// `dest_w * dest_h` rectangle at (x, y)
    ///
    /// Destination pixels off the surface are skipped individually, so a
    /// partially off-screen placement still draws its visible part. Returns
    /// the destination rectangle clipped to the surface.
    #[allow(clippy::too_many_arguments)]
    pub fn blit_rect_scaled(
        &mut self,
        x: i16,
        y: i16,
        dest_w: u16,
        dest_h: u16,
        src: &[Rgb565],
        src_w: u16,
        src_h: u16,
    ) -> Rect {
        if dest_w == 0 || dest_h == 0 || src_w == 0 || src_h == 0 {
            return Rect::EMPTY;
        }
        if src.len() < src_w as usize * src_h as usize {
            return Rect::EMPTY;
        }
        let clipped = Rect::new(x, y, dest_w, dest_h).clipped(self.width, self.height);
        if clipped.is_empty() {
            return clipped;
        }

        let width = self.width as usize;
        for j in 0..dest_h as i32 {
            let dy = y as i32 + j;
            if dy < 0 || dy >= self.height as i32 {
                continue;
            }
            let src_y = (j as u32 * src_h as u32 / dest_h as u32) as usize;
            let src_row = &src[src_y * src_w as usize..(src_y + 1) * src_w as usize];
            let row_start = dy as usize * width;

            for i in 0..dest_w as i32 {
                let dx = x as i32 + i;
                if dx < 0 || dx >= self.width as i32 {
                    continue;
                }
                let src_x = (i as u32 * src_w as u32 / dest_w as u32) as usize;
                self.pixels[row_start + dx as usize] = src_row[src_x];
            }
        }
        clipped
    }

    /// Replace the entire surface in one bulk copy
    ///
    /// A source shorter than the surface is ignored (no partial overwrite).
    pub fn full_overwrite(&mut self, src: &[Rgb565]) -> Rect {
        let count = self.pixels.len();
        if src.len() < count {
            return Rect::EMPTY;
        }
        self.pixels.copy_from_slice(&src[..count]);
        self.bounds()
    }

    /// Set every pixel to one color
    pub fn clear(&mut self, color: Rgb565) -> Rect {
        self.pixels.fill(color);
        self.bounds()
    }

    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn checker(w: u16, h: u16) -> Vec<Rgb565> {
        (0..w as usize * h as usize)
            .map(|i| Rgb565(i as u16))
            .collect()
    }

    #[test]
    fn test_set_pixel_in_bounds() {
        let mut s = PixelSurface::new(16, 16).unwrap();
        let r = s.set_pixel(3, 5, Rgb565::RED);
        assert_eq!(r, Rect::new(3, 5, 1, 1));
        assert_eq!(s.get_pixel(3, 5), Some(Rgb565::RED));
    }

    #[test]
    fn test_set_pixel_out_of_bounds() {
        let mut s = PixelSurface::new(16, 16).unwrap();
        assert!(s.set_pixel(-1, 0, Rgb565::RED).is_empty());
        assert!(s.set_pixel(0, 16, Rgb565::RED).is_empty());
        assert!(s.set_pixel(16, 0, Rgb565::RED).is_empty());
        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(s.get_pixel(x, y), Some(Rgb565::BLACK));
            }
        }
    }

    #[test]
    fn test_fill_rect_clips_negative_origin() {
        let mut s = PixelSurface::new(16, 16).unwrap();
        let r = s.fill_rect(-4, -4, 8, 8, Rgb565::GREEN);
        assert_eq!(r, Rect::new(0, 0, 4, 4));

        for y in 0..16 {
            for x in 0..16 {
                let expect = if x < 4 && y < 4 {
                    Rgb565::GREEN
                } else {
                    Rgb565::BLACK
                };
                assert_eq!(s.get_pixel(x, y), Some(expect), "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_fill_rect_fully_outside_is_noop() {
        let mut s = PixelSurface::new(16, 16).unwrap();
        assert!(s.fill_rect(16, 0, 4, 4, Rgb565::RED).is_empty());
        assert!(s.fill_rect(-8, 0, 8, 4, Rgb565::RED).is_empty());
        assert_eq!(s.get_pixel(0, 0), Some(Rgb565::BLACK));
    }

    #[test]
    fn test_blit_negative_origin_skips_source() {
        // 4x3 source placed at (-2, -1): only the bottom-right 2x2 of the
        // source is visible, and it must come from source rows 1..3,
        // columns 2..4 -- not from the start of the source array.
        let src = checker(4, 3);
        let mut s = PixelSurface::new(16, 16).unwrap();
        let r = s.blit_rect(-2, -1, 4, 3, &src);
        assert_eq!(r, Rect::new(0, 0, 2, 2));

        assert_eq!(s.get_pixel(0, 0), Some(src[4 + 2])); // row 1, col 2
        assert_eq!(s.get_pixel(1, 0), Some(src[4 + 3]));
        assert_eq!(s.get_pixel(0, 1), Some(src[8 + 2]));
        assert_eq!(s.get_pixel(1, 1), Some(src[8 + 3]));
        assert_eq!(s.get_pixel(2, 0), Some(Rgb565::BLACK));
        assert_eq!(s.get_pixel(0, 2), Some(Rgb565::BLACK));
    }

    #[test]
    fn test_blit_clips_far_edge() {
        let src = checker(4, 4);
        let mut s = PixelSurface::new(16, 16).unwrap();
        let r = s.blit_rect(14, 14, 4, 4, &src);
        assert_eq!(r, Rect::new(14, 14, 2, 2));

        assert_eq!(s.get_pixel(14, 14), Some(src[0]));
        assert_eq!(s.get_pixel(15, 15), Some(src[4 + 1]));
    }

    #[test]
    fn test_blit_short_source_is_noop() {
        let src = checker(4, 3);
        let mut s = PixelSurface::new(16, 16).unwrap();
        assert!(s.blit_rect(0, 0, 4, 4, &src).is_empty());
        assert_eq!(s.get_pixel(0, 0), Some(Rgb565::BLACK));
    }

    #[test]
    fn test_scaled_blit_quadrants() {
        // 2x2 scaled to 4x4: each source pixel fills a 2x2 quadrant
        let (a, b, c, d) = (Rgb565(1), Rgb565(2), Rgb565(3), Rgb565(4));
        let src = [a, b, c, d];
        let mut s = PixelSurface::new(16, 16).unwrap();
        let r = s.blit_rect_scaled(0, 0, 4, 4, &src, 2, 2);
        assert_eq!(r, Rect::new(0, 0, 4, 4));

        let expect = [
            [a, a, b, b],
            [a, a, b, b],
            [c, c, d, d],
            [c, c, d, d],
        ];
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(
                    s.get_pixel(x, y),
                    Some(expect[y as usize][x as usize]),
                    "pixel ({}, {})",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn test_scaled_blit_partially_offscreen() {
        let src = [Rgb565::RED, Rgb565::GREEN, Rgb565::BLUE, Rgb565::WHITE];
        let mut s = PixelSurface::new(16, 16).unwrap();
        let r = s.blit_rect_scaled(-2, -2, 4, 4, &src, 2, 2);
        // Only the bottom-right quadrant of the scaled image is visible
        assert_eq!(r, Rect::new(0, 0, 2, 2));
        assert_eq!(s.get_pixel(0, 0), Some(Rgb565::WHITE));
        assert_eq!(s.get_pixel(1, 1), Some(Rgb565::WHITE));
        assert_eq!(s.get_pixel(2, 0), Some(Rgb565::BLACK));
    }

    #[test]
    fn test_full_overwrite() {
        let src = checker(8, 8);
        let mut s = PixelSurface::new(8, 8).unwrap();
        let r = s.full_overwrite(&src);
        assert_eq!(r, Rect::new(0, 0, 8, 8));
        assert_eq!(s.get_pixel(7, 7), Some(src[63]));
    }

    #[test]
    fn test_full_overwrite_short_source_is_noop() {
        let src = checker(8, 7);
        let mut s = PixelSurface::new(8, 8).unwrap();
        assert!(s.full_overwrite(&src).is_empty());
        assert_eq!(s.get_pixel(0, 0), Some(Rgb565::BLACK));
    }

    #[test]
    fn test_clear() {
        let mut s = PixelSurface::new(8, 8).unwrap();
        let r = s.clear(Rgb565::CYAN);
        assert_eq!(r, Rect::new(0, 0, 8, 8));
        assert_eq!(s.get_pixel(0, 0), Some(Rgb565::CYAN));
        assert_eq!(s.get_pixel(7, 7), Some(Rgb565::CYAN));
    }

    proptest! {
        /// A fill mutates exactly the intersection of the request with the
        /// surface, and nothing outside it.
        #[test]
        fn prop_fill_rect_clips_exactly(
            x in -80i16..80,
            y in -80i16..80,
            w in 0u16..80,
            h in 0u16..80,
        ) {
            let mut s = PixelSurface::new(48, 48).unwrap();
            let reported = s.fill_rect(x, y, w, h, Rgb565::WHITE);
            let expected = Rect::new(x, y, w, h).clipped(48, 48);
            prop_assert_eq!(reported, expected);

            for py in 0..48i16 {
                for px in 0..48i16 {
                    let inside = expected.contains(px, py);
                    let color = s.get_pixel(px, py).unwrap();
                    prop_assert_eq!(color == Rgb565::WHITE, inside);
                }
            }
        }

        /// A blit lands source pixels exactly where the offset says, for
        /// any partial overlap.
        #[test]
        fn prop_blit_rect_alignment(
            x in -20i16..60,
            y in -20i16..60,
            w in 1u16..20,
            h in 1u16..20,
        ) {
            let src = checker(w, h);
            let mut s = PixelSurface::new(48, 48).unwrap();
            let reported = s.blit_rect(x, y, w, h, &src);
            let expected = Rect::new(x, y, w, h).clipped(48, 48);
            prop_assert_eq!(reported, expected);

            for py in 0..48i16 {
                for px in 0..48i16 {
                    let got = s.get_pixel(px, py).unwrap();
                    if expected.contains(px, py) {
                        let sx = (px - x) as usize;
                        let sy = (py - y) as usize;
                        prop_assert_eq!(got, src[sy * w as usize + sx]);
                    } else {
                        prop_assert_eq!(got, Rgb565::BLACK);
                    }
                }
            }
        }
    }
}
