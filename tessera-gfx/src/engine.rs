//! The flush engine
//!
//! Owns the surfaces, routes writes into the active back surface, tracks
//! dirtiness, and converts dirty state into the minimal set of window
//! transfers on flush. Buffer mode can change at runtime; surfaces are
//! allocated and freed incrementally as the mode requires.
//!
//! Allocation policy: entering `Single` fails hard if the one required
//! surface cannot be allocated (the engine stays in its previous mode);
//! entering `Double` degrades to `Single` if only the second surface
//! fails. A byte budget can cap surface memory so the caller controls how
//! much of the heap the display may take.

use embassy_time::Instant;
use heapless::Vec;

use crate::color::Rgb565;
use crate::dirty::{DirtyTracker, MAX_DIRTY_REGIONS};
use crate::rect::Rect;
use crate::sink::PixelSink;
use crate::surface::PixelSurface;

/// Buffering strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BufferMode {
    /// No backing surface; the caller writes to the bus itself
    #[default]
    Direct,
    /// One surface plus dirty-region tracking
    Single,
    /// Two surfaces, swappable; draw into one while the other shows
    Double,
}

/// Result of a successful mode switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetModeOutcome {
    /// The requested mode is active
    Applied,
    /// `Double` was requested but only `Single` fit in memory
    Degraded,
}

/// Errors from buffer lifecycle operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineError {
    /// A required surface could not be allocated; the mode is unchanged
    AllocationFailed,
}

/// Pixel buffer and dirty-region flush engine for one display
#[derive(Debug)]
pub struct FlushEngine {
    width: u16,
    height: u16,
    mode: BufferMode,
    /// Drawn into; present in Single and Double modes
    back: Option<PixelSurface>,
    /// Conceptually displayed; present in Double mode only
    front: Option<PixelSurface>,
    dirty: DirtyTracker,
    /// Cap on total surface bytes; `None` leaves it to the allocator
    budget: Option<usize>,
    flush_count: u32,
    last_flush_micros: u32,
}

impl FlushEngine {
    /// Create an engine in `Direct` mode with no memory cap
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            mode: BufferMode::Direct,
            back: None,
            front: None,
            dirty: DirtyTracker::new(width, height),
            budget: None,
            flush_count: 0,
            last_flush_micros: 0,
        }
    }

    /// Create an engine whose surfaces may take at most `budget` bytes
    pub fn with_budget(width: u16, height: u16, budget: usize) -> Self {
        let mut engine = Self::new(width, height);
        engine.budget = Some(budget);
        engine
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn get_mode(&self) -> BufferMode {
        self.mode
    }

    /// Switch buffering strategy, allocating and freeing surfaces as needed
    ///
    /// Only the difference between the current and requested mode is
    /// (de)allocated: `Single` to `Double` adds one surface and keeps the
    /// drawn content, `Double` to `Single` drops the front surface.
    pub fn set_mode(&mut self, mode: BufferMode) -> Result<SetModeOutcome, EngineError> {
        if mode == self.mode {
            return Ok(SetModeOutcome::Applied);
        }

        match mode {
            BufferMode::Direct => {
                self.back = None;
                self.front = None;
                self.dirty.clear();
                self.mode = BufferMode::Direct;
                Ok(SetModeOutcome::Applied)
            }
            BufferMode::Single => {
                if self.back.is_none() {
                    // Failure leaves the engine exactly as it was
                    self.back = Some(self.alloc_surface()?);
                    self.dirty.mark_full();
                }
                self.front = None;
                self.mode = BufferMode::Single;
                Ok(SetModeOutcome::Applied)
            }
            BufferMode::Double => {
                if self.back.is_none() {
                    self.back = Some(self.alloc_surface()?);
                    self.dirty.mark_full();
                }
                match self.alloc_surface() {
                    Ok(front) => {
                        self.front = Some(front);
                        self.mode = BufferMode::Double;
                        Ok(SetModeOutcome::Applied)
                    }
                    Err(_) => {
                        // Second surface did not fit: run single-buffered
                        // with the back surface we already hold
                        self.mode = BufferMode::Single;
                        Ok(SetModeOutcome::Degraded)
                    }
                }
            }
        }
    }

    /// Enter buffered operation; same-mode calls are no-ops
    pub fn begin_buffering(&mut self, mode: BufferMode) -> Result<SetModeOutcome, EngineError> {
        self.set_mode(mode)
    }

    /// Leave buffered operation, freeing all surfaces
    pub fn end_buffering(&mut self) {
        self.back = None;
        self.front = None;
        self.dirty.clear();
        self.mode = BufferMode::Direct;
    }

    // ---- write operations -------------------------------------------------

    /// Write one pixel into the back surface
    pub fn set_pixel(&mut self, x: i16, y: i16, color: Rgb565) {
        if let Some(back) = self.back.as_mut() {
            let modified = back.set_pixel(x, y, color);
            self.dirty.mark(modified);
        }
    }

    /// Fill a rectangle in the back surface
    pub fn fill_rect(&mut self, x: i16, y: i16, w: u16, h: u16, color: Rgb565) {
        if let Some(back) = self.back.as_mut() {
            let modified = back.fill_rect(x, y, w, h, color);
            self.dirty.mark(modified);
        }
    }

    /// Blit a pixel block into the back surface
    pub fn blit_rect(&mut self, x: i16, y: i16, w: u16, h: u16, src: &[Rgb565]) {
        if let Some(back) = self.back.as_mut() {
            let modified = back.blit_rect(x, y, w, h, src);
            self.dirty.mark(modified);
        }
    }

    /// Blit a pixel block with nearest-neighbor scaling
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
    ) {
        if let Some(back) = self.back.as_mut() {
            let modified = back.blit_rect_scaled(x, y, dest_w, dest_h, src, src_w, src_h);
            self.dirty.mark(modified);
        }
    }

    /// Replace the whole back surface with a full frame
    pub fn full_overwrite(&mut self, src: &[Rgb565]) {
        if let Some(back) = self.back.as_mut() {
            if !back.full_overwrite(src).is_empty() {
                self.dirty.mark_full();
            }
        }
    }

    /// Clear to one color
    ///
    /// In `Double` mode both surfaces are cleared so stale frames cannot
    /// resurface on the next swap.
    pub fn clear(&mut self, color: Rgb565) {
        if let Some(front) = self.front.as_mut() {
            front.clear(color);
        }
        if let Some(back) = self.back.as_mut() {
            back.clear(color);
            self.dirty.mark_full();
        }
    }

    /// Read one pixel from the back surface
    pub fn get_pixel(&self, x: i16, y: i16) -> Option<Rgb565> {
        self.back.as_ref().and_then(|back| back.get_pixel(x, y))
    }

    // ---- dirty state ------------------------------------------------------

    /// Treat the whole surface as dirty, superseding tracked regions
    pub fn mark_full_dirty(&mut self) {
        if self.back.is_some() {
            self.dirty.mark_full();
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_dirty()
    }

    /// True if the next flush will be one full-surface transfer
    pub fn is_full_screen_dirty(&self) -> bool {
        self.dirty.is_full_screen()
    }

    /// Tracked rectangle count (0 while full-screen dirty)
    pub fn get_dirty_region_count(&self) -> usize {
        self.dirty.region_count()
    }

    // ---- flushing ---------------------------------------------------------

    /// Transfer all dirty pixels to the sink and reset to clean
    ///
    /// Full-screen dirt is one window and one pixel stream; otherwise each
    /// tracked region gets its own window, streamed row by row. Dirty state
    /// is cleared before the transfer outcome is known: a failed transfer
    /// is reported but not retried.
    pub fn flush<S: PixelSink>(&mut self, sink: &mut S) -> Result<(), S::Error> {
        let back = match self.back.as_ref() {
            Some(back) => back,
            None => return Ok(()),
        };
        if !self.dirty.is_dirty() {
            return Ok(());
        }

        let full_screen = self.dirty.is_full_screen();
        let regions: Vec<Rect, MAX_DIRTY_REGIONS> = self.dirty.regions().iter().copied().collect();
        self.dirty.clear();

        let started = Instant::now();

        if full_screen {
            sink.set_window(0, 0, self.width, self.height)?;
            sink.write_pixels(back.pixels())?;
        } else {
            for region in &regions {
                sink.set_window(region.x as u16, region.y as u16, region.w, region.h)?;
                for row in 0..region.h {
                    let y = region.y as u16 + row;
                    let x0 = region.x as usize;
                    sink.write_pixels(&back.row(y)[x0..x0 + region.w as usize])?;
                }
            }
        }

        self.flush_count += 1;
        self.last_flush_micros = started.elapsed().as_micros().min(u32::MAX as u64) as u32;
        Ok(())
    }

    /// Retransmit the whole surface regardless of tracked state
    pub fn flush_immediate<S: PixelSink>(&mut self, sink: &mut S) -> Result<(), S::Error> {
        self.mark_full_dirty();
        self.flush(sink)
    }

    /// Transfer one arbitrary rectangle of the back surface
    ///
    /// Bypasses dirty tracking entirely; tracked state is neither consulted
    /// nor cleared. The rectangle is clipped to the surface first.
    pub fn flush_region<S: PixelSink>(
        &mut self,
        sink: &mut S,
        x: i16,
        y: i16,
        w: u16,
        h: u16,
    ) -> Result<(), S::Error> {
        let back = match self.back.as_ref() {
            Some(back) => back,
            None => return Ok(()),
        };
        let region = Rect::new(x, y, w, h).clipped(self.width, self.height);
        if region.is_empty() {
            return Ok(());
        }

        sink.set_window(region.x as u16, region.y as u16, region.w, region.h)?;
        for row in 0..region.h {
            let row_y = region.y as u16 + row;
            let x0 = region.x as usize;
            sink.write_pixels(&back.row(row_y)[x0..x0 + region.w as usize])?;
        }
        Ok(())
    }

    /// Exchange front and back surfaces; no-op outside `Double` mode
    pub fn swap_buffers(&mut self) {
        if self.mode == BufferMode::Double {
            core::mem::swap(&mut self.back, &mut self.front);
        }
    }

    // ---- diagnostics ------------------------------------------------------

    /// Bytes currently held in surface storage
    pub fn get_memory_usage(&self) -> usize {
        let back = self.back.as_ref().map_or(0, PixelSurface::size_bytes);
        let front = self.front.as_ref().map_or(0, PixelSurface::size_bytes);
        back + front
    }

    /// Completed flush transfers since creation
    pub fn get_flush_count(&self) -> u32 {
        self.flush_count
    }

    /// Duration of the most recent completed flush, in microseconds
    pub fn get_last_flush_micros(&self) -> u32 {
        self.last_flush_micros
    }

    fn alloc_surface(&self) -> Result<PixelSurface, EngineError> {
        let needed = self.width as usize * self.height as usize * 2;
        if let Some(budget) = self.budget {
            if self.get_memory_usage() + needed > budget {
                return Err(EngineError::AllocationFailed);
            }
        }
        PixelSurface::new(self.width, self.height).map_err(|_| EngineError::AllocationFailed)
    }
}
