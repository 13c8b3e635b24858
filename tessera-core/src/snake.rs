//! Self-playing snake
//!
//! Runs on an 8-pixel cell grid with a one-cell stats bar across the top.
//! The solver is greedy: head toward the food axis by axis, fall back to the
//! current heading or a turn when that would collide, and reverse only when
//! nothing else is left. After a collision the board redraws from scratch
//! once the restart delay passes.
//!
//! Only changed cells are redrawn each step, so a flush transfers a handful
//! of small regions instead of the whole frame.

use core::fmt::Write;

use heapless::{String, Vec};
use tessera_gfx::{FlushEngine, Rgb565};

use crate::draw::Draw;

/// Cell edge length in pixels
pub const CELL_SIZE: u16 = 8;
/// Milliseconds between movement steps
pub const STEP_MS: u32 = 150;
/// Delay before the board resets after a collision
pub const RESTART_DELAY_MS: u32 = 1500;
/// Body capacity in cells
pub const MAX_SNAKE_LEN: usize = 100;
/// Body length after a reset
pub const INITIAL_SNAKE_LEN: usize = 6;

const SCORE_PER_FOOD: u32 = 10;

/// Grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cell {
    pub x: i16,
    pub y: i16,
}

/// xorshift32; never seeded with zero
struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

/// The game board, solver and timers
pub struct SnakeGame {
    grid_w: i16,
    grid_h: i16,
    body: Vec<Cell, MAX_SNAKE_LEN>,
    direction: Cell,
    food: Cell,
    score: u32,
    game_over: bool,
    restart_at_ms: u32,
    last_step_ms: u32,
    rng: XorShift32,
}

impl SnakeGame {
    /// New game for a screen of the given pixel size
    ///
    /// Starts in the game-over state with an expired restart deadline, so
    /// the first tick lays out the board.
    pub fn new(width: u16, height: u16, seed: u32) -> Self {
        Self {
            grid_w: (width / CELL_SIZE) as i16,
            grid_h: (height / CELL_SIZE) as i16,
            body: Vec::new(),
            direction: Cell { x: 1, y: 0 },
            food: Cell { x: 0, y: 0 },
            score: 0,
            game_over: true,
            restart_at_ms: 0,
            last_step_ms: 0,
            rng: XorShift32::new(seed),
        }
    }

    pub fn get_score(&self) -> u32 {
        self.score
    }

    pub fn get_length(&self) -> usize {
        self.body.len()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn get_head(&self) -> Option<Cell> {
        self.body.first().copied()
    }

    pub fn get_food(&self) -> Cell {
        self.food
    }

    /// Lay out a fresh board: body centered heading right, new food, stats
    ///
    /// Draws the whole screen; the caller flushes.
    pub fn reset(&mut self, engine: &mut FlushEngine, now_ms: u32) {
        self.body.clear();
        self.score = 0;
        self.game_over = false;

        engine.clear(Rgb565::BLACK);

        let start_x = self.grid_w / 2 + (INITIAL_SNAKE_LEN / 2) as i16;
        let start_y = self.grid_h / 2;
        for i in 0..INITIAL_SNAKE_LEN as i16 {
            let cell = Cell {
                x: start_x - i,
                y: start_y,
            };
            let _ = self.body.push(cell);
            self.draw_cell(engine, cell, Rgb565::RED);
        }
        self.direction = Cell { x: 1, y: 0 };

        self.spawn_food();
        self.draw_cell(engine, self.food, Rgb565::BLUE);
        self.draw_stats(engine);

        self.last_step_ms = now_ms;
    }

    /// Advance the game once the step interval has elapsed
    ///
    /// Returns true when anything was drawn and needs a flush.
    pub fn tick(&mut self, engine: &mut FlushEngine, now_ms: u32) -> bool {
        if self.game_over {
            if now_ms.wrapping_sub(self.restart_at_ms) < u32::MAX / 2 {
                self.reset(engine, now_ms);
                return true;
            }
            return false;
        }
        if now_ms.wrapping_sub(self.last_step_ms) < STEP_MS {
            return false;
        }
        self.last_step_ms = now_ms;

        if !self.choose_direction() {
            self.fail(engine, "GAME OVER!", now_ms);
            return true;
        }

        let next = self.next_head(self.direction);
        let grows = next == self.food;

        if self.body.is_full() || !grows {
            let tail = self.body.pop();
            if let Some(tail) = tail {
                if !grows {
                    self.draw_cell(engine, tail, Rgb565::BLACK);
                }
            }
        }
        let _ = self.body.insert(0, next);
        self.draw_cell(engine, next, Rgb565::RED);

        if self.body[1..].contains(&next) {
            self.fail(engine, "SELF HIT!", now_ms);
            return true;
        }

        if grows {
            self.score += SCORE_PER_FOOD;
            self.draw_stats(engine);
            self.spawn_food();
            self.draw_cell(engine, self.food, Rgb565::BLUE);
        } else {
            // keep the food visible if something drew over it
            self.draw_cell(engine, self.food, Rgb565::BLUE);
        }
        true
    }

    fn fail(&mut self, engine: &mut FlushEngine, message: &str, now_ms: u32) {
        self.game_over = true;
        self.restart_at_ms = now_ms.wrapping_add(RESTART_DELAY_MS);
        let y = (engine.height() / 2) as i16;
        engine.draw_text_centered(y, message, Rgb565::RED, 2);
    }

    fn next_head(&self, dir: Cell) -> Cell {
        let head = self.body[0];
        self.wrap(head.x + dir.x, head.y + dir.y)
    }

    fn wrap(&self, mut x: i16, mut y: i16) -> Cell {
        if x < 0 {
            x += self.grid_w;
        }
        if x >= self.grid_w {
            x -= self.grid_w;
        }
        if y < 0 {
            y += self.grid_h;
        }
        if y >= self.grid_h {
            y -= self.grid_h;
        }
        Cell { x, y }
    }

    fn is_reverse(&self, dir: Cell) -> bool {
        if self.body.len() < 2 {
            return false;
        }
        self.next_head(dir) == self.body[1]
    }

    fn would_collide(&self, dir: Cell) -> bool {
        let next = self.next_head(dir);
        let grows = next == self.food;
        // the tail cell vacates unless the snake grows into it
        let limit = if grows {
            self.body.len()
        } else {
            self.body.len().saturating_sub(1)
        };
        self.body[..limit].contains(&next)
    }

    /// Pick the next heading; food-seeking first, reverse as last resort
    ///
    /// The second pass accepts a colliding candidate so the snake visibly
    /// runs into itself instead of freezing.
    fn choose_direction(&mut self) -> bool {
        let head = self.body[0];
        let mut candidates: Vec<Cell, 6> = Vec::new();

        if head.x != self.food.x {
            let step = if self.food.x > head.x { 1 } else { -1 };
            let _ = candidates.push(Cell { x: step, y: 0 });
        }
        if head.y != self.food.y {
            let step = if self.food.y > head.y { 1 } else { -1 };
            let _ = candidates.push(Cell { x: 0, y: step });
        }
        let _ = candidates.push(self.direction);
        let _ = candidates.push(Cell {
            x: self.direction.y,
            y: -self.direction.x,
        });
        let _ = candidates.push(Cell {
            x: -self.direction.y,
            y: self.direction.x,
        });
        let _ = candidates.push(Cell {
            x: -self.direction.x,
            y: -self.direction.y,
        });

        for candidate in candidates.iter().copied() {
            if candidate.x == 0 && candidate.y == 0 {
                continue;
            }
            if self.is_reverse(candidate) || self.would_collide(candidate) {
                continue;
            }
            self.direction = candidate;
            return true;
        }

        for candidate in candidates.iter().copied() {
            if candidate.x == 0 && candidate.y == 0 {
                continue;
            }
            if self.is_reverse(candidate) {
                continue;
            }
            self.direction = candidate;
            return true;
        }

        false
    }

    fn spawn_food(&mut self) {
        let mut attempts = 0;
        loop {
            let candidate = Cell {
                x: (self.rng.next() % self.grid_w as u32) as i16,
                y: (self.rng.next() % self.grid_h as u32) as i16,
            };
            if !self.body.contains(&candidate) {
                self.food = candidate;
                return;
            }
            attempts += 1;
            if attempts > MAX_SNAKE_LEN * 2 {
                // board nearly full; leave the food where it is
                return;
            }
        }
    }

    fn draw_cell(&self, engine: &mut FlushEngine, cell: Cell, color: Rgb565) {
        engine.fill_rect(
            cell.x * CELL_SIZE as i16,
            cell.y * CELL_SIZE as i16,
            CELL_SIZE,
            CELL_SIZE,
            color,
        );
    }

    fn draw_stats(&self, engine: &mut FlushEngine) {
        let mut line: String<32> = String::new();
        let _ = write!(line, "Len:{} Score:{}", self.body.len(), self.score);
        engine.fill_rect(0, 0, engine.width(), CELL_SIZE, Rgb565::BLACK);
        engine.draw_text_clipped(2, 1, &line, Rgb565::YELLOW, 1);
    }
}
