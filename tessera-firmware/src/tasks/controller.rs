//! Main controller task
//!
//! Owns the flush engine, the panel and every renderer. Waits on either a
//! parsed host command or a tick, runs it, and flushes whatever became
//! dirty. Rendering and command handling live in one task so nothing else
//! needs access to the engine or the bus.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI1;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::{Delay, Instant, Timer};

use tessera_core::{AnimationPlayer, ClockFace, DemoCycle, Draw, SnakeGame, UiState};
use tessera_drivers::st7789::St7789;
use tessera_gfx::{BufferMode, FlushEngine, Rgb565};
use tessera_protocol::{Command, Mode, Response, StatusReport};

use crate::anim::PULSE;
use crate::board;
use crate::channels::{Reply, COMMAND_CHANNEL, RESPONSE_CHANNEL};
use crate::tasks::tick::TICK_SIGNAL;

/// Concrete panel type: blocking SPI1 plus the three control pins
pub type Panel =
    St7789<Spi<'static, SPI1, Blocking>, Output<'static>, Output<'static>, Output<'static>>;

/// Everything the control loop owns
struct Controller {
    engine: FlushEngine,
    panel: Panel,
    backlight: Pwm<'static>,
    pwm_config: PwmConfig,
    /// Last level set by the host; restored on wake
    brightness: u8,
    ui: UiState,
    clock: ClockFace,
    demo: DemoCycle,
    player: AnimationPlayer,
    snake: Option<SnakeGame>,
}

/// Controller task - executes commands and drives the active renderer
#[embassy_executor::task]
pub async fn controller_task(panel: Panel, backlight: Pwm<'static>) {
    info!("Controller task started");

    let mut engine = FlushEngine::new(board::DISPLAY_WIDTH, board::DISPLAY_HEIGHT);
    match engine.begin_buffering(BufferMode::Single) {
        Ok(_) => info!("Frame surface ready, {} bytes", engine.get_memory_usage()),
        Err(e) => error!("Frame surface allocation failed: {:?}", e),
    }

    let mut pwm_config = PwmConfig::default();
    pwm_config.top = board::BACKLIGHT_PWM_TOP;
    pwm_config.compare_b = 0;

    let mut ctrl = Controller {
        engine,
        panel,
        backlight,
        pwm_config,
        brightness: board::DEFAULT_BRIGHTNESS,
        ui: UiState::new(Mode::Demo),
        clock: ClockFace::new(),
        demo: DemoCycle::new(),
        player: AnimationPlayer::new(),
        snake: None,
    };

    // First frame goes to the glass before the light comes on
    let now_ms = uptime_ms();
    ctrl.demo.show(&mut ctrl.engine, now_ms);
    ctrl.flush_immediate();
    ctrl.apply_backlight(ctrl.brightness);

    loop {
        match select(COMMAND_CHANNEL.receive(), TICK_SIGNAL.wait()).await {
            Either::First(cmd) => ctrl.run_command(cmd).await,
            Either::Second(now_ms) => ctrl.tick(now_ms),
        }
    }
}

impl Controller {
    async fn run_command(&mut self, cmd: Command) {
        let now_ms = uptime_ms();
        match cmd {
            Command::Text(text) => {
                self.engine.clear(Rgb565::BLACK);
                let y = (self.engine.height() / 2) as i16;
                self.engine.draw_text_centered(y, text.as_str(), Rgb565::WHITE, 2);
                self.flush();
                reply(Response::TextDisplayed).await;
            }
            Command::Brightness(level) => {
                self.set_brightness(level);
                reply(Response::BrightnessSet(level)).await;
            }
            Command::Clear => {
                self.engine.clear(Rgb565::BLACK);
                self.flush();
                reply(Response::ScreenCleared).await;
            }
            Command::Mode(mode) => {
                self.enter_mode(mode, now_ms);
                reply(Response::ModeSet(mode)).await;
            }
            Command::SetTime {
                hour,
                minute,
                second,
            } => {
                self.clock.set_time(hour, minute, second, now_ms);
                self.show_clock_if_active(now_ms);
                reply(Response::TimeSet).await;
            }
            Command::SetEpoch(epoch) => {
                self.clock.set_epoch(epoch, now_ms);
                self.show_clock_if_active(now_ms);
                reply(Response::TimeSet).await;
            }
            Command::Status => {
                RESPONSE_CHANNEL.send(Reply::Status(self.status())).await;
            }
            Command::Sleep => {
                self.sleep();
                reply(Response::Sleeping).await;
            }
            Command::Wakeup => {
                self.wake();
                reply(Response::Awake).await;
            }
            Command::Restart => {
                reply(Response::Restarting).await;
                // Let the reply drain out of the UART before the core resets
                Timer::after_millis(1000).await;
                info!("Restarting");
                cortex_m::peripheral::SCB::sys_reset();
            }
        }
    }

    /// Advance whichever renderer the current mode runs
    fn tick(&mut self, now_ms: u32) {
        if !self.ui.ticks_enabled() {
            return;
        }
        let drew = match self.ui.get_mode() {
            Mode::Manual => false,
            Mode::Demo => self.demo.tick(&mut self.engine, now_ms),
            Mode::Clock => self.clock.tick(&mut self.engine, now_ms),
            Mode::Custom => self.player.tick(&mut self.engine, now_ms),
            Mode::Game => match self.snake.as_mut() {
                Some(snake) => snake.tick(&mut self.engine, now_ms),
                None => false,
            },
        };
        if drew {
            self.flush();
        }
    }

    /// Switch mode, reset the new mode's renderer and repaint the panel
    fn enter_mode(&mut self, mode: Mode, now_ms: u32) {
        let previous = self.ui.set_mode(mode);
        if previous == Mode::Custom && mode != Mode::Custom {
            self.player.stop();
        }
        if previous == Mode::Game && mode != Mode::Game {
            self.snake = None;
        }

        self.engine.clear(Rgb565::BLACK);
        match mode {
            Mode::Manual => {}
            Mode::Demo => {
                self.demo = DemoCycle::new();
                self.demo.show(&mut self.engine, now_ms);
            }
            Mode::Clock => self.clock.show(&mut self.engine, now_ms),
            Mode::Custom => {
                self.player.play(&mut self.engine, &PULSE, now_ms);
            }
            Mode::Game => {
                let seed = Instant::now().as_ticks() as u32;
                let mut snake =
                    SnakeGame::new(self.engine.width(), self.engine.height(), seed);
                snake.reset(&mut self.engine, now_ms);
                self.snake = Some(snake);
            }
        }
        self.flush_immediate();
        info!("Mode changed: {:?}", mode);
    }

    /// Redraw the clock face right away when it owns the screen
    fn show_clock_if_active(&mut self, now_ms: u32) {
        if self.ui.get_mode() == Mode::Clock {
            self.clock.show(&mut self.engine, now_ms);
            self.flush();
        }
    }

    /// Backlight off, panel into minimum-power sleep
    fn sleep(&mut self) {
        if !self.ui.sleep() {
            return;
        }
        self.apply_backlight(0);
        if let Err(e) = self.panel.sleep_in(&mut Delay) {
            warn!("Panel sleep failed: {:?}", e);
        }
        info!("Panel sleeping");
    }

    /// Wake the panel, repaint it, then restore the backlight
    ///
    /// The buffer may have changed while asleep (commands still execute),
    /// so the whole surface is retransmitted before the light comes back.
    fn wake(&mut self) {
        if !self.ui.wake() {
            return;
        }
        if let Err(e) = self.panel.sleep_out(&mut Delay) {
            warn!("Panel wake failed: {:?}", e);
        }
        self.flush_immediate();
        self.apply_backlight(self.brightness);
        info!("Panel awake");
    }

    /// Store the host's level; applied immediately unless asleep
    fn set_brightness(&mut self, level: u8) {
        self.brightness = level;
        if !self.ui.is_sleeping() {
            self.apply_backlight(level);
        }
    }

    fn apply_backlight(&mut self, level: u8) {
        self.pwm_config.compare_b = level as u16;
        self.backlight.set_config(&self.pwm_config);
    }

    /// Push dirty regions to the glass; transfer errors are logged, not
    /// retried. Skipped while asleep: wake retransmits everything.
    fn flush(&mut self) {
        if self.ui.is_sleeping() {
            return;
        }
        if let Err(e) = self.engine.flush(&mut self.panel) {
            warn!("Flush failed: {:?}", e);
        }
    }

    fn flush_immediate(&mut self) {
        if self.ui.is_sleeping() {
            return;
        }
        if let Err(e) = self.engine.flush_immediate(&mut self.panel) {
            warn!("Full flush failed: {:?}", e);
        }
    }

    fn status(&self) -> StatusReport {
        StatusReport {
            mode: self.ui.get_mode(),
            uptime_secs: Instant::now().as_secs() as u32,
            free_heap: crate::HEAP.free() as u32,
            flush_count: self.engine.get_flush_count(),
            last_flush_micros: self.engine.get_last_flush_micros(),
        }
    }
}

async fn reply(resp: Response) {
    RESPONSE_CHANNEL.send(Reply::Line(resp)).await;
}

/// Milliseconds since boot; the tick task shares this time base
fn uptime_ms() -> u32 {
    Instant::now().as_millis() as u32
}
