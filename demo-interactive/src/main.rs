//! Interactive Pressure Fountain Demo
//!
//! A terminal field of squares floating on a toy pressure fluid. Moving the
//! mouse onto a square injects a burst of pressure into the grid cell under
//! it; the grid ticks on a background thread and every tick pushes the squares
//! around by the local velocity.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package demo-interactive -- --tick-ms 10 --pressure 500
//! ```
//!
//! # Keys
//!
//! - `q` / `Esc` - Quit
//! - `r` - Reset the grid and put every square back home
//! - `space` - Pause / resume ticking
//! - `s` - Toggle idle splashes
//!
//! Log output goes to `--log-file` (default `fountain-demo.log`), filtered by
//! `RUST_LOG`.

use clap::Parser;
use fountain_core::{
    DisplayConfig, FluidConfig, FluidError, FluidGrid, TickDriver, TickStats, Ticker, VisualGrid,
    DEFAULT_INJECTION_PRESSURE,
};
use rand::Rng;
use ratatui::buffer::Buffer;
use ratatui::crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind,
};
use ratatui::crossterm::execute;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use ratatui::{DefaultTerminal, Frame};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Terminal columns per square, so squares come out roughly square
const CELL_COLUMNS: i32 = 2;
const FRAME_INTERVAL: Duration = Duration::from_millis(33);
const IDLE_SPLASH_AFTER: Duration = Duration::from_secs(3);
const IDLE_SPLASH_EVERY: Duration = Duration::from_millis(700);

#[derive(Parser, Debug)]
#[command(name = "demo-interactive")]
#[command(about = "Hover over a field of squares to splash them with a toy pressure fluid")]
struct Cli {
    /// Fluid grid width in cells, border included
    #[arg(long, default_value_t = 40)]
    grid_width: usize,

    /// Fluid grid height in cells, border included
    #[arg(long, default_value_t = 40)]
    grid_height: usize,

    /// Squares per row
    #[arg(long, default_value_t = 40)]
    squares_x: usize,

    /// Squares per column
    #[arg(long, default_value_t = 40)]
    squares_y: usize,

    /// Milliseconds between ticks
    #[arg(long, default_value_t = 10)]
    tick_ms: u64,

    /// Pressure injected when the pointer enters a square
    #[arg(long, default_value_t = DEFAULT_INJECTION_PRESSURE, allow_negative_numbers = true)]
    pressure: f32,

    /// Splash a random square after a few seconds without input
    #[arg(long)]
    idle_splash: bool,

    /// Where tracing output is written
    #[arg(long, default_value = "fountain-demo.log")]
    log_file: PathBuf,
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Counters shown in the footer, sampled once per frame
struct Status {
    generation: u64,
    stats: TickStats,
    moved: usize,
}

struct App {
    driver: TickDriver,
    visual: Arc<Mutex<VisualGrid>>,
    display: DisplayConfig,
    ticker: Option<Ticker>,
    tick_interval: Duration,
    /// Squares moved by the most recent tick
    moved: Arc<AtomicUsize>,
    /// Terminal area the field was last drawn into
    field_area: Rect,
    last_hover: Option<(usize, usize)>,
    last_input: Instant,
    last_splash: Instant,
    idle_splash: bool,
}

impl App {
    fn new(
        driver: TickDriver,
        visual: VisualGrid,
        tick_interval: Duration,
        idle_splash: bool,
    ) -> Self {
        let now = Instant::now();
        Self {
            driver,
            display: *visual.config(),
            visual: Arc::new(Mutex::new(visual)),
            ticker: None,
            tick_interval,
            moved: Arc::new(AtomicUsize::new(0)),
            field_area: Rect::default(),
            last_hover: None,
            last_input: now,
            last_splash: now,
            idle_splash,
        }
    }

    fn lock_visual(&self) -> MutexGuard<'_, VisualGrid> {
        self.visual.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start_ticker(&mut self) {
        let visual = Arc::clone(&self.visual);
        let moved = Arc::clone(&self.moved);

        // Runs under the grid lock, so the layout lock is always taken second
        self.ticker = Some(self.driver.spawn(self.tick_interval, move |grid| {
            let mut visual = visual.lock().unwrap_or_else(PoisonError::into_inner);
            match visual.apply_velocities(grid) {
                Ok(count) => moved.store(count, Ordering::Relaxed),
                Err(err) => warn!("Displacement skipped: {}", err),
            }
        }));
    }

    fn toggle_pause(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
            info!("Paused");
        } else {
            self.start_ticker();
            info!("Resumed");
        }
    }

    fn reset(&mut self) -> Result<(), FluidError> {
        self.driver.with_grid_mut(FluidGrid::reset)?;
        self.lock_visual().reset();
        self.moved.store(0, Ordering::Relaxed);
        self.last_hover = None;
        info!("Field reset");
        Ok(())
    }

    /// Pixel at the centre of terminal cell `(column, row)`
    fn pixel_at(&self, column: u16, row: u16) -> Option<(i32, i32)> {
        let area = self.field_area;
        if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
            return None;
        }

        let column = i32::from(column - area.x);
        let row = i32::from(row - area.y);
        let px = self.display.field_left
            + (2 * column + 1) * self.display.square_width / (2 * CELL_COLUMNS);
        let py = self.display.field_top + (2 * row + 1) * self.display.square_height / 2;
        Some((px, py))
    }

    /// Pointer moved to terminal cell `(column, row)`
    ///
    /// Pressure is injected only when the pointer enters a new square, not on
    /// every move inside it.
    fn hover(&mut self, column: u16, row: u16) -> Result<(), FluidError> {
        self.last_input = Instant::now();

        let target = self.pixel_at(column, row).and_then(|(px, py)| {
            let visual = self.lock_visual();
            visual
                .element_at(px, py)
                .map(|(i, j)| ((i, j), visual.to_grid_coords(i, j)))
        });

        let Some((element, (x, y))) = target else {
            self.last_hover = None;
            return Ok(());
        };
        if self.last_hover == Some(element) {
            return Ok(());
        }

        self.last_hover = Some(element);
        // Layout lock is released by now; the tick thread holds the grid
        // lock while it waits for the layout
        self.driver.inject_pressure(x, y)
    }

    fn maybe_idle_splash(&mut self) -> Result<(), FluidError> {
        if !self.idle_splash
            || self.ticker.is_none()
            || self.last_input.elapsed() < IDLE_SPLASH_AFTER
            || self.last_splash.elapsed() < IDLE_SPLASH_EVERY
        {
            return Ok(());
        }

        let mut rng = rand::rng();
        let i = rng.random_range(0..self.display.squares_x);
        let j = rng.random_range(0..self.display.squares_y);
        let (x, y) = self.lock_visual().to_grid_coords(i, j);
        self.last_splash = Instant::now();
        self.driver.inject_pressure(x, y)
    }

    fn status(&self) -> Result<Status, FluidError> {
        Ok(Status {
            generation: self.driver.with_grid(FluidGrid::generation)?,
            stats: self.driver.stats(),
            moved: self.moved.load(Ordering::Relaxed),
        })
    }

    fn run(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        self.start_ticker();

        loop {
            let status = self.status().map_err(io::Error::other)?;
            terminal.draw(|frame| self.draw(frame, &status))?;

            if event::poll(FRAME_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Char('r') => self.reset().map_err(io::Error::other)?,
                        KeyCode::Char(' ') => self.toggle_pause(),
                        KeyCode::Char('s') => self.idle_splash = !self.idle_splash,
                        _ => {}
                    },
                    Event::Mouse(mouse) if mouse.kind == MouseEventKind::Moved => {
                        self.hover(mouse.column, mouse.row)
                            .map_err(io::Error::other)?;
                    }
                    _ => {}
                }
            }

            self.maybe_idle_splash().map_err(io::Error::other)?;
        }

        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame, status: &Status) {
        let [field, footer] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(frame.area());

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" pressure fountain ")
            .border_style(Style::default().fg(Color::DarkGray));
        self.field_area = block.inner(field);
        frame.render_widget(block, field);

        {
            let visual = self.lock_visual();
            frame.render_widget(FieldView { visual: &visual }, self.field_area);
        }

        frame.render_widget(self.footer(status), footer);
    }

    fn footer(&self, status: &Status) -> Paragraph<'static> {
        let key = |k: &'static str| Span::styled(k, Style::default().add_modifier(Modifier::BOLD));
        let state = if self.ticker.is_some() { "running" } else { "paused" };

        let spans = vec![
            key("q"),
            Span::raw(" quit  "),
            key("r"),
            Span::raw(" reset  "),
            key("space"),
            Span::raw(format!(" {state}  ")),
            key("s"),
            Span::raw(if self.idle_splash {
                " idle splash on   "
            } else {
                " idle splash off   "
            }),
            Span::styled(
                format!(
                    "gen {}  stepped {}  skipped {}  moved {}",
                    status.generation, status.stats.stepped, status.stats.skipped, status.moved
                ),
                Style::default().fg(Color::Cyan),
            ),
        ];

        Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title("Keys"))
    }
}

/// Squares drawn at their current positions, scaled from pixels to cells
struct FieldView<'a> {
    visual: &'a VisualGrid,
}

impl Widget for FieldView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let config = *self.visual.config();

        for (i, j, position) in self.visual.positions() {
            let column =
                ((position.x - config.field_left) * CELL_COLUMNS).div_euclid(config.square_width);
            let row = (position.y - config.field_top).div_euclid(config.square_height);
            if column < 0
                || row < 0
                || column >= i32::from(area.width)
                || row >= i32::from(area.height)
            {
                continue;
            }

            let color = if position == config.home_position(i, j) {
                Color::Blue
            } else {
                Color::LightCyan
            };
            if let Some(cell) = buf.cell_mut((area.x + column as u16, area.y + row as u16)) {
                cell.set_char('█').set_fg(color);
            }
        }
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let grid = FluidGrid::from_config(&FluidConfig {
        width: cli.grid_width,
        height: cli.grid_height,
        injection_pressure: cli.pressure,
    })
    .map_err(io::Error::other)?;

    let display = DisplayConfig {
        field_left: 0,
        field_top: 0,
        squares_x: cli.squares_x,
        squares_y: cli.squares_y,
        ..DisplayConfig::default()
    };
    let visual = VisualGrid::for_grid(display, &grid).map_err(io::Error::other)?;

    let mut app = App::new(
        TickDriver::new(grid),
        visual,
        Duration::from_millis(cli.tick_ms),
        cli.idle_splash,
    );

    let mut terminal = ratatui::init();
    execute!(io::stdout(), EnableMouseCapture)?;
    let result = app.run(&mut terminal);
    let released = execute!(io::stdout(), DisableMouseCapture);
    ratatui::restore();

    let stats = app.driver.stats();
    info!(
        "Demo finished: {} ticks stepped, {} skipped",
        stats.stepped, stats.skipped
    );
    result.and(released)
}
