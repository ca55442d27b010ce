/// Terminal front end: drives the ambient scene into a character grid
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use drift3d_core::{DeviceTier, SceneConfig, Scheduler, Tick, Viewport};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::{AsciiRenderer, CELL_HEIGHT, CELL_WIDTH};

/// Startup options collected from the command line
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Forced device tier; classified from the grid width when absent
    pub tier: Option<DeviceTier>,
    pub seed: u64,
    pub fps: u32,
    pub show_status: bool,
    pub config: SceneConfig,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            tier: None,
            seed: 0,
            fps: 30,
            show_status: true,
            config: SceneConfig::default(),
        }
    }
}

/// Logical viewport covered by a grid of `width` x `height` cells
pub fn viewport_for(width: usize, height: usize) -> io::Result<Viewport> {
    Viewport::new(width as f32 * CELL_WIDTH, height as f32 * CELL_HEIGHT, 1.0)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}

/// Main application struct for the terminal background
pub struct TerminalApp {
    scheduler: Scheduler,
    renderer: AsciiRenderer,
    options: AppOptions,
    started: Instant,
    last_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(options: AppOptions) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Self::with_size(options, width as usize, height as usize)
    }

    /// Build against a fixed grid size instead of the live terminal
    pub fn with_size(options: AppOptions, width: usize, height: usize) -> io::Result<Self> {
        let viewport = viewport_for(width, height)?;
        let renderer = AsciiRenderer::new(width, height);
        let tier = options.tier.unwrap_or_else(|| DeviceTier::classify(viewport.width, false));
        let scheduler = Scheduler::new(viewport, tier, options.config.clone(), options.seed);

        Ok(Self {
            scheduler,
            renderer,
            options,
            started: Instant::now(),
            last_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / u64::from(self.options.fps.max(1)));

        while self.scheduler.is_running() {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?)?;
            }

            if self.step() == Tick::Stopped {
                break;
            }
            self.present()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_sample).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_sample = now;
            }
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Key(KeyEvent {
                code: KeyCode::Char('q') | KeyCode::Esc,
                ..
            }) => self.scheduler.stop(),
            Event::Resize(width, height) => self.resize(width as usize, height as usize)?,
            _ => {}
        }
        Ok(())
    }

    /// Rebuild the scene for a new grid size
    pub fn resize(&mut self, width: usize, height: usize) -> io::Result<()> {
        // A collapsed terminal keeps the last good scene
        let viewport = match viewport_for(width, height) {
            Ok(viewport) => viewport,
            Err(e) => {
                tracing::warn!(width, height, error = %e, "ignoring resize");
                return Ok(());
            }
        };
        let tier = self
            .options
            .tier
            .unwrap_or_else(|| DeviceTier::classify(viewport.width, false));
        self.renderer.resize(width, height);
        self.scheduler.resize(viewport, tier);
        Ok(())
    }

    /// Render one frame into the character grid
    pub fn step(&mut self) -> Tick {
        let now_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        self.renderer.clear();
        self.scheduler.tick(now_ms, &mut self.renderer)
    }

    fn present(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        if self.options.show_status {
            queue!(
                stdout,
                cursor::MoveTo(0, 0),
                SetForegroundColor(Color::DarkGrey),
                Print(self.status_line()),
                ResetColor
            )?;
        }

        stdout.flush()?;
        Ok(())
    }

    pub fn status_line(&self) -> String {
        let scene = self.scheduler.scene();
        let counts = scene.counts();
        format!(
            "drift3d | FPS: {:.1} | {} | {} entities: solids {} particles {} stars {} | Q=Quit",
            self.fps,
            scene.tier().name(),
            counts.total(),
            counts.solids,
            counts.particles,
            counts.stars
        )
    }
}
