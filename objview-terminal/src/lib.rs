/// Terminal-based viewer for Wavefront OBJ models
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

use log::debug;
use objview_core::{draw_models, Model};

pub mod camera;
pub mod config;
pub mod input;
pub mod renderer;
pub mod scene;

pub use camera::Camera;
pub use config::ViewerConfig;
pub use input::{Action, InputMapper};
pub use renderer::AsciiRenderer;
pub use scene::{Scene, Selection};

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    camera: Camera,
    renderer: AsciiRenderer,
    input: InputMapper,
    config: ViewerConfig,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(models: Vec<Model>, config: ViewerConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            scene: Scene::new(models),
            camera: Camera::new(u32::from(width), u32::from(height)),
            renderer: AsciiRenderer::new(usize::from(width), usize::from(height)),
            input: InputMapper::new(config),
            config,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = self.config.frame_time();

        while self.running {
            let frame_start = Instant::now();

            // Drain pending input before drawing
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(&event);
            }

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: &Event) {
        if let Event::Resize(width, height) = *event {
            self.camera = Camera::new(u32::from(width), u32::from(height));
            self.renderer = AsciiRenderer::new(usize::from(width), usize::from(height));
            return;
        }

        match self.input.map(event) {
            Some(Action::Quit) => self.running = false,
            Some(action) => {
                debug!("applying {action:?} to {}", self.scene.selection());
                self.scene.apply(action);
            }
            None => {}
        }
    }

    fn status_line(&self) -> String {
        let scales: Vec<String> = self
            .scene
            .models()
            .iter()
            .map(|model| format!("{}x{:.2}", model.filename(), model.accumulated_scale()))
            .collect();
        format!(
            "objview | FPS: {:.1} | Selected: {} | {} | Arrows/WASD/ER=Rotate HJKL/UO=Move +/-=Scale C=Center N=Normalize Tab=Select Q=Quit",
            self.fps,
            self.scene.selection(),
            scales.join(" ")
        )
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        self.renderer.set_camera(&self.camera);
        draw_models(self.scene.models(), &mut self.renderer);

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let (width, _) = terminal::size()?;
        let status: String = self.status_line().chars().take(usize::from(width)).collect();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(status),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
