//! Application window and event loop handler.
//!
//! This module manages the main window and bridges winit events to the
//! internal event system. The window shows the live session summary in its
//! title bar.

use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::input::events::RawInputEvent;
use crate::shared::snapshot::RenderState;
use crate::system::bus::{SystemBus, SystemEvent};

const APP_NAME: &str = "tapsync";
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Main application struct handling window events.
pub struct App {
    bus: SystemBus,
    window: Option<Arc<Window>>,
    size: (u32, u32),
    state: Option<RenderState>,
    title: String,
}

impl App {
    pub fn new(bus: SystemBus, width: u32, height: u32) -> Self {
        Self {
            bus,
            window: None,
            size: (width, height),
            state: None,
            title: APP_NAME.to_string(),
        }
    }

    /// Runs the application event loop (blocking).
    pub fn run(bus: SystemBus, width: u32, height: u32) -> Result<(), winit::error::EventLoopError> {
        let event_loop = EventLoop::new()?;
        let mut app = App::new(bus, width, height);
        event_loop.run_app(&mut app)
    }

    /// Pulls the newest state from the logic thread and mirrors it in the title.
    fn refresh(&mut self) {
        if let Some(state) = self.bus.render_rx.try_iter().last() {
            if let RenderState::Result(result) = &state {
                log::info!("RENDER: {}", result);
            }
            self.state = Some(state);
        }

        let Some(state) = &self.state else {
            return;
        };
        let title = window_title(state);
        if title != self.title
            && let Some(window) = &self.window
        {
            window.set_title(&title);
            self.title = title;
        }
    }
}

/// One-line summary of a render state.
pub fn window_title(state: &RenderState) -> String {
    match state {
        RenderState::Ready { title } => format!("{APP_NAME} | {title} | Press Enter to start"),
        RenderState::Loading { title } => format!("{APP_NAME} | {title} | Loading..."),
        RenderState::InGame(snapshot) => {
            let mut line = format!(
                "{APP_NAME} | {:.1}s | Score {} | Combo {} | {} left",
                snapshot.song_time / 1000.0,
                snapshot.score,
                snapshot.combo,
                snapshot.remaining_notes
            );
            if let Some(flash) = &snapshot.flash {
                line.push_str(&format!(" | {} ({:+.0} ms)", flash.judgement, flash.timing_ms));
            }
            line
        }
        RenderState::Result(result) => format!("{APP_NAME} | {result}"),
        RenderState::Closed { reason } => format!("{APP_NAME} | Closed: {reason}"),
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        log::info!("RENDER: Creating window...");
        let (width, height) = self.size;
        let win_attr = Window::default_attributes()
            .with_title(APP_NAME)
            .with_inner_size(winit::dpi::LogicalSize::new(width as f64, height as f64));

        match event_loop.create_window(win_attr) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => {
                log::error!("RENDER: Cannot create window: {}", e);
                let _ = self.bus.sys_tx.send(SystemEvent::Quit);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(raw_event) = RawInputEvent::from_winit(&event) {
            let _ = self.bus.raw_input_tx.send(raw_event);
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("RENDER: Close requested");
                let _ = self.bus.sys_tx.send(SystemEvent::Quit);
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                let _ = self.bus.sys_tx.send(SystemEvent::Resize {
                    width: physical_size.width,
                    height: physical_size.height,
                });
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.refresh();
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + FRAME_INTERVAL));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::result::GameResultData;
    use crate::models::stats::HitStats;

    #[test]
    fn titles_follow_state() {
        let ready = RenderState::Ready {
            title: "Tutorial".to_string(),
        };
        assert!(window_title(&ready).contains("Press Enter"));

        let mut stats = HitStats::new();
        stats.perfect = 3;
        let result = RenderState::Result(GameResultData::new(1_000_000, 3, &stats));
        let line = window_title(&result);
        assert!(line.contains("Score 1000000"));
        assert!(line.contains("PERFECT 3"));
    }
}
