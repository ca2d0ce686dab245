//! Application entry point and thread bootstrapper.

mod input;
mod logic;
mod models;
mod render;
mod shared;
mod state;
mod system;

use crate::models::chart::Chart;
use crate::models::settings::SettingsState;
use crate::system::bus::SystemBus;
use env_logger::Env;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    log::info!("MAIN: Booting tapsync...");

    let settings = SettingsState::load();
    let chart = match Chart::load(&settings.chart_path) {
        Ok(chart) => chart,
        Err(e) => {
            log::error!("MAIN: Cannot load chart {:?}: {}", settings.chart_path, e);
            std::process::exit(1);
        }
    };

    let bus = SystemBus::new();

    let input_manager = input::manager::InputManager::new(&settings.keybinds);
    let (width, height) = (settings.window_width, settings.window_height);

    if let Err(e) = input::start_thread(bus.clone(), input_manager) {
        log::error!("MAIN: Failed to spawn Input thread: {}", e);
        return;
    }
    if let Err(e) = logic::start_thread(bus.clone(), chart, settings) {
        log::error!("MAIN: Failed to spawn Logic thread: {}", e);
        return;
    }

    if let Err(e) = render::app::App::run(bus, width, height) {
        log::error!("MAIN: Event loop error: {}", e);
    }
    log::info!("MAIN: Exit");
}
