use super::events::{GameAction, RawInputEvent};
use std::collections::HashMap;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Key names accepted in `settings.toml` for lane bindings.
const LANE_KEYS: &[(&str, KeyCode)] = &[
    ("KeyA", KeyCode::KeyA),
    ("KeyB", KeyCode::KeyB),
    ("KeyC", KeyCode::KeyC),
    ("KeyD", KeyCode::KeyD),
    ("KeyE", KeyCode::KeyE),
    ("KeyF", KeyCode::KeyF),
    ("KeyG", KeyCode::KeyG),
    ("KeyH", KeyCode::KeyH),
    ("KeyI", KeyCode::KeyI),
    ("KeyJ", KeyCode::KeyJ),
    ("KeyK", KeyCode::KeyK),
    ("KeyL", KeyCode::KeyL),
    ("KeyM", KeyCode::KeyM),
    ("KeyN", KeyCode::KeyN),
    ("KeyO", KeyCode::KeyO),
    ("KeyP", KeyCode::KeyP),
    ("KeyQ", KeyCode::KeyQ),
    ("KeyR", KeyCode::KeyR),
    ("KeyS", KeyCode::KeyS),
    ("KeyT", KeyCode::KeyT),
    ("KeyU", KeyCode::KeyU),
    ("KeyV", KeyCode::KeyV),
    ("KeyW", KeyCode::KeyW),
    ("KeyX", KeyCode::KeyX),
    ("KeyY", KeyCode::KeyY),
    ("KeyZ", KeyCode::KeyZ),
    ("Digit1", KeyCode::Digit1),
    ("Digit2", KeyCode::Digit2),
    ("Digit3", KeyCode::Digit3),
    ("Digit4", KeyCode::Digit4),
    ("Digit5", KeyCode::Digit5),
    ("Digit6", KeyCode::Digit6),
    ("Digit7", KeyCode::Digit7),
    ("Digit8", KeyCode::Digit8),
    ("Digit9", KeyCode::Digit9),
    ("Digit0", KeyCode::Digit0),
    ("Space", KeyCode::Space),
    ("ShiftLeft", KeyCode::ShiftLeft),
    ("ShiftRight", KeyCode::ShiftRight),
    ("Semicolon", KeyCode::Semicolon),
    ("Quote", KeyCode::Quote),
    ("Comma", KeyCode::Comma),
    ("Period", KeyCode::Period),
    ("Slash", KeyCode::Slash),
    ("BracketLeft", KeyCode::BracketLeft),
    ("BracketRight", KeyCode::BracketRight),
    ("ArrowLeft", KeyCode::ArrowLeft),
    ("ArrowDown", KeyCode::ArrowDown),
    ("ArrowUp", KeyCode::ArrowUp),
    ("ArrowRight", KeyCode::ArrowRight),
];

/// Looks up a winit `KeyCode` by its name (e.g. `KeyD`). Case-sensitive.
fn parse_keycode(name: &str) -> Option<KeyCode> {
    LANE_KEYS
        .iter()
        .find(|(label, _)| *label == name)
        .map(|&(_, code)| code)
}

/// Maps physical keys to gameplay actions.
pub struct InputManager {
    bindings: HashMap<KeyCode, GameAction>,
}

impl InputManager {
    /// Builds the lane bindings from key names, one per lane in lane order.
    pub fn new(keybinds: &[String]) -> Self {
        let mut manager = Self {
            bindings: HashMap::new(),
        };
        manager.load_default_bindings();
        manager.reload_keybinds(keybinds);
        manager
    }

    /// Only presses produce actions. Releases and unmapped keys are ignored.
    pub fn process(&mut self, event: RawInputEvent) -> Option<GameAction> {
        if event.state != ElementState::Pressed {
            return None;
        }
        self.bindings.get(&event.keycode).copied()
    }

    pub fn reload_keybinds(&mut self, keybinds: &[String]) {
        let mut parsed = Vec::new();
        for (lane, label) in keybinds.iter().enumerate() {
            match parse_keycode(label) {
                Some(code) => parsed.push((lane, code)),
                None => log::warn!("INPUT: Unknown key '{}' for lane {}", label, lane),
            }
        }

        self.bindings
            .retain(|_, action| !matches!(action, GameAction::Hit { .. }));
        for (lane, code) in parsed {
            if self.bindings.contains_key(&code) {
                log::warn!("INPUT: {:?} is reserved, lane {} left unbound", code, lane);
                continue;
            }
            self.bindings.insert(code, GameAction::Hit { lane });
        }
        log::info!("INPUT: {} lane keys bound", keybinds.len());
    }

    fn load_default_bindings(&mut self) {
        self.bindings.insert(KeyCode::Enter, GameAction::Start);
        self.bindings.insert(KeyCode::Escape, GameAction::Back);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn press(keycode: KeyCode) -> RawInputEvent {
        RawInputEvent {
            keycode,
            state: ElementState::Pressed,
        }
    }

    #[test]
    fn parses_known_key_names_only() {
        assert_eq!(parse_keycode("KeyD"), Some(KeyCode::KeyD));
        assert_eq!(parse_keycode("Semicolon"), Some(KeyCode::Semicolon));
        assert_eq!(parse_keycode("keyd"), None);
        assert_eq!(parse_keycode(""), None);
    }

    #[test]
    fn maps_lane_keys_in_order() {
        let mut manager = InputManager::new(&keys(&["KeyD", "KeyF", "KeyJ", "KeyK"]));
        assert_eq!(manager.process(press(KeyCode::KeyD)), Some(GameAction::Hit { lane: 0 }));
        assert_eq!(manager.process(press(KeyCode::KeyK)), Some(GameAction::Hit { lane: 3 }));
        assert_eq!(manager.process(press(KeyCode::Enter)), Some(GameAction::Start));
        assert_eq!(manager.process(press(KeyCode::Escape)), Some(GameAction::Back));
    }

    #[test]
    fn ignores_releases_and_unmapped_keys() {
        let mut manager = InputManager::new(&keys(&["KeyD", "KeyF"]));
        let release = RawInputEvent {
            keycode: KeyCode::KeyD,
            state: ElementState::Released,
        };
        assert_eq!(manager.process(release), None);
        assert_eq!(manager.process(press(KeyCode::KeyQ)), None);
    }

    #[test]
    fn unknown_names_keep_lane_positions() {
        let mut manager = InputManager::new(&keys(&["KeyS", "NotAKey", "KeyL"]));
        assert_eq!(manager.process(press(KeyCode::KeyL)), Some(GameAction::Hit { lane: 2 }));
    }

    #[test]
    fn reload_replaces_previous_lane_keys() {
        let mut manager = InputManager::new(&keys(&["KeyD", "KeyF"]));
        manager.reload_keybinds(&keys(&["KeyA", "KeyS"]));
        assert_eq!(manager.process(press(KeyCode::KeyD)), None);
        assert_eq!(manager.process(press(KeyCode::KeyS)), Some(GameAction::Hit { lane: 1 }));
    }
}
