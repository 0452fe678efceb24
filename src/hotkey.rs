//! Global push-to-talk key listener
//!
//! Uses device_query to poll keyboard state at the system level, so holding
//! the talk key works no matter which window has focus. A dedicated thread
//! polls at a fixed interval and forwards press/release edges to the
//! controller; held keys produce no repeat events.
//!
//! On Wayland, device_query doesn't work (X11-only), so we warn at startup
//! but keep polling anyway for setups that route input through XWayland.

use crate::ptt::PttController;
use device_query::{DeviceQuery, DeviceState, Keycode};
use std::collections::HashSet;
use std::thread;
use std::time::Duration;

/// How often the global key state is sampled (ms)
const POLL_INTERVAL_MS: u64 = 20;

/// device_query reads X11 state; under a pure Wayland session the global
/// key set comes back empty.
fn is_wayland() -> bool {
    let session = std::env::var("XDG_SESSION_TYPE").unwrap_or_default();
    session.eq_ignore_ascii_case("wayland") || std::env::var_os("WAYLAND_DISPLAY").is_some()
}

/// Parse a configured key name into a keycode.
///
/// Names are case-insensitive; a few common aliases are accepted.
pub fn parse_key(name: &str) -> Option<Keycode> {
    match name.to_lowercase().as_str() {
        "space" => Some(Keycode::Space),
        "enter" | "return" => Some(Keycode::Enter),
        "tab" => Some(Keycode::Tab),

        "f1" => Some(Keycode::F1),
        "f2" => Some(Keycode::F2),
        "f3" => Some(Keycode::F3),
        "f4" => Some(Keycode::F4),
        "f5" => Some(Keycode::F5),
        "f6" => Some(Keycode::F6),
        "f7" => Some(Keycode::F7),
        "f8" => Some(Keycode::F8),
        "f9" => Some(Keycode::F9),
        "f10" => Some(Keycode::F10),
        "f11" => Some(Keycode::F11),
        "f12" => Some(Keycode::F12),

        "lshift" | "shift" => Some(Keycode::LShift),
        "rshift" => Some(Keycode::RShift),
        "lctrl" | "ctrl" | "control" => Some(Keycode::LControl),
        "rctrl" => Some(Keycode::RControl),
        "lalt" | "alt" | "option" => Some(Keycode::LAlt),
        "ralt" => Some(Keycode::RAlt),
        "lmeta" | "meta" | "cmd" | "command" => Some(Keycode::LMeta),
        "rmeta" => Some(Keycode::RMeta),

        "a" => Some(Keycode::A),
        "b" => Some(Keycode::B),
        "c" => Some(Keycode::C),
        "d" => Some(Keycode::D),
        "e" => Some(Keycode::E),
        "f" => Some(Keycode::F),
        "g" => Some(Keycode::G),
        "h" => Some(Keycode::H),
        "i" => Some(Keycode::I),
        "j" => Some(Keycode::J),
        "k" => Some(Keycode::K),
        "l" => Some(Keycode::L),
        "m" => Some(Keycode::M),
        "n" => Some(Keycode::N),
        "o" => Some(Keycode::O),
        "p" => Some(Keycode::P),
        "q" => Some(Keycode::Q),
        "r" => Some(Keycode::R),
        "s" => Some(Keycode::S),
        "t" => Some(Keycode::T),
        "u" => Some(Keycode::U),
        "v" => Some(Keycode::V),
        "w" => Some(Keycode::W),
        "x" => Some(Keycode::X),
        "y" => Some(Keycode::Y),
        "z" => Some(Keycode::Z),

        "0" => Some(Keycode::Key0),
        "1" => Some(Keycode::Key1),
        "2" => Some(Keycode::Key2),
        "3" => Some(Keycode::Key3),
        "4" => Some(Keycode::Key4),
        "5" => Some(Keycode::Key5),
        "6" => Some(Keycode::Key6),
        "7" => Some(Keycode::Key7),
        "8" => Some(Keycode::Key8),
        "9" => Some(Keycode::Key9),

        _ => None,
    }
}

/// Spawn the keyboard polling thread.
///
/// The thread watches a single key and calls the controller on each edge:
/// `press` when the key appears in the polled set, `release` when it leaves.
/// The controller handles everything else, so the loop body stays cheap and
/// never blocks on audio or network work.
pub fn spawn_listener(key: Keycode, mut controller: PttController) -> thread::JoinHandle<()> {
    if is_wayland() {
        tracing::warn!(
            "Wayland session detected; device_query requires X11 and the talk key may not register"
        );
    }

    thread::spawn(move || {
        let device_state = DeviceState::new();
        let mut was_pressed = false;

        tracing::info!("Listening for push-to-talk key {:?}", key);

        loop {
            let keys: HashSet<Keycode> = device_state.get_keys().into_iter().collect();
            let is_pressed = keys.contains(&key);

            if is_pressed && !was_pressed {
                controller.press();
            } else if !is_pressed && was_pressed {
                controller.release();
            }
            was_pressed = is_pressed;

            thread::sleep(Duration::from_millis(POLL_INTERVAL_MS));
        }
    })
}
