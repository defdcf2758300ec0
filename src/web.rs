//! Browser binding
//!
//! Thin `wasm-bindgen` wrapper around `Session`. The page owns the canvas,
//! DOM HUD and key listeners; it calls `frame` from `requestAnimationFrame`
//! and reads events, HUD and draw commands back as JSON.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::audio::WebAudio;
use crate::persistence::{KeyValueStorage, LocalStorage, MemoryStorage};
use crate::platform;
use crate::render::{DrawList, draw_scene};
use crate::session::Session;
use crate::settings::Settings;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    log::info!("Note Siege starting...");
}

fn open_storage() -> Box<dyn KeyValueStorage> {
    match LocalStorage::open() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            log::warn!("{e}, progress will not persist");
            Box::new(MemoryStorage::new())
        }
    }
}

fn location_query() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

#[wasm_bindgen]
pub struct WebGame {
    session: Rc<RefCell<Session>>,
    draw_list: DrawList,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let storage = open_storage();
        let settings = Settings::load(&*storage).with_query(&location_query());
        log::info!("Clef: {}", settings.clef.as_str());
        let audio = Box::new(WebAudio::new(settings.effective_volume()));
        let seed = js_sys::Date::now() as u64;
        let session = Rc::new(RefCell::new(Session::with_settings(seed, settings, storage, audio)));
        register_pagehide(&session);
        WebGame {
            session,
            draw_list: DrawList::new(),
        }
    }

    /// Start or restart from the saved progression point
    pub fn start(&mut self) {
        self.session.borrow_mut().start();
    }

    /// Returns false if the key does not answer any note
    pub fn press_key(&mut self, key: &str) -> bool {
        self.session.borrow_mut().press_key(key)
    }

    pub fn press(&mut self, note: usize) {
        self.session.borrow_mut().press(note);
    }

    /// Advance by `dt_ms`; returns this frame's events as a JSON array
    pub fn frame(&mut self, dt_ms: f64) -> String {
        let events = self.session.borrow_mut().frame(dt_ms, platform::now_ms());
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }

    /// HUD snapshot as JSON
    pub fn hud(&self) -> String {
        serde_json::to_string(&self.session.borrow().hud()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Current scene as a JSON array of draw commands
    pub fn draw(&mut self) -> String {
        self.draw_list.clear();
        draw_scene(self.session.borrow().state(), &mut self.draw_list);
        serde_json::to_string(&self.draw_list.commands).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn reset_progress(&mut self) {
        self.session.borrow_mut().reset_progress();
    }

    pub fn shutdown(&mut self) {
        self.session.borrow_mut().shutdown();
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}

/// Save progress when the page is hidden for good
fn register_pagehide(session: &Rc<RefCell<Session>>) {
    let Some(window) = web_sys::window() else { return };
    let session = session.clone();
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
        if let Ok(mut s) = session.try_borrow_mut() {
            s.shutdown();
        }
    });
    let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
    closure.forget();
}
