//! Astro Genesis entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, KeyboardEvent, MouseEvent};

    use astro_genesis::catalog::{BuildingKind, PlanetId};
    use astro_genesis::router::Screen;
    use astro_genesis::sim::{StoreEvent, TravelInput};
    use astro_genesis::{Intent, Session, Tuning, Viewport};

    /// Game instance holding all state
    struct Game {
        session: Session,
        last_time: f64,
        input: TravelInput,
        viewport: Viewport,
        /// Grid slot picked in the colony view, waiting for a building choice
        selected_slot: Option<usize>,
        /// Last toast text
        notice: Option<String>,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning) -> Self {
            Self {
                session: Session::new(seed, tuning),
                last_time: 0.0,
                input: TravelInput::default(),
                viewport: Viewport::default(),
                selected_slot: None,
                notice: None,
            }
        }

        /// Run one frame of simulation
        fn update(&mut self, time: f64) {
            let elapsed = if self.last_time > 0.0 {
                (time - self.last_time).min(1000.0)
            } else {
                0.0
            };
            self.last_time = time;

            let input = self.input;
            self.session.frame(&input, self.viewport, elapsed);

            for event in self.session.drain_events() {
                match event {
                    StoreEvent::BuildingPlaced(b) => {
                        self.notice = Some(format!("{} Constructed!", b.kind.spec().name));
                    }
                    StoreEvent::StageChanged { from, to } => {
                        log::info!("Stage changed {:?} -> {:?}", from, to);
                        self.selected_slot = None;
                    }
                    _ => {}
                }
            }
        }

        /// Route a click on an element id to an intent
        fn click(&mut self, id: &str) {
            let now = js_sys::Date::now() as u64;
            let intent = if id == "start-btn" {
                Some(Intent::BeginMission)
            } else if id == "toggle-view-btn" {
                Some(Intent::ToggleView)
            } else if id == "restart-btn" {
                Some(Intent::Restart)
            } else if let Some(key) = id.strip_prefix("planet-") {
                PlanetId::from_str(key).map(Intent::ChoosePlanet)
            } else if let Some(n) = id.strip_prefix("slot-") {
                if let Ok(slot) = n.parse::<usize>() {
                    if self.session.state().building_at(slot).is_none() {
                        self.selected_slot = Some(slot);
                    }
                }
                None
            } else if id == "cancel-build-btn" {
                self.selected_slot = None;
                None
            } else if let Some(key) = id.strip_prefix("build-") {
                match (BuildingKind::from_str(key), self.selected_slot) {
                    (Some(kind), Some(slot)) => Some(Intent::Build { kind, slot }),
                    _ => None,
                }
            } else {
                None
            };

            let Some(intent) = intent else { return };
            let is_build = matches!(intent, Intent::Build { .. });
            match self.session.dispatch(intent, now) {
                Ok(()) => {
                    if is_build {
                        self.selected_slot = None;
                    }
                }
                Err(e) => {
                    log::warn!("{}", e);
                    self.notice = Some(match e {
                        astro_genesis::GameError::InsufficientResources { .. } => {
                            "Insufficient Resources!".to_string()
                        }
                        other => other.to_string(),
                    });
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, document: &Document) {
            let state = self.session.state();

            // Show only the mounted screen
            let mounted = self.session.screen();
            for screen in Screen::ALL {
                if let Some(el) = document.get_element_by_id(screen.element_id()) {
                    let class = if mounted == Some(screen) { "screen" } else { "screen hidden" };
                    let _ = el.set_attribute("class", class);
                }
            }

            // Flight HUD
            set_bar_width(document, "hud-progress-bar", state.travel_progress);
            set_bar_width(document, "hud-health-bar", state.ship_health as f32);
            set_text(document, "hud-progress", &format!("{}%", state.travel_progress.round()));
            set_text(
                document,
                "hud-distance",
                &format!("{:.1} LY", (100.0 - state.travel_progress).max(0.0)),
            );
            if let Some(el) = document.get_element_by_id("hud-comms") {
                match &state.active_transmission {
                    Some(t) => {
                        el.set_text_content(Some(&format!("{}: {}", t.speaker, t.message)));
                        let _ = el.set_attribute("class", "");
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }
            if let Some(el) = document.get_element_by_id("hud-cockpit") {
                let class = if state.is_inside_view { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }

            // Colony sidebar
            let colony_name = state
                .selected_planet
                .map(|id| id.planet().name)
                .unwrap_or("Unknown");
            set_text(document, "colony-name", &format!("{} Colony", colony_name));
            set_text(document, "res-energy", &state.resources.energy.to_string());
            set_text(document, "res-minerals", &state.resources.minerals.to_string());
            set_text(document, "res-population", &state.resources.population.to_string());
            for slot in 0..astro_genesis::consts::COLONY_GRID_SLOTS {
                if let Some(el) = document.get_element_by_id(&format!("slot-{}", slot)) {
                    let mut class = match state.building_at(slot) {
                        Some(b) => format!("slot built {}", b.kind.as_str()),
                        None => "slot".to_string(),
                    };
                    if self.selected_slot == Some(slot) {
                        class.push_str(" selected");
                    }
                    let _ = el.set_attribute("class", &class);
                }
            }
            if let Some(el) = document.get_element_by_id("build-menu") {
                let class = if self.selected_slot.is_some() { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }

            // Toast
            if let Some(text) = self.notice.take() {
                set_text(document, "toast", &text);
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_bar_width(document: &Document, id: &str, percent: f32) {
        if let Some(el) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = el.style().set_property("width", &format!("{}%", percent));
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Astro Genesis starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, Tuning::load())));
        resize(&window, &game);
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        request_animation_frame(game);

        log::info!("Astro Genesis running!");
    }

    fn resize(window: &web_sys::Window, game: &Rc<RefCell<Game>>) {
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1280.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(720.0);
        game.borrow_mut().viewport = Viewport::new(w as f32, h as f32);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Arrow keys are held state
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowLeft" => g.input.left = true,
                    "ArrowRight" => g.input.right = true,
                    _ => {}
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowLeft" => g.input.left = false,
                    "ArrowRight" => g.input.right = false,
                    _ => {}
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Release keys on blur so the ship doesn't drift
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input = TravelInput::default();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Viewport tracking
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if let Some(window) = web_sys::window() {
                    resize(&window, &game);
                }
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // One delegated click handler for every button and grid slot
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                    return;
                };
                let Ok(Some(el)) = target.closest("[id]") else {
                    return;
                };
                game.borrow_mut().click(&el.id());
            });
            if let Some(document) = window.document() {
                let _ = document.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Astro Genesis (native) starting...");
    log::info!("Native mode runs a headless autopilot - run with `trunk serve` for the web version");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match astro_genesis::Tuning::load_from_path(std::path::Path::new(&path)) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => astro_genesis::Tuning::default(),
    };

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    autopilot::run(seed, tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run: dodge with a simple steering rule, then build a small colony
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use astro_genesis::catalog::{BuildingKind, PlanetId};
    use astro_genesis::consts::COLONY_GRID_SLOTS;
    use astro_genesis::sim::{ColonySim, Stage, TravelInput};
    use astro_genesis::{Intent, Session, Tuning, Viewport};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Colony time simulated after landing
    const COLONY_MS: f64 = 60_000.0;

    pub fn run(seed: u64, tuning: Tuning) {
        let viewport = Viewport::default();
        let mut session = Session::new(seed, tuning);

        let launch = session
            .dispatch(Intent::BeginMission, 0)
            .and_then(|_| session.dispatch(Intent::ChoosePlanet(PlanetId::Terran), 0));
        if let Err(e) = launch {
            log::error!("Launch failed: {}", e);
            return;
        }

        while session.state().stage == Stage::Travel {
            let input = steer(&session, viewport);
            session.frame(&input, viewport, FRAME_MS);
        }

        if session.state().stage == Stage::GameOver {
            println!(
                "Mission failed at {:.1}% progress",
                session.state().travel_progress
            );
            return;
        }
        println!(
            "Landed on {} with {} shields",
            PlanetId::Terran.planet().name,
            session.state().ship_health
        );

        let plan = [BuildingKind::Solar, BuildingKind::Mine, BuildingKind::Habitat];
        let mut elapsed = 0.0;
        let mut next_slot = 0;
        let mut now_ms = 0u64;
        while elapsed < COLONY_MS {
            for kind in plan {
                if next_slot < COLONY_GRID_SLOTS && ColonySim::affordable(session.store(), kind) {
                    match session.dispatch(Intent::Build { kind, slot: next_slot }, now_ms) {
                        Ok(()) => next_slot += 1,
                        Err(e) => log::warn!("{}", e),
                    }
                }
            }
            session.frame(&TravelInput::default(), viewport, FRAME_MS);
            elapsed += FRAME_MS;
            now_ms = elapsed as u64;
        }

        let r = session.state().resources;
        println!(
            "Colony after {}s: {} buildings, energy {}, minerals {}, population {}",
            COLONY_MS / 1000.0,
            session.state().buildings.len(),
            r.energy,
            r.minerals,
            r.population
        );
    }

    /// Step away from the closest obstacle bearing down on the ship
    fn steer(session: &Session, viewport: Viewport) -> TravelInput {
        let Some(travel) = session.travel() else {
            return TravelInput::default();
        };
        let ship = travel.ship_center(viewport);
        let threat = travel
            .obstacles
            .iter()
            .map(|o| (o, viewport.to_pixels(o.pos)))
            .filter(|(o, p)| p.y < ship.y && (p.x - ship.x).abs() < o.radius + 60.0)
            .max_by(|(_, a), (_, b)| a.y.total_cmp(&b.y));

        match threat {
            Some((_, p)) if p.x >= ship.x => TravelInput { left: true, right: false },
            Some(_) => TravelInput { left: false, right: true },
            None => TravelInput::default(),
        }
    }
}
