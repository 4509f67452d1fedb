//! Tank Battle entry point
//!
//! Browser: wires the canvas, menu form and keyboard to a `Session` and runs
//! the frame loop. Native: plays one seeded round headless with a scripted
//! pilot and prints the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, HtmlSelectElement};

    use tank_battle::api::SyncedStore;
    use tank_battle::consts::*;
    use tank_battle::highscores::LocalStore;
    use tank_battle::namegen::random_player_name;
    use tank_battle::platform::KeyTracker;
    use tank_battle::platform::input::{MENU_KEY, is_game_key};
    use tank_battle::renderer::CanvasSink;
    use tank_battle::session::LeaderboardView;
    use tank_battle::sim::GamePhase;
    use tank_battle::{Difficulty, Session, Settings};

    /// Game instance holding all state
    struct Game {
        session: Session<SyncedStore>,
        sink: CanvasSink,
        keys: KeyTracker,
        last_time: f64,
        last_phase: GamePhase,
    }

    impl Game {
        /// Run one simulation frame
        fn update(&mut self, dt: f32) {
            let input = self.keys.tick_input();
            self.session.frame(&input, dt);
            // Each press is seen by exactly one tick
            self.keys.clear_edges();

            let mut leaderboard_dirty = false;
            if self.session.store().take_updated() {
                self.session.refresh_leaderboard();
                leaderboard_dirty = true;
            }

            let phase = self.session.phase();
            if phase != self.last_phase {
                if phase.is_terminal() || phase == GamePhase::Menu {
                    leaderboard_dirty = true;
                }
                self.last_phase = phase;
            }
            if leaderboard_dirty {
                update_leaderboard(self.session.leaderboard());
            }
        }

        fn render(&mut self) {
            self.session.render(&mut self.sink);
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = get_document() else {
                return;
            };
            let hud = self.session.hud();

            if let Some(el) = document.get_element_by_id("hud") {
                el.set_text_content(Some(&hud.status));
            }
            if let Some(el) = document.get_element_by_id("banner") {
                el.set_text_content(Some(&hud.banner));
            }
            if let Some(el) = document.get_element_by_id("menu-form") {
                let _ = el.set_attribute("class", if hud.show_menu { "" } else { "hidden" });
            }
        }

        fn back_to_menu(&mut self) {
            self.session.back_to_menu();
            self.keys.reset();
            self.last_phase = GamePhase::Menu;
            update_leaderboard(self.session.leaderboard());
        }
    }

    fn get_document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn update_leaderboard(view: &LeaderboardView) {
        let Some(document) = get_document() else {
            return;
        };
        if let Some(el) = document.get_element_by_id("best-rating") {
            el.set_text_content(Some(&view.best_line()));
        }
        if let Some(list) = document.get_element_by_id("leaderboard") {
            list.set_inner_html("");
            for line in view.lines() {
                if let Ok(li) = document.create_element("li") {
                    li.set_text_content(Some(&line));
                    let _ = list.append_child(&li);
                }
            }
        }
    }

    fn name_input(document: &Document) -> Option<HtmlInputElement> {
        document.get_element_by_id("player-name")?.dyn_into().ok()
    }

    fn difficulty_select(document: &Document) -> Option<HtmlSelectElement> {
        document.get_element_by_id("difficulty")?.dyn_into().ok()
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tank Battle starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let sink = CanvasSink::new(&canvas).expect("Failed to get 2d context");

        let settings = Settings::load();
        let store = SyncedStore::new(LocalStore::load(), settings.api_base_url.clone());

        if let Some(input) = name_input(&document) {
            input.set_value(&settings.player_name);
        }
        if let Some(select) = difficulty_select(&document) {
            select.set_value(settings.difficulty.as_str());
        }

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(seed, settings, store);
        let limit = session.leaderboard_limit();
        session.store().pull(session.menu_difficulty(), limit);
        update_leaderboard(session.leaderboard());

        let game = Rc::new(RefCell::new(Game {
            session,
            sink,
            keys: KeyTracker::new(),
            last_time: 0.0,
            last_phase: GamePhase::Menu,
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_keyboard(game.clone());
        setup_menu(game.clone(), limit);

        request_animation_frame(game);

        log::info!("Tank Battle running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                // Menu keys belong to the name field
                if g.session.phase() == GamePhase::Menu {
                    return;
                }
                let key = event.key();
                if is_game_key(&key) {
                    event.prevent_default();
                }
                if key.eq_ignore_ascii_case(MENU_KEY) {
                    g.back_to_menu();
                    return;
                }
                g.keys.key_down(&key);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().keys.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Lost focus: keyup events will never arrive
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().keys.reset();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_menu(game: Rc<RefCell<Game>>, limit: usize) {
        let Some(document) = get_document() else {
            return;
        };

        // Start round
        if let Some(form) = document.get_element_by_id("menu-form") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
                let Some(document) = get_document() else {
                    return;
                };
                let name = name_input(&document).map(|i| i.value()).unwrap_or_default();
                let difficulty = difficulty_select(&document)
                    .and_then(|s| Difficulty::from_str(&s.value()))
                    .unwrap_or_default();

                let mut g = game.borrow_mut();
                g.session.start_round(&name, difficulty);
                g.session.settings().save();
                if let Some(input) = name_input(&document) {
                    input.set_value(g.session.player_name());
                }
                g.keys.reset();
            });
            let _ = form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Difficulty change refreshes the leaderboard
        if let Some(select) = difficulty_select(&document) {
            let game = game.clone();
            let select_clone = select.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(difficulty) = Difficulty::from_str(&select_clone.value()) else {
                    return;
                };
                let mut g = game.borrow_mut();
                g.session.select_difficulty(difficulty);
                g.session.settings().save();
                g.session.store().pull(difficulty, limit);
                update_leaderboard(g.session.leaderboard());
            });
            let _ = select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Random name
        if let Some(btn) = document.get_element_by_id("random-name") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                if let Some(input) = get_document().as_ref().and_then(name_input) {
                    input.set_value(&random_player_name(&mut rand::rng()));
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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

            // Calculate delta time; the tick caps it
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                MAX_TICK_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Tank Battle (native) starting...");
    log::info!("Native mode plays a headless demo round - run with `trunk serve` for the web version");

    let args: Vec<String> = std::env::args().collect();
    let seed = parse_seed(&args).unwrap_or_else(|| tank_battle::platform::now_ms() as u64);
    let difficulty = parse_difficulty(&args).unwrap_or_default();

    demo::run(seed, difficulty);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_seed(args: &[String]) -> Option<u64> {
    flag_value(args, "--seed")?.parse().ok()
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_difficulty(args: &[String]) -> Option<tank_battle::Difficulty> {
    tank_battle::Difficulty::from_str(flag_value(args, "--difficulty")?)
}

#[cfg(not(target_arch = "wasm32"))]
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == flag {
            return iter.next().map(String::as_str);
        }
    }
    None
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use tank_battle::consts::*;
    use tank_battle::renderer::NullSink;
    use tank_battle::sim::{GameEvent, GamePhase, GameState, TickInput};
    use tank_battle::{Difficulty, LeaderboardStore, MemoryStore, Session, Settings};

    /// Give up after this much simulated time
    const MAX_FRAMES: u32 = 60 * 60 * 10;
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Close enough to line up a shot
    const ALIGN_SLACK: f32 = 8.0;

    /// Scripted pilot: line up with the nearest enemy on one axis, then
    /// turn toward it and fire. Wanders when stuck behind a wall.
    pub struct Pilot {
        frame: u32,
        last_pos: glam::Vec2,
        stuck_frames: u32,
    }

    impl Pilot {
        pub fn new() -> Self {
            Self {
                frame: 0,
                last_pos: glam::Vec2::ZERO,
                stuck_frames: 0,
            }
        }

        pub fn input(&mut self, state: &GameState) -> TickInput {
            self.frame += 1;
            let mut input = TickInput::default();
            if state.phase != GamePhase::Playing {
                return input;
            }

            let me = state.player.center();
            if me.distance(self.last_pos) < 0.01 {
                self.stuck_frames += 1;
            } else {
                self.stuck_frames = 0;
            }
            self.last_pos = me;

            if self.stuck_frames > 30 {
                match (self.frame / 45) % 4 {
                    0 => input.left = true,
                    1 => input.up = true,
                    2 => input.right = true,
                    _ => input.down = true,
                }
                if self.stuck_frames > 120 {
                    self.stuck_frames = 0;
                }
                input.fire = self.frame % 8 == 0;
                return input;
            }

            let Some(target) = state
                .enemies
                .iter()
                .min_by(|a, b| a.center().distance(me).total_cmp(&b.center().distance(me)))
            else {
                return input;
            };
            let d = target.center() - me;

            if d.x.abs() <= ALIGN_SLACK {
                input.up = d.y < 0.0;
                input.down = d.y > 0.0;
                input.fire = self.frame % 4 == 0;
            } else if d.y.abs() <= ALIGN_SLACK {
                input.left = d.x < 0.0;
                input.right = d.x > 0.0;
                input.fire = self.frame % 4 == 0;
            } else if d.x.abs() < d.y.abs() {
                input.left = d.x < 0.0;
                input.right = d.x > 0.0;
            } else {
                input.up = d.y < 0.0;
                input.down = d.y > 0.0;
            }
            input
        }
    }

    pub fn run(seed: u64, difficulty: Difficulty) {
        let settings = Settings {
            player_name: "Autopilot".to_string(),
            difficulty,
            ..Settings::default()
        };
        let mut session = Session::new(seed, settings, MemoryStore::new());
        session.start_round("Autopilot", difficulty);

        let mut pilot = Pilot::new();
        let mut sink = NullSink;
        let mut frames = 0;
        while frames < MAX_FRAMES && !session.phase().is_terminal() {
            let input = pilot.input(session.state());
            for event in session.frame(&input, FRAME_DT) {
                match event {
                    GameEvent::LevelStarted { level } => println!("Level {} / {}", level, TOTAL_LEVELS),
                    GameEvent::PlayerHit { lives_left } => println!("  hit! {} lives left", lives_left),
                    GameEvent::LevelCleared { level } => println!("  level {} clear", level),
                    _ => {}
                }
            }
            session.render(&mut sink);
            frames += 1;
        }

        let state = session.state();
        let hud = session.hud();
        println!("\n{}", hud.status);
        if hud.banner.is_empty() {
            println!("Out of time after {:.0}s", f64::from(frames) * f64::from(FRAME_DT));
        } else {
            println!("{}", hud.banner);
        }
        println!(
            "seed {} · shots {} · kills {} · deaths {}",
            seed, state.round.shots, state.round.kills, state.round.deaths
        );

        let view = session.leaderboard();
        println!("\n{}", view.best_line());
        for line in view.lines() {
            println!("  {}", line);
        }
        log::info!(
            "{} results stored",
            session.store().top_results(usize::MAX, difficulty).len()
        );
    }
}
