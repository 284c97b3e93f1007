//! Travel minigame: one `step` per rendered frame
//!
//! The player dodges falling asteroids while the hyperdrive charges. Progress
//! is counted in frames, not wall-clock time, so a slower display makes for a
//! longer trip.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::ship_obstacle_hit;
use super::state::{Stage, Store, Transmission, TransmissionKind};
use crate::Viewport;
use crate::consts::MAX_TRAVEL_PROGRESS;
use crate::tuning::TravelTuning;

/// Held arrow keys for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TravelInput {
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelPhase {
    Running,
    /// Arrived; stage moved on to Civilization
    Completed,
    /// Ship destroyed; the store already switched to GameOver
    GameOver,
}

/// A falling asteroid, positioned in percent of the field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    /// Pixels
    pub radius: f32,
    /// Percent of field height per frame
    pub speed: f32,
}

/// Progress checkpoints that post a transmission once per trip
const BEATS: [(f32, &str, TransmissionKind); 3] = [
    (10.0, "AI NAV", TransmissionKind::Info),
    (40.0, "WARN", TransmissionKind::Alert),
    (80.0, "AI NAV", TransmissionKind::Info),
];

fn beat_message(index: usize, planet_name: &str) -> String {
    match index {
        0 => "Leaving orbital gravity well. Engaging hyperdrive.".to_string(),
        1 => "Asteroid field detected. Manual piloting required.".to_string(),
        _ => format!("Approaching {}. Deceleration sequence initiated.", planet_name),
    }
}

/// Loop-owned state for one trip
#[derive(Debug, Clone)]
pub struct TravelLoop {
    /// Ship x, percent of field width
    pub player_x: f32,
    pub obstacles: Vec<Obstacle>,
    /// Frames stepped so far
    pub frames: u32,
    /// Local mirror of ship health, pushed to the store on every hit
    pub health: i32,
    pub phase: TravelPhase,
    tuning: TravelTuning,
    rng: Pcg32,
    next_beat: usize,
    next_id: u32,
}

impl TravelLoop {
    /// Start a trip from the store's current ship health
    pub fn new(seed: u64, tuning: &TravelTuning, store: &Store) -> Self {
        Self {
            player_x: 50.0,
            obstacles: Vec::new(),
            frames: 0,
            health: store.state().ship_health,
            phase: TravelPhase::Running,
            tuning: tuning.clone(),
            rng: Pcg32::seed_from_u64(seed),
            next_beat: 0,
            next_id: 1,
        }
    }

    /// Progress implied by the frames stepped so far
    pub fn progress(&self) -> f32 {
        (self.frames as f32 * MAX_TRAVEL_PROGRESS / self.tuning.duration_frames as f32)
            .min(MAX_TRAVEL_PROGRESS)
    }

    /// Ship centre in pixels
    pub fn ship_center(&self, viewport: Viewport) -> Vec2 {
        Vec2::new(
            self.player_x / 100.0 * viewport.width,
            viewport.height - self.tuning.ship_bottom_offset + self.tuning.ship_size / 2.0,
        )
    }

    /// Spawn one obstacle above the field
    pub fn spawn_obstacle(&mut self) {
        let t = &self.tuning;
        let x = self.rng.random::<f32>() * 100.0;
        let radius = t.radius_min + self.rng.random::<f32>() * (t.radius_max - t.radius_min);
        let speed = t.speed_min + self.rng.random::<f32>() * (t.speed_max - t.speed_min);
        let id = self.next_id;
        self.next_id += 1;
        self.obstacles.push(Obstacle {
            id,
            pos: Vec2::new(x, t.spawn_y),
            radius,
            speed,
        });
    }

    /// Advance one frame. Does nothing once the trip has ended.
    pub fn step(
        &mut self,
        store: &mut Store,
        input: &TravelInput,
        viewport: Viewport,
    ) -> TravelPhase {
        if self.phase != TravelPhase::Running {
            return self.phase;
        }

        // Launched with a wrecked ship: let the store trigger end the run
        if self.health <= 0 {
            store.update_ship_health(self.health);
            self.phase = TravelPhase::GameOver;
            log::info!("Trip aborted, ship has no shields left");
            return self.phase;
        }

        // Player movement
        if input.left {
            self.player_x = (self.player_x - self.tuning.move_step).max(self.tuning.min_x);
        }
        if input.right {
            self.player_x = (self.player_x + self.tuning.move_step).min(self.tuning.max_x);
        }

        if self.rng.random_bool(self.tuning.spawn_chance) {
            self.spawn_obstacle();
        }

        for obstacle in &mut self.obstacles {
            obstacle.pos.y += obstacle.speed;
        }

        // Collisions: every hit counts, no invulnerability window
        let ship = self.ship_center(viewport);
        let half_size = self.tuning.ship_size / 2.0;
        let despawn_y = self.tuning.despawn_y;
        let damage = self.tuning.hit_damage;
        let mut health = self.health;
        self.obstacles.retain(|obstacle| {
            let center = viewport.to_pixels(obstacle.pos);
            if ship_obstacle_hit(ship, half_size, center, obstacle.radius) {
                health -= damage;
                store.update_ship_health(health);
                log::debug!("Asteroid {} hit, shields at {}", obstacle.id, health);
                return false;
            }
            obstacle.pos.y < despawn_y
        });
        self.health = health;

        // Progress
        self.frames += 1;
        let progress = self.progress();
        store.update_travel_progress(progress);
        self.post_beats(store, progress);

        // Terminal check; a destroyed ship never arrives
        if self.health <= 0 {
            self.phase = TravelPhase::GameOver;
            log::info!("Ship destroyed at {:.1}% progress", progress);
        } else if progress >= MAX_TRAVEL_PROGRESS {
            self.phase = TravelPhase::Completed;
            store.set_stage(Stage::Civilization);
            log::info!("Arrived after {} frames with {} shields", self.frames, self.health);
        }

        self.phase
    }

    fn post_beats(&mut self, store: &mut Store, progress: f32) {
        while let Some(&(threshold, speaker, kind)) = BEATS.get(self.next_beat) {
            if progress <= threshold {
                break;
            }
            let planet_name = store
                .state()
                .selected_planet
                .map(|id| id.planet().name)
                .unwrap_or("destination");
            let message = beat_message(self.next_beat, planet_name);
            store.set_transmission(Some(Transmission::new(speaker, message, kind)));
            self.next_beat += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PlanetId;
    use crate::sim::StoreEvent;

    fn calm_tuning() -> TravelTuning {
        TravelTuning {
            spawn_chance: 0.0,
            ..Default::default()
        }
    }

    fn travel_store() -> Store {
        let mut store = Store::new();
        store.select_planet(PlanetId::Terran);
        store.set_stage(Stage::Travel);
        store
    }

    #[test]
    fn test_full_trip_without_collisions_reaches_civilization() {
        let mut store = travel_store();
        let mut travel = TravelLoop::new(1, &calm_tuning(), &store);
        let input = TravelInput::default();
        let viewport = Viewport::default();

        for frame in 1..2000 {
            assert_eq!(
                travel.step(&mut store, &input, viewport),
                TravelPhase::Running,
                "frame {}",
                frame
            );
        }
        assert_eq!(store.state().stage, Stage::Travel);

        assert_eq!(travel.step(&mut store, &input, viewport), TravelPhase::Completed);
        assert_eq!(store.state().travel_progress, 100.0);
        assert_eq!(store.state().stage, Stage::Civilization);
        assert_eq!(store.state().ship_health, 100);
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut store = travel_store();
        let mut travel = TravelLoop::new(7, &TravelTuning::default(), &store);
        let mut last = 0.0;
        for _ in 0..500 {
            travel.step(&mut store, &TravelInput::default(), Viewport::default());
            let now = store.state().travel_progress;
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn test_player_movement_is_bounded() {
        let mut store = travel_store();
        let mut travel = TravelLoop::new(1, &calm_tuning(), &store);
        let left = TravelInput { left: true, right: false };
        for _ in 0..100 {
            travel.step(&mut store, &left, Viewport::default());
        }
        assert_eq!(travel.player_x, 5.0);

        let right = TravelInput { left: false, right: true };
        for _ in 0..100 {
            travel.step(&mut store, &right, Viewport::default());
        }
        assert_eq!(travel.player_x, 95.0);
    }

    #[test]
    fn test_simultaneous_hits_each_count() {
        let mut store = travel_store();
        let mut travel = TravelLoop::new(1, &calm_tuning(), &store);
        let viewport = Viewport::new(1000.0, 1000.0);

        // Ship centre is at (500, 920) = (50%, 92%); park two rocks just above it
        for id in 0..2 {
            travel.obstacles.push(Obstacle {
                id,
                pos: Vec2::new(50.0, 92.0 - 0.5),
                radius: 20.0,
                speed: 0.5,
            });
        }
        travel.step(&mut store, &TravelInput::default(), viewport);

        assert!(travel.obstacles.is_empty());
        assert_eq!(travel.health, 80);
        assert_eq!(store.state().ship_health, 80);
    }

    #[test]
    fn test_fatal_hit_ends_trip_in_game_over() {
        let mut store = travel_store();
        store.update_ship_health(10);
        let mut travel = TravelLoop::new(1, &calm_tuning(), &store);
        let viewport = Viewport::new(1000.0, 1000.0);
        travel.obstacles.push(Obstacle {
            id: 1,
            pos: Vec2::new(50.0, 91.5),
            radius: 15.0,
            speed: 0.5,
        });

        assert_eq!(
            travel.step(&mut store, &TravelInput::default(), viewport),
            TravelPhase::GameOver
        );
        assert_eq!(store.state().stage, Stage::GameOver);
        assert_eq!(store.state().ship_health, 0);

        // Further steps are inert
        let frames = travel.frames;
        travel.step(&mut store, &TravelInput::default(), viewport);
        assert_eq!(travel.frames, frames);
    }

    #[test]
    fn test_destroyed_on_arrival_frame_stays_game_over() {
        let mut store = travel_store();
        store.update_ship_health(10);
        let mut travel = TravelLoop::new(1, &calm_tuning(), &store);
        travel.frames = 1999;
        let viewport = Viewport::new(1000.0, 1000.0);
        travel.obstacles.push(Obstacle {
            id: 1,
            pos: Vec2::new(50.0, 91.5),
            radius: 15.0,
            speed: 0.5,
        });

        assert_eq!(
            travel.step(&mut store, &TravelInput::default(), viewport),
            TravelPhase::GameOver
        );
        assert_eq!(store.state().stage, Stage::GameOver);
    }

    #[test]
    fn test_wrecked_ship_ends_trip_on_first_step() {
        let mut store = travel_store();
        store.update_ship_health(0);
        store.set_stage(Stage::Travel);
        let mut travel = TravelLoop::new(1, &calm_tuning(), &store);

        let phase = travel.step(&mut store, &TravelInput::default(), Viewport::default());
        assert_eq!(phase, TravelPhase::GameOver);
        assert_eq!(store.state().stage, Stage::GameOver);
        assert_eq!(travel.frames, 0);
        assert_eq!(store.state().travel_progress, 0.0);
    }

    #[test]
    fn test_obstacles_leave_the_field() {
        let mut store = travel_store();
        let mut travel = TravelLoop::new(1, &calm_tuning(), &store);
        travel.obstacles.push(Obstacle {
            id: 1,
            pos: Vec2::new(0.0, 109.8),
            radius: 10.0,
            speed: 0.5,
        });
        travel.step(&mut store, &TravelInput { left: false, right: true }, Viewport::default());
        assert!(travel.obstacles.is_empty());
    }

    #[test]
    fn test_spawned_obstacles_within_ranges() {
        let store = travel_store();
        let mut travel = TravelLoop::new(42, &TravelTuning::default(), &store);
        for _ in 0..200 {
            travel.spawn_obstacle();
        }
        for o in &travel.obstacles {
            assert!((0.0..100.0).contains(&o.pos.x));
            assert_eq!(o.pos.y, -10.0);
            assert!((10.0..=40.0).contains(&o.radius));
            assert!((0.2..=0.7).contains(&o.speed));
        }
    }

    #[test]
    fn test_same_seed_same_trip() {
        let mut store1 = travel_store();
        let mut store2 = travel_store();
        let mut a = TravelLoop::new(99999, &TravelTuning::default(), &store1);
        let mut b = TravelLoop::new(99999, &TravelTuning::default(), &store2);
        for _ in 0..300 {
            a.step(&mut store1, &TravelInput::default(), Viewport::default());
            b.step(&mut store2, &TravelInput::default(), Viewport::default());
        }
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.health, b.health);
    }

    #[test]
    fn test_beats_fire_once_each() {
        let mut store = travel_store();
        let mut travel = TravelLoop::new(1, &calm_tuning(), &store);
        let mut posted = Vec::new();
        for _ in 0..2000 {
            travel.step(&mut store, &TravelInput::default(), Viewport::default());
            for event in store.drain_events() {
                if event == StoreEvent::TransmissionChanged {
                    if let Some(t) = &store.state().active_transmission {
                        posted.push(t.message.clone());
                    }
                }
            }
        }
        assert_eq!(posted.len(), 3);
        assert!(posted[2].contains("Neo Terra"));
    }
}
