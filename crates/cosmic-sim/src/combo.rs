//! Combo tracking and scoring.
//!
//! Consecutive player hits inside a rolling window build a combo. Crossing
//! the threshold arms the epic burst exactly once; it stays armed until
//! consumed by the burst or a restart.

use cosmic_core::constants::*;
use cosmic_core::state::{ComboView, ScoreView};

#[derive(Debug, Clone)]
pub struct ComboTracker {
    count: u32,
    window_timer: f32,
    threshold: u32,
    window: f32,
    epic_armed: bool,
    max_combo: u32,
}

impl ComboTracker {
    pub fn new(threshold: u32, window: f32) -> Self {
        Self {
            count: 0,
            window_timer: 0.0,
            threshold: threshold.max(1),
            window,
            epic_armed: false,
            max_combo: 0,
        }
    }

    /// Count a hit and restart the window. Returns true exactly when this
    /// hit armed the epic burst.
    pub fn register_hit(&mut self) -> bool {
        self.count += 1;
        self.window_timer = self.window;
        self.max_combo = self.max_combo.max(self.count);
        if !self.epic_armed && self.count >= self.threshold {
            self.epic_armed = true;
            return true;
        }
        false
    }

    /// A clean miss breaks the combo immediately.
    pub fn register_miss(&mut self) {
        self.count = 0;
        self.window_timer = 0.0;
    }

    /// Run the window down; the combo breaks when it reaches zero.
    pub fn update(&mut self, dt: f32) {
        if self.count == 0 {
            return;
        }
        self.window_timer -= dt;
        if self.window_timer <= 0.0 {
            self.count = 0;
            self.window_timer = 0.0;
        }
    }

    /// Disarm the epic burst and reset the count. Returns false if it was
    /// not armed.
    pub fn consume_epic(&mut self) -> bool {
        if !self.epic_armed {
            return false;
        }
        self.epic_armed = false;
        self.count = 0;
        self.window_timer = 0.0;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.threshold, self.window);
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn is_epic_ready(&self) -> bool {
        self.epic_armed
    }

    pub fn window_remaining(&self) -> f32 {
        self.window_timer
    }

    pub fn view(&self) -> ComboView {
        ComboView {
            count: self.count,
            max_combo: self.max_combo,
            threshold: self.threshold,
            window_remaining: self.window_timer,
            epic_ready: self.epic_armed,
        }
    }
}

impl Default for ComboTracker {
    fn default() -> Self {
        Self::new(COMBO_THRESHOLD, COMBO_WINDOW)
    }
}

/// Session score.
#[derive(Debug, Clone, Default)]
pub struct ScoreState {
    pub points: u64,
    pub hits: u32,
    pub misses: u32,
    pub epic_bursts: u32,
    /// Hostile ships destroyed.
    pub hostile_kills: u32,
    /// Player-side ships destroyed.
    pub player_kills: u32,
    pub planets_destroyed: u32,
    /// Meteors absorbed by the planet's force field.
    pub force_field_impacts: u32,
    pub specials_used: u32,
}

impl ScoreState {
    /// Points for one player hit landing at combo `count`.
    pub fn hit_value(count: u32) -> u64 {
        if count >= 5 {
            SCORE_HIT_COMBO_5
        } else if count >= 3 {
            SCORE_HIT_COMBO_3
        } else {
            SCORE_HIT
        }
    }

    pub fn award_hit(&mut self, count: u32) {
        self.hits += 1;
        self.points += Self::hit_value(count);
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn award_planet(&mut self) {
        self.planets_destroyed += 1;
        self.points += SCORE_PLANET_DESTROYED;
    }

    pub fn view(&self) -> ScoreView {
        ScoreView {
            points: self.points,
            hits: self.hits,
            misses: self.misses,
            epic_bursts: self.epic_bursts,
            hostile_kills: self.hostile_kills,
            player_kills: self.player_kills,
            planets_destroyed: self.planets_destroyed,
            force_field_impacts: self.force_field_impacts,
            specials_used: self.specials_used,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_fires_exactly_once() {
        let mut c = ComboTracker::new(5, 5.0);
        let fired: Vec<bool> = (0..5).map(|_| c.register_hit()).collect();
        assert_eq!(fired, vec![false, false, false, false, true]);
        assert!(c.is_epic_ready());
        // Sixth hit before the burst is consumed does not re-fire
        assert!(!c.register_hit());
        assert!(c.is_epic_ready());
        assert_eq!(c.count(), 6);
    }

    #[test]
    fn consume_resets_count_and_rearms() {
        let mut c = ComboTracker::new(2, 5.0);
        c.register_hit();
        assert!(c.register_hit());
        assert!(c.consume_epic());
        assert!(!c.is_epic_ready());
        assert_eq!(c.count(), 0);
        assert!(!c.consume_epic());
        c.register_hit();
        assert!(c.register_hit());
    }

    #[test]
    fn window_expiry_breaks_combo() {
        let mut c = ComboTracker::new(5, 1.0);
        c.register_hit();
        c.register_hit();
        c.update(0.6);
        assert_eq!(c.count(), 2);
        c.update(0.6);
        assert_eq!(c.count(), 0);
        assert_eq!(c.max_combo(), 2);
    }

    #[test]
    fn hit_restarts_window() {
        let mut c = ComboTracker::new(5, 1.0);
        c.register_hit();
        c.update(0.9);
        c.register_hit();
        c.update(0.9);
        assert_eq!(c.count(), 2);
    }

    #[test]
    fn miss_breaks_immediately() {
        let mut c = ComboTracker::new(5, 10.0);
        c.register_hit();
        c.register_hit();
        c.register_miss();
        assert_eq!(c.count(), 0);
        assert_eq!(c.window_remaining(), 0.0);
    }

    #[test]
    fn armed_epic_survives_decay() {
        let mut c = ComboTracker::new(1, 1.0);
        assert!(c.register_hit());
        c.update(2.0);
        assert_eq!(c.count(), 0);
        assert!(c.is_epic_ready());
    }

    #[test]
    fn reset_keeps_tuning() {
        let mut c = ComboTracker::new(3, 2.0);
        c.register_hit();
        c.reset();
        let v = c.view();
        assert_eq!(v.count, 0);
        assert_eq!(v.max_combo, 0);
        assert_eq!(v.threshold, 3);
    }

    #[test]
    fn score_tiers() {
        assert_eq!(ScoreState::hit_value(1), 10);
        assert_eq!(ScoreState::hit_value(3), 25);
        assert_eq!(ScoreState::hit_value(4), 25);
        assert_eq!(ScoreState::hit_value(5), 50);
        let mut s = ScoreState::default();
        s.award_hit(1);
        s.award_hit(5);
        s.award_planet();
        assert_eq!(s.points, 1060);
        assert_eq!(s.view().hits, 2);
    }
}
