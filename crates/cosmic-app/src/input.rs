//! Simulated input thread: taps that launch meteors through a `Spawner`
//! while the frame thread is mid-update.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use glam::Vec3;
use log::{debug, info};

use cosmic_core::constants::PLAYER_SPAWN_ORIGIN;
use cosmic_sim::Spawner;

/// Counters reported when the input thread stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TapStats {
    pub taps: u32,
    pub accepted: u32,
    pub dropped: u32,
    pub epic_bursts: u32,
}

/// Charge of tap `n`: a repeating ramp so hold times vary.
pub fn tap_power(n: u32) -> f32 {
    (n % 5) as f32 / 4.0
}

/// Launch point of tap `n`, nudged sideways around the default origin.
pub fn tap_origin(n: u32) -> Vec3 {
    let offset = ((n % 3) as f32 - 1.0) * 0.4;
    PLAYER_SPAWN_ORIGIN + Vec3::new(offset, 0.0, 0.0)
}

/// One tap: launch a meteor, and fire the epic burst once it is armed.
pub fn tap(spawner: &Spawner, n: u32, stats: &mut TapStats) {
    stats.taps += 1;
    match spawner.spawn_single(tap_origin(n), tap_power(n)) {
        Ok(_) => stats.accepted += 1,
        Err(_) => stats.dropped += 1,
    }
    if spawner.is_epic_ready() && spawner.spawn_epic_burst() > 0 {
        stats.epic_bursts += 1;
        debug!("Epic burst fired on tap {n}");
    }
}

/// Tap every `interval` until `running` clears.
pub fn spawn_tapper(
    spawner: Spawner,
    interval: Duration,
    running: Arc<AtomicBool>,
) -> std::io::Result<JoinHandle<TapStats>> {
    std::thread::Builder::new()
        .name("cosmic-input".into())
        .spawn(move || {
            let mut stats = TapStats::default();
            let mut n = 0;
            while running.load(Ordering::Relaxed) {
                tap(&spawner, n, &mut stats);
                n = n.wrapping_add(1);
                std::thread::sleep(interval);
            }
            info!(
                "Input stopped: {} taps, {} dropped, {} epic bursts",
                stats.taps, stats.dropped, stats.epic_bursts
            );
            stats
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmic_sim::BattleEngine;

    #[test]
    fn test_tap_power_in_range() {
        for n in 0..20 {
            let p = tap_power(n);
            assert!((0.0..=1.0).contains(&p));
        }
        assert_eq!(tap_power(4), 1.0);
    }

    #[test]
    fn test_taps_fill_pool_then_drop() {
        let engine = BattleEngine::default();
        let spawner = engine.spawner();
        let mut stats = TapStats::default();
        for n in 0..20 {
            tap(&spawner, n, &mut stats);
        }
        assert_eq!(stats.taps, 20);
        assert_eq!(stats.accepted, engine.config().pools.player_meteors as u32);
        assert_eq!(stats.dropped, 20 - stats.accepted);
        assert_eq!(stats.epic_bursts, 0);
    }

    #[test]
    fn test_tapper_thread_stops() {
        let engine = BattleEngine::default();
        let running = Arc::new(AtomicBool::new(true));
        let handle =
            spawn_tapper(engine.spawner(), Duration::from_millis(1), Arc::clone(&running)).unwrap();
        std::thread::sleep(Duration::from_millis(20));
        running.store(false, Ordering::Relaxed);
        let stats = handle.join().unwrap();
        assert!(stats.taps > 0);
    }
}
