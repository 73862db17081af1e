#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crate::core::commands::PlayerCommand;
    use crate::core::components::{Entity, Trajectory};
    use crate::core::config::BattleConfig;
    use crate::core::constants::*;
    use crate::core::enums::*;
    use crate::core::events::BattleEvent;
    use crate::core::types::Vec3;
    use crate::combatants::Damageable;
    use crate::engine::{clamp_dt, BattleEngine};
    use crate::pool::EntityPool;
    use crate::render::*;
    use crate::systems;

    const DT: f32 = 1.0 / 60.0;

    fn quiet_config() -> BattleConfig {
        let mut config = BattleConfig::default();
        config.ambient.enabled = false;
        config
    }

    fn run_secs(engine: &mut BattleEngine, secs: f32) {
        let frames = (secs / DT).ceil() as usize;
        for _ in 0..frames {
            engine.update(DT);
        }
    }

    fn destroy_everything(engine: &mut BattleEngine) {
        for kind in ShipKind::ALL {
            engine.ship_mut(kind).unwrap().damage(100);
        }
        engine.planet_mut().damage(PLANET_MAX_HEALTH);
    }

    #[test]
    fn test_engine_initial_state() {
        let engine = BattleEngine::new(quiet_config());
        assert_eq!(engine.ships().len(), 4);
        for ship in engine.ships() {
            assert_eq!(ship.health(), ship.max_health());
            assert_eq!(ship.state, ShipState::Patrolling);
        }
        assert_eq!(engine.planet().health(), PLANET_MAX_HEALTH);
        assert_eq!(engine.active_count(EntityKind::Meteor), 0);
        assert_eq!(engine.combo_count(), 0);
        assert!(!engine.is_epic_ready());
    }

    #[test]
    fn test_dt_is_clamped_once_at_entry() {
        let mut engine = BattleEngine::new(quiet_config());
        engine.update(5.0);
        assert!((engine.time().elapsed_secs - MAX_FRAME_DT).abs() < 1e-6);
        engine.update(-1.0);
        engine.update(f32::NAN);
        assert!((engine.time().elapsed_secs - MAX_FRAME_DT).abs() < 1e-6);
        assert_eq!(engine.time().frame, 3);
        assert_eq!(clamp_dt(f32::INFINITY, 0.1), 0.0);
        assert_eq!(clamp_dt(0.05, 0.1), 0.05);
    }

    #[test]
    fn test_invalid_frame_cap_is_replaced_not_fatal() {
        for bad in [-1.0, 0.0, f32::NAN, f32::INFINITY] {
            let mut config = quiet_config();
            config.sim.max_frame_dt = bad;
            let mut engine = BattleEngine::new(config);
            assert_eq!(engine.config().sim.max_frame_dt, MAX_FRAME_DT);
            engine.update(5.0);
            assert!((engine.time().elapsed_secs - MAX_FRAME_DT).abs() < 1e-6);
        }
        assert_eq!(clamp_dt(0.05, -1.0), 0.05);
        assert_eq!(clamp_dt(0.5, f32::NAN), MAX_FRAME_DT);
        assert_eq!(clamp_dt(-0.5, f32::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_event_queues_stay_bounded_without_snapshots() {
        let mut engine = BattleEngine::default();
        let mut busiest_frame = 0;
        // Five simulated minutes with ambient debris and ships fighting
        for i in 0..18_000 {
            if i % 30 == 0 {
                let _ = engine.spawn_single(PLAYER_SPAWN_ORIGIN, 0.5);
            }
            engine.update(DT);
            busiest_frame = busiest_frame.max(engine.events().len());
            assert!(engine.pending_events() <= EVENT_BACKLOG);
        }
        assert_eq!(engine.pending_events(), EVENT_BACKLOG);
        assert!(busiest_frame < 64);

        let snap = engine.snapshot();
        assert_eq!(snap.events.len(), EVENT_BACKLOG);
        assert_eq!(engine.pending_events(), 0);
    }

    #[test]
    fn test_events_hold_only_the_latest_frame() {
        let mut engine = BattleEngine::new(quiet_config());
        engine.spawn_single(PLAYER_SPAWN_ORIGIN, 1.0).unwrap();
        let is_meteor_hit = |e: &BattleEvent| {
            matches!(
                e,
                BattleEvent::Impact {
                    kind: EntityKind::Meteor,
                    ..
                }
            )
        };
        let mut hit_frame = None;
        for frame in 0..120 {
            engine.update(DT);
            if engine.events().iter().any(is_meteor_hit) {
                hit_frame = Some(frame);
                break;
            }
        }
        assert!(hit_frame.is_some());
        engine.update(DT);
        assert!(!engine.events().iter().any(is_meteor_hit));
        // The snapshot still carries it
        assert_eq!(engine.snapshot().events.iter().filter(|e| is_meteor_hit(e)).count(), 1);
    }

    #[test]
    fn test_player_meteor_hits_force_field_and_feeds_combo() {
        let mut engine = BattleEngine::new(quiet_config());
        engine.spawn_single(PLAYER_SPAWN_ORIGIN, 1.0).unwrap();
        run_secs(&mut engine, 1.0);

        let snap = engine.snapshot();
        let meteor_hits: Vec<_> = snap
            .events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    BattleEvent::Impact {
                        kind: EntityKind::Meteor,
                        target: TargetId::ForceField,
                        damage: 1,
                        ..
                    }
                )
            })
            .collect();
        assert_eq!(meteor_hits.len(), 1);
        assert_eq!(engine.planet().force_field.health(), FORCE_FIELD_MAX_HEALTH - 1);
        assert_eq!(snap.planet.force_field_health, FORCE_FIELD_MAX_HEALTH - 1);
        assert_eq!(engine.score().force_field_impacts, 1);
        assert_eq!(engine.combo_count(), 1);
        assert_eq!(engine.score().hits, 1);
        assert_eq!(engine.score().points, SCORE_HIT);
        // Impact flash and fade are over; the slot is back in the pool
        assert_eq!(engine.active_count(EntityKind::Meteor), 0);
    }

    #[test]
    fn test_force_field_goes_down_then_planet_takes_damage() {
        let mut engine = BattleEngine::new(quiet_config());
        for _ in 1..FORCE_FIELD_MAX_HEALTH {
            engine.planet_mut().force_field.register_impact();
        }
        engine.spawn_single(PLAYER_SPAWN_ORIGIN, 1.0).unwrap();
        run_secs(&mut engine, 1.0);
        assert!(engine.planet().force_field.is_down());
        let snap = engine.snapshot();
        assert!(snap.events.contains(&BattleEvent::ForceFieldDown));
        assert!(!snap.events.iter().any(|e| matches!(
            e,
            BattleEvent::Impact {
                kind: EntityKind::Meteor,
                target: TargetId::Planet,
                ..
            }
        )));

        // With the field down the core takes the full payload
        engine.spawn_single(PLAYER_SPAWN_ORIGIN, 1.0).unwrap();
        run_secs(&mut engine, 1.0);
        assert!(engine.planet().health() <= PLANET_MAX_HEALTH - 3);
        assert!(engine.snapshot().events.iter().any(|e| matches!(
            e,
            BattleEvent::Impact {
                kind: EntityKind::Meteor,
                target: TargetId::Planet,
                damage: 3,
                ..
            }
        )));

        // The field comes back with the planet
        engine.planet_mut().damage(PLANET_MAX_HEALTH);
        run_secs(&mut engine, PLANET_RESPAWN_DELAY + 0.1);
        assert!(!engine.planet().is_destroyed());
        assert_eq!(engine.planet().force_field.health(), FORCE_FIELD_MAX_HEALTH);

        engine.planet_mut().force_field.register_impact();
        engine.restart();
        assert_eq!(engine.planet().force_field.health(), FORCE_FIELD_MAX_HEALTH);
    }

    #[test]
    fn test_specials_are_counted_in_score() {
        let mut engine = BattleEngine::new(quiet_config());
        run_secs(&mut engine, 20.0);
        assert!(engine.score().specials_used > 0);
    }

    #[test]
    fn test_impacted_lasts_one_frame_then_fades() {
        let mut engine = BattleEngine::new(quiet_config());
        engine.spawn_single(PLAYER_SPAWN_ORIGIN, 1.0).unwrap();
        let mut impacted_frames = 0;
        let mut saw_fading = false;
        for _ in 0..60 {
            engine.update(DT);
            for e in engine.active_entities(EntityKind::Meteor) {
                match e.state {
                    EntityState::Impacted => impacted_frames += 1,
                    EntityState::Fading => saw_fading = true,
                    _ => {}
                }
            }
        }
        assert_eq!(impacted_frames, 1);
        assert!(saw_fading);
    }

    #[test]
    fn test_expired_meteor_counts_as_miss() {
        let mut engine = BattleEngine::new(quiet_config());
        engine.spawn_single(PLAYER_SPAWN_ORIGIN, 1.0).unwrap();
        run_secs(&mut engine, 1.0);
        assert_eq!(engine.combo_count(), 1);

        destroy_everything(&mut engine);
        engine.spawn_single(PLAYER_SPAWN_ORIGIN, 0.0).unwrap();
        run_secs(&mut engine, METEOR_LIFETIME + 0.1);

        assert_eq!(engine.score().misses, 1);
        assert_eq!(engine.combo_count(), 0);
        assert_eq!(engine.active_count(EntityKind::Meteor), 0);
    }

    #[test]
    fn test_epic_flow_through_engine() {
        let mut engine = BattleEngine::new(quiet_config());
        for _ in 0..COMBO_THRESHOLD {
            engine.spawn_single(PLAYER_SPAWN_ORIGIN, 1.0).unwrap();
        }
        run_secs(&mut engine, 1.0);
        assert!(engine.is_epic_ready());

        let snap = engine.snapshot();
        let ready = snap
            .events
            .iter()
            .filter(|e| matches!(e, BattleEvent::EpicReady { .. }))
            .count();
        assert_eq!(ready, 1);
        assert!(snap.combo.epic_ready);

        assert_eq!(engine.spawn_epic_burst(), EPIC_BURST_COUNT);
        assert!(!engine.is_epic_ready());
        assert_eq!(engine.combo_count(), 0);
        assert_eq!(engine.active_count(EntityKind::Meteor), EPIC_BURST_COUNT);
        assert_eq!(engine.spawn_epic_burst(), 0);

        engine.update(DT);
        assert_eq!(engine.score().epic_bursts, 1);
    }

    #[test]
    fn test_ships_fire_lasers() {
        let mut engine = BattleEngine::new(quiet_config());
        run_secs(&mut engine, 3.0);
        assert!(engine.pool_stats(EntityKind::Laser).acquired > 0);
    }

    #[test]
    fn test_same_seed_same_battle() {
        let mut a = BattleEngine::new(quiet_config());
        let mut b = BattleEngine::new(quiet_config());
        a.spawn_single(PLAYER_SPAWN_ORIGIN, 0.3).unwrap();
        b.spawn_single(PLAYER_SPAWN_ORIGIN, 0.3).unwrap();
        for _ in 0..400 {
            a.update(DT);
            b.update(DT);
        }
        let ja = serde_json::to_string(&a.snapshot()).unwrap();
        let jb = serde_json::to_string(&b.snapshot()).unwrap();
        assert_eq!(ja, jb);
    }

    #[test]
    fn test_ambient_shower_spawns_debris() {
        let mut config = BattleConfig::default();
        config.ambient.interval_secs = 0.5;
        let mut engine = BattleEngine::new(config);
        run_secs(&mut engine, 1.1);
        assert!(engine.pool_stats(EntityKind::Debris).acquired >= 2);
    }

    #[test]
    fn test_restart_resets_session() {
        let mut engine = BattleEngine::new(quiet_config());
        engine.spawn_single(PLAYER_SPAWN_ORIGIN, 1.0).unwrap();
        run_secs(&mut engine, 1.0);
        destroy_everything(&mut engine);
        engine.spawn_single(PLAYER_SPAWN_ORIGIN, 1.0).unwrap();

        engine.restart();
        assert_eq!(engine.active_count(EntityKind::Meteor), 0);
        assert_eq!(engine.active_count(EntityKind::Laser), 0);
        assert_eq!(engine.combo_count(), 0);
        assert_eq!(engine.score().points, 0);
        assert_eq!(engine.time().frame, 0);
        assert!(!engine.planet().is_destroyed());
        for ship in engine.ships() {
            assert!(!ship.is_destroyed());
            assert_eq!(ship.position, ship.profile.spawn_position);
        }
        assert!(engine.snapshot().events.is_empty());
    }

    #[test]
    fn test_restart_command_matches_restart() {
        let mut engine = BattleEngine::new(quiet_config());
        engine.handle_command(PlayerCommand::SpawnSingle {
            origin: PLAYER_SPAWN_ORIGIN,
            power: 0.5,
        });
        assert_eq!(engine.active_count(EntityKind::Meteor), 1);
        engine.handle_command(PlayerCommand::Restart);
        assert_eq!(engine.active_count(EntityKind::Meteor), 0);
    }

    #[test]
    fn test_destroyed_ship_respawns_with_event() {
        let mut engine = BattleEngine::new(quiet_config());
        engine.ship_mut(ShipKind::Scout).unwrap().damage(100);
        let delay = engine.ship(ShipKind::Scout).unwrap().profile.respawn_delay;
        run_secs(&mut engine, delay + 0.1);
        let snap = engine.snapshot();
        assert!(snap.events.contains(&BattleEvent::ShipRespawned {
            ship: ShipKind::Scout
        }));
    }

    #[derive(Default)]
    struct RecordingRenderer {
        calls: Vec<DrawCall>,
    }

    impl BattleRenderer for RecordingRenderer {
        fn submit(&mut self, call: DrawCall) {
            self.calls.push(call);
        }
    }

    fn resources() -> SharedRenderResources {
        let mut next = 0;
        SharedRenderResources::load(|_shader, _texture| {
            next += 1;
            Material {
                shader: ShaderHandle(next),
                texture: TextureHandle(next),
            }
        })
    }

    #[test]
    fn test_draw_visits_planet_ships_and_entities() {
        let mut engine = BattleEngine::new(quiet_config());
        engine.spawn_single(PLAYER_SPAWN_ORIGIN, 0.5).unwrap();
        engine.spawn_single(PLAYER_SPAWN_ORIGIN, 0.5).unwrap();
        let camera = FixedCamera::looking_at(Vec3::new(0.0, 2.0, 8.0), Vec3::ZERO, 16.0 / 9.0);
        let res = resources();

        let mut renderer = RecordingRenderer::default();
        engine.draw(&res, &camera, &mut renderer);
        assert_eq!(renderer.calls.len(), 1 + 4 + 2);
        assert_eq!(renderer.calls[0].material, res.planet_material());

        // Destroyed ships are not drawn
        engine.ship_mut(ShipKind::Attacker).unwrap().damage(100);
        let mut renderer = RecordingRenderer::default();
        engine.draw(&res, &camera, &mut renderer);
        assert_eq!(renderer.calls.len(), 1 + 3 + 2);
    }

    #[test]
    fn test_camera_mvp_composes_view_projection() {
        let camera = FixedCamera::looking_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 1.0);
        let model = glam::Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(camera.compute_mvp(model), camera.view_projection() * model);
    }

    struct CollectingSink(Arc<Mutex<Vec<(Vec3, [f32; 4], f32)>>>);

    impl ImpactSink for CollectingSink {
        fn on_impact(&mut self, position: Vec3, team_color: [f32; 4], magnitude: f32) {
            self.0.lock().unwrap().push((position, team_color, magnitude));
        }
    }

    #[test]
    fn test_impact_sink_notified() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut engine = BattleEngine::new(quiet_config());
        engine.set_impact_sink(Box::new(CollectingSink(Arc::clone(&seen))));
        engine.spawn_single(PLAYER_SPAWN_ORIGIN, 1.0).unwrap();
        run_secs(&mut engine, 1.0);

        let seen = seen.lock().unwrap();
        // Only a full-power meteor carries a payload of 3
        let meteor = seen
            .iter()
            .find(|(_, color, magnitude)| {
                *color == Team::Player.color() && (magnitude - 3.0).abs() < 1e-6
            })
            .copied();
        let (position, _, _) = meteor.unwrap();
        // Impact point sits on the force field
        assert!((position.length() - FORCE_FIELD_RADIUS).abs() < 1e-4);
    }

    #[test]
    fn test_lifetime_retirement_is_exact() {
        let mut pool = EntityPool::new(4);
        pool.spawn(Entity {
            state: EntityState::Traveling,
            kind: EntityKind::Laser,
            team: Team::Hostile,
            max_lifetime: 0.5,
            trajectory: Trajectory::Ballistic {
                origin: Vec3::ZERO,
                direction: Vec3::X,
                speed: 1.0,
            },
            ..Default::default()
        })
        .unwrap();
        let mut retire = Vec::new();

        systems::integrate::run(&mut pool, &[], 0.25);
        systems::cleanup::run(&mut pool, &mut retire, ARENA_RADIUS);
        assert_eq!(pool.active_count(), 1);

        // Age reaches exactly max_lifetime on this frame
        systems::integrate::run(&mut pool, &[], 0.25);
        let age = pool.iter_active().next().map(|(_, e)| e.age).unwrap();
        assert_eq!(age, 0.5);
        systems::cleanup::run(&mut pool, &mut retire, ARENA_RADIUS);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_leaving_arena_retires() {
        let mut pool = EntityPool::new(1);
        let far = Vec3::new(ARENA_RADIUS + 1.0, 0.0, 0.0);
        pool.spawn(Entity {
            state: EntityState::Traveling,
            team: Team::Player,
            kind: EntityKind::Meteor,
            position: far,
            max_lifetime: 100.0,
            ..Default::default()
        })
        .unwrap();
        let mut retire = Vec::new();
        let misses = systems::cleanup::run(&mut pool, &mut retire, ARENA_RADIUS);
        assert_eq!(misses, 1);
        assert_eq!(pool.active_count(), 0);
    }
}
