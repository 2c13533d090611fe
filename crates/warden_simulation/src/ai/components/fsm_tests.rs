//! Tests for NPC mode and config components.

#[cfg(test)]
mod tests {
    use super::super::config::{ConfigError, NpcConfig};
    use super::super::fsm::NpcMode;

    #[test]
    fn test_npc_mode_default() {
        let mode = NpcMode::default();
        assert_eq!(mode, NpcMode::Patrolling);
        assert!(mode.is_idle_family());
    }

    #[test]
    fn test_quiet_modes() {
        assert!(NpcMode::StandingAround.is_quiet());
        assert!(NpcMode::Dead.is_quiet());
        assert!(!NpcMode::Patrolling.is_quiet());
        assert!(!NpcMode::Hunting.is_quiet());
        assert!(!NpcMode::Hunting.is_idle_family());
    }

    #[test]
    fn test_npc_config_default() {
        let config = NpcConfig::default();
        assert_eq!(config.hit_points, 5);
        assert_eq!(config.hunt_speed_multiplier, 10.0);
        assert_eq!(config.stand_around_chance, 15.0);
        assert_eq!(config.hunt_timeout, 15.0);
        assert_eq!(config.view_distance, 20.0);
        assert_eq!(config.view_angle, 60.0);
        assert_eq!(config.patrol_sample_attempts, 10);
        assert_eq!(config.patrol_sample_tolerance, 1.5);
        assert_eq!(config.target_tag, "Player");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let config = NpcConfig { hunt_timeout: 0.0, ..NpcConfig::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "hunt_timeout", .. })
        ));

        let config = NpcConfig { stand_around_chance: 120.0, ..NpcConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ChanceOutOfRange(_))));

        let config = NpcConfig { view_angle: 0.0, ..NpcConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ViewAngleOutOfRange(_))));

        let config = NpcConfig {
            idle_duration_min: 4.0,
            idle_duration_max: 2.0,
            ..NpcConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvertedIdleRange { .. })));

        let config = NpcConfig { patrol_sample_attempts: 0, ..NpcConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::NoSampleAttempts)));
    }

    #[test]
    fn test_config_from_partial_json() {
        let config = NpcConfig::from_json_str(
            r#"{ "hit_points": 2, "footstep_clips": ["step_a", "step_b"], "idle_clip": "growl" }"#,
        )
        .expect("valid config");

        assert_eq!(config.hit_points, 2);
        assert_eq!(config.footstep_clips.len(), 2);
        assert_eq!(config.footstep_clips[1].as_str(), "step_b");
        assert_eq!(config.idle_clip.as_ref().map(|c| c.as_str()), Some("growl"));
        // Остальное — defaults
        assert_eq!(config.hunt_timeout, 15.0);
    }

    #[test]
    fn test_config_json_errors() {
        assert!(matches!(
            NpcConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            NpcConfig::from_json_str(r#"{ "view_distance": -1.0 }"#),
            Err(ConfigError::NotPositive { field: "view_distance", .. })
        ));
    }
}
