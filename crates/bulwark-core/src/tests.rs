#[cfg(test)]
mod tests {
    use crate::config::CoordinationConfig;
    use crate::constants::*;
    use crate::enums::*;
    use crate::error::{ConfigError, RegistrationError};
    use crate::events::{CoordinationEvent, TickReport};
    use crate::types::{InterceptorId, Position, SimTime, ThreatId, UnitId, Velocity};

    #[test]
    fn test_config_defaults_match_constants() {
        let config = CoordinationConfig::default();
        assert_eq!(config.max_in_flight, MAX_IN_FLIGHT);
        assert_eq!(config.retarget_cap, 3);
        assert!((config.retarget_reach - 50.0).abs() < 1e-10);
        assert!((config.assignment_ttl_secs - 30.0).abs() < 1e-10);
        assert!(config.coordination_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_desired_count_by_class() {
        let config = CoordinationConfig::default();
        assert_eq!(config.desired_count(ThreatClass::Ordinary), 1);
        assert_eq!(config.desired_count(ThreatClass::HighValue), 2);
    }

    #[test]
    fn test_partial_json_overrides_only_named_fields() {
        let config =
            CoordinationConfig::from_json_str(r#"{ "max_in_flight": 4, "retarget_cap": 2 }"#)
                .unwrap();
        assert_eq!(config.max_in_flight, 4);
        assert_eq!(config.retarget_cap, 2);
        assert_eq!(config.max_commits_per_tick, MAX_COMMITS_PER_TICK);
        assert_eq!(config.high_value_desired_count, HIGH_VALUE_DESIRED_COUNT);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = CoordinationConfig::from_json_str(r#"{ "max_in_flight": 0 }"#).unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "max_in_flight"),
            other => panic!("expected Invalid, got {other:?}"),
        }

        let err = CoordinationConfig::from_json_str(
            r#"{ "ordinary_desired_count": 3, "high_value_desired_count": 2 }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("high_value_desired_count"));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = CoordinationConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_registration_error_messages() {
        let err = RegistrationError::InvalidRange {
            unit: UnitId(4),
            min_range: 10.0,
            max_range: -1.0,
        };
        assert_eq!(err.to_string(), "unit U4 has invalid range envelope [10, -1]");
    }

    #[test]
    fn test_position_geometry() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 4.0, 0.0);
        assert!((a.range_to(&b) - 5.0).abs() < 1e-10);

        let moved = a.advanced_by(&Velocity::new(10.0, 0.0, -2.0), 0.5);
        assert_eq!(moved, Position::new(5.0, 0.0, -1.0));

        let v = Velocity::toward(&a, &b, 10.0);
        assert!((v.speed() - 10.0).abs() < 1e-10);
        assert!((v.x - 6.0).abs() < 1e-10);
        assert_eq!(Velocity::toward(&a, &a, 10.0), Velocity::default());
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..TICK_RATE {
            time.advance();
        }
        assert_eq!(time.tick, TICK_RATE as u64);
        assert!((time.elapsed_secs - 1.0).abs() < 1e-10);
    }

    /// Events are a tagged union so the frontend can switch on `type`.
    #[test]
    fn test_event_serde_tagged() {
        let event = CoordinationEvent::SelfDestruct {
            interceptor: InterceptorId(9),
            reason: SafeReason::NoSubstitute,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"SelfDestruct""#));
        let back: CoordinationEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_tick_report_filters() {
        let report = TickReport {
            now: 1.0,
            events: vec![
                CoordinationEvent::InterceptionSucceeded {
                    threat: ThreatId(1),
                    interceptor: InterceptorId(1),
                    unit: UnitId(0),
                },
                CoordinationEvent::InterceptionFailed {
                    threat: ThreatId(2),
                    interceptor: InterceptorId(2),
                    unit: UnitId(0),
                },
                CoordinationEvent::InterceptorLaunched {
                    interceptor: InterceptorId(3),
                    unit: UnitId(0),
                    threat: ThreatId(2),
                    aim_point: Position::default(),
                    flight_time_secs: 1.0,
                },
            ],
        };
        assert_eq!(report.successes().collect::<Vec<_>>(), vec![ThreatId(1)]);
        assert_eq!(report.failures().collect::<Vec<_>>(), vec![ThreatId(2)]);
        assert_eq!(report.launches(), 1);
    }
}
