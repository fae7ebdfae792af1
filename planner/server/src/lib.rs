pub mod config {
    use chrono::NaiveTime;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Clone)]
    pub struct Config {
        pub database_url: String,
        #[serde(default = "default_port")]
        pub port: u16,
        /// Local wall-clock time (`HH:MM:SS`) at which the hydration counter is reset.
        #[serde(default = "default_hydration_reset_time")]
        pub hydration_reset_time: NaiveTime,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_environment(config::Environment::default())
        }

        fn from_environment(environment: config::Environment) -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(environment)
                .build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }
    }

    fn default_port() -> u16 {
        3100
    }

    fn default_hydration_reset_time() -> NaiveTime {
        NaiveTime::MIN
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        fn environment(vars: &[(&str, &str)]) -> config::Environment {
            let source: config::Map<String, String> = vars
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect();
            config::Environment::default().source(Some(source))
        }

        #[test]
        fn can_apply_defaults_when_only_database_url_is_set() {
            let config =
                Config::from_environment(environment(&[("DATABASE_URL", "sqlite::memory:")]))
                    .unwrap();

            assert_eq!(config.database_url, "sqlite::memory:");
            assert_eq!(config.port, 3100);
            assert_eq!(config.hydration_reset_time, NaiveTime::MIN);
        }

        #[test]
        fn can_override_port_and_reset_time() {
            let config = Config::from_environment(environment(&[
                ("DATABASE_URL", "postgres://localhost/planner"),
                ("PORT", "8080"),
                ("HYDRATION_RESET_TIME", "05:30:00"),
            ]))
            .unwrap();

            assert_eq!(config.port, 8080);
            assert_eq!(
                config.hydration_reset_time,
                NaiveTime::from_hms_opt(5, 30, 0).unwrap()
            );
        }

        #[test]
        fn can_reject_missing_database_url() {
            let result = Config::from_environment(environment(&[("PORT", "8080")]));
            assert!(result.is_err());
        }
    }
}
pub mod entities;
pub mod hydration;
pub mod schedule;
pub mod task;
pub mod validation;
pub mod web;
