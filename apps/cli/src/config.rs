//! Rotator configuration file
//!
//! Loaded from TOML or YAML (picked by extension) through figment. The
//! `[log]` table starts from `rotator_log::Config::from_env()` (so `RUST_LOG`,
//! `ROTATOR_LOG_TIME` and `ROTATOR_LOG_COLORS` seed it), the file overrides
//! that, and `ROTATOR_LOG_LEVEL` / `ROTATOR_LOG_FORMAT` override the file.
//!
//! The `aws_iam` source flattens its fields next to `aws`, where
//! `deny_unknown_fields` cannot apply; leftover keys are collected and
//! rejected by [`RotatorConfig::validate`] instead.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use rotator_aws::AwsClientConfig;
use rotator_credential::{
    ConfigError, IamKeySourceConfig, ProviderConfig, RandomSourceConfig, check_key_mapping,
};
use serde::Deserialize;
use serde::de::IgnoredAny;

/// Top-level config file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RotatorConfig {
    #[serde(default)]
    pub log: rotator_log::Config,

    #[serde(default)]
    pub secrets: Vec<SecretConfig>,
}

/// One rotated secret: a source and the sinks it is published to
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretConfig {
    pub name: String,
    pub source: SourceConfig,
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    AwsIam(AwsIamSourceConfig),
    Random(RandomSourceConfig),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AwsIamSourceConfig {
    #[serde(flatten)]
    pub source: IamKeySourceConfig,
    #[serde(default)]
    pub aws: AwsClientConfig,
    /// Whatever `source` did not consume; must end up empty
    #[serde(flatten)]
    unknown: BTreeMap<String, IgnoredAny>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SinkConfig {
    AwsParameterStore(AwsParameterStoreSinkConfig),
    /// Keeps the snapshot in memory for the length of the run
    Memory(MemorySinkConfig),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AwsParameterStoreSinkConfig {
    #[serde(default)]
    pub key_to_name: BTreeMap<String, String>,
    #[serde(default)]
    pub aws: AwsClientConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemorySinkConfig {
    #[serde(default)]
    pub key_to_name: BTreeMap<String, String>,
}

impl SourceConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AwsIam(_) => "aws_iam",
            Self::Random(_) => "random",
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::AwsIam(c) => {
                if let Some(field) = c.unknown.keys().next() {
                    return Err(ConfigError::InvalidValue {
                        field: field.clone(),
                        reason: "unknown field for an aws_iam source".into(),
                    });
                }
                checked(&c.source)?;
                checked(&c.aws)
            }
            Self::Random(c) => checked(c),
        }
    }
}

impl SinkConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AwsParameterStore(_) => "aws_parameter_store",
            Self::Memory(_) => "memory",
        }
    }

    pub fn key_to_name(&self) -> &BTreeMap<String, String> {
        match self {
            Self::AwsParameterStore(c) => &c.key_to_name,
            Self::Memory(c) => &c.key_to_name,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some((key, _)) = self.key_to_name().iter().find(|(_, name)| name.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: format!("key_to_name.{key}"),
                reason: "target name must not be empty".into(),
            });
        }
        check_key_mapping(self.key_to_name())?;

        match self {
            Self::AwsParameterStore(c) => checked(&c.aws),
            Self::Memory(_) => Ok(()),
        }
    }
}

/// Validate a component config, prefixing errors with the component name
fn checked(config: &impl ProviderConfig) -> Result<(), ConfigError> {
    config
        .validate()
        .map_err(|e| ConfigError::ValidationFailed(format!("{}: {e}", config.provider_name())))
}

impl RotatorConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.is_file() {
            bail!("config file not found: {}", path.display());
        }

        let base = Figment::from(Serialized::default("log", rotator_log::Config::from_env()));
        let figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => base.merge(Toml::file(path)),
            Some("yaml" | "yml") => base.merge(Yaml::file(path)),
            _ => bail!(
                "unsupported config format for {} (expected .toml, .yaml or .yml)",
                path.display()
            ),
        }
        .merge(
            Env::prefixed("ROTATOR_LOG_")
                .only(&["level", "format"])
                .map(|key| format!("log.{key}").into()),
        );

        Self::from_figment(figment).with_context(|| format!("loading {}", path.display()))
    }

    fn from_figment(figment: Figment) -> anyhow::Result<Self> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Structural and per-component validation; never touches the network
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secrets.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "secrets".into(),
            });
        }

        let mut seen = BTreeSet::new();
        for secret in &self.secrets {
            let name = secret.name.trim();
            if name.is_empty() {
                return Err(ConfigError::MissingRequired {
                    field: "secrets[].name".into(),
                });
            }
            if !seen.insert(name) {
                return Err(ConfigError::ValidationFailed(format!(
                    "duplicate secret name '{name}'"
                )));
            }
            if secret.sinks.is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "secret '{name}' has no sinks"
                )));
            }

            secret.source.validate().map_err(|e| {
                ConfigError::ValidationFailed(format!("secret '{name}' source: {e}"))
            })?;
            for (i, sink) in secret.sinks.iter().enumerate() {
                sink.validate().map_err(|e| {
                    ConfigError::ValidationFailed(format!("secret '{name}' sink #{i}: {e}"))
                })?;
            }
        }

        Ok(())
    }

    /// Secrets filtered by name, in file order; every requested name must exist
    pub fn select(&self, names: &[String]) -> anyhow::Result<Vec<&SecretConfig>> {
        if let Some(unknown) = names
            .iter()
            .find(|name| !self.secrets.iter().any(|s| &s.name == *name))
        {
            bail!("unknown secret '{unknown}'");
        }

        Ok(self
            .secrets
            .iter()
            .filter(|s| names.is_empty() || names.contains(&s.name))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    const TOML: &str = r#"
        [log]
        level = "debug"

        [[secrets]]
        name = "ci-deployer"

        [secrets.source]
        kind = "aws_iam"
        user_name = "ci-deployer"
        max_age = "2h"
        aws = { region = "us-west-2", role_arn = "arn:aws:iam::123456789012:role/rotator" }

        [[secrets.sinks]]
        kind = "aws_parameter_store"
        aws = { region = "us-west-2" }
        key_to_name = { accessKeyId = "/ci/aws_access_key_id", secretAccessKey = "/ci/aws_secret_access_key" }
    "#;

    const YAML: &str = r"
secrets:
  - name: webhook
    source:
      kind: random
      length: 48
    sinks:
      - kind: memory
";

    fn parse_toml(src: &str) -> anyhow::Result<RotatorConfig> {
        RotatorConfig::from_figment(Figment::from(Toml::string(src)))
    }

    #[test]
    fn parses_toml() {
        let config = parse_toml(TOML).unwrap();

        assert_eq!(config.log.level, "debug");
        assert_eq!(config.secrets.len(), 1);
        let secret = &config.secrets[0];
        assert_eq!(secret.name, "ci-deployer");

        let SourceConfig::AwsIam(source) = &secret.source else {
            panic!("expected aws_iam source");
        };
        assert_eq!(source.source.user_name, "ci-deployer");
        assert_eq!(source.source.max_age, Duration::from_secs(2 * 3600));
        assert_eq!(source.aws.region.as_deref(), Some("us-west-2"));

        assert_eq!(secret.sinks[0].kind(), "aws_parameter_store");
        assert_eq!(
            secret.sinks[0].key_to_name().get("accessKeyId").map(String::as_str),
            Some("/ci/aws_access_key_id")
        );
    }

    #[test]
    fn parses_yaml_with_defaults() {
        let config =
            RotatorConfig::from_figment(Figment::from(Yaml::string(YAML))).unwrap();

        assert_eq!(config.log, rotator_log::Config::default());
        let SourceConfig::Random(source) = &config.secrets[0].source else {
            panic!("expected random source");
        };
        assert_eq!(source.length, 48);
        assert_eq!(source.key, "secret");
        assert!(config.secrets[0].sinks[0].key_to_name().is_empty());
    }

    #[test]
    fn max_age_defaults_when_omitted() {
        let src = TOML.replace("max_age = \"2h\"", "");
        let config = parse_toml(&src).unwrap();

        let SourceConfig::AwsIam(source) = &config.secrets[0].source else {
            panic!("expected aws_iam source");
        };
        assert_eq!(source.source.max_age, rotator_credential::prelude::DEFAULT_MAX_AGE);
    }

    #[test]
    fn empty_file_has_no_secrets() {
        let err = parse_toml("").unwrap_err();
        assert!(err.to_string().contains("secrets"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let src = format!("{TOML}\n{}", TOML.replace("[log]\n        level = \"debug\"", ""));
        let err = parse_toml(&src).unwrap_err();
        assert!(err.to_string().contains("duplicate secret name 'ci-deployer'"));
    }

    #[test]
    fn secret_without_sinks_is_rejected() {
        let src = r#"
            [[secrets]]
            name = "lonely"
            source = { kind = "random" }
        "#;
        let err = parse_toml(src).unwrap_err();
        assert!(err.to_string().contains("secret 'lonely' has no sinks"));
    }

    #[test]
    fn bad_endpoint_in_sink_is_rejected() {
        let src = TOML.replace(
            "aws = { region = \"us-west-2\" }",
            "aws = { endpoint_url = \"localhost:4566\" }",
        );
        let err = parse_toml(&src).unwrap_err();
        assert!(err.to_string().contains("sink #0"));
    }

    #[test]
    fn unknown_source_kind_is_rejected() {
        let src = r#"
            [[secrets]]
            name = "x"
            source = { kind = "vault" }
            sinks = [{ kind = "memory" }]
        "#;
        assert!(parse_toml(src).is_err());
    }

    #[test]
    fn select_keeps_file_order_and_rejects_unknown() {
        let src = r#"
            [[secrets]]
            name = "a"
            source = { kind = "random" }
            sinks = [{ kind = "memory" }]

            [[secrets]]
            name = "b"
            source = { kind = "random" }
            sinks = [{ kind = "memory" }]
        "#;
        let config = parse_toml(src).unwrap();

        let all: Vec<_> = config.select(&[]).unwrap().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(all, vec!["a", "b"]);

        let only_b: Vec<_> = config
            .select(&["b".to_string()])
            .unwrap()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(only_b, vec!["b"]);

        let err = config.select(&["c".to_string()]).unwrap_err();
        assert_eq!(err.to_string(), "unknown secret 'c'");
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();

        let err = RotatorConfig::load(file.path()).unwrap_err();

        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = RotatorConfig::load(Path::new("/nonexistent/rotator.toml")).unwrap_err();
        assert!(err.to_string().starts_with("config file not found"));
    }

    #[test]
    fn sink_mapping_with_shared_target_is_rejected() {
        let src = r#"
            [[secrets]]
            name = "webhook"
            source = { kind = "random" }
            sinks = [{ kind = "memory", key_to_name = { secret = "/x", other = "/x" } }]
        "#;

        let err = parse_toml(src).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("secret 'webhook' sink #0"));
        assert!(message.contains("key_to_name: 'other' and 'secret' both map to '/x'"));
    }

    #[test]
    fn component_errors_name_the_component() {
        let src = r#"
            [[secrets]]
            name = "short"
            source = { kind = "random", length = 4 }
            sinks = [{ kind = "memory" }]
        "#;

        let err = parse_toml(src).unwrap_err();

        assert!(err.to_string().contains("secret 'short' source: Validation failed: RandomSource:"));
    }

    #[test]
    fn misspelled_iam_field_is_rejected() {
        let src = TOML.replace("max_age = \"2h\"", "maxage = \"2h\"");

        let err = parse_toml(&src).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("secret 'ci-deployer' source"));
        assert!(message.contains("maxage: unknown field for an aws_iam source"));
    }
}
