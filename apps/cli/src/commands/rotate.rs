use anyhow::Context;
use rotator_aws::{IamIdentityService, SsmParameterStore};
use rotator_credential::prelude::*;

use crate::config::{RotatorConfig, SecretConfig, SinkConfig, SourceConfig};

/// Runs the selected rotations in file order, stopping at the first failure
pub async fn run(config: &RotatorConfig, names: &[String]) -> anyhow::Result<()> {
    for secret in config.select(names)? {
        let rotation = build(secret).await?;
        let outcome = rotation
            .run()
            .await
            .with_context(|| format!("rotating secret '{}'", secret.name))?;

        match outcome {
            RotationOutcome::Rotated { keys } => println!("{}: rotated ({keys} keys)", secret.name),
            RotationOutcome::Unchanged => println!("{}: unchanged", secret.name),
        }
    }

    Ok(())
}

async fn build(secret: &SecretConfig) -> anyhow::Result<Rotation> {
    let source = build_source(&secret.source)
        .await
        .with_context(|| format!("building source for '{}'", secret.name))?;

    let mut sinks = Vec::with_capacity(secret.sinks.len());
    for sink in &secret.sinks {
        let built = build_sink(sink)
            .await
            .with_context(|| format!("building {} sink for '{}'", sink.kind(), secret.name))?;
        sinks.push(SinkBinding::with_mapping(built, sink.key_to_name().clone())?);
    }

    Ok(Rotation::new(secret.name.clone(), source, sinks))
}

async fn build_source(config: &SourceConfig) -> anyhow::Result<Box<dyn Source>> {
    let source: Box<dyn Source> = match config {
        SourceConfig::AwsIam(c) => {
            let identity = IamIdentityService::from_config(&c.aws).await?;
            Box::new(IamKeySource::new(c.source.clone(), identity)?)
        }
        SourceConfig::Random(c) => Box::new(RandomSource::new(c.clone())?),
    };
    Ok(source)
}

async fn build_sink(config: &SinkConfig) -> anyhow::Result<Box<dyn Sink>> {
    let sink: Box<dyn Sink> = match config {
        SinkConfig::AwsParameterStore(c) => {
            Box::new(ParameterSink::new(SsmParameterStore::from_config(&c.aws).await?))
        }
        SinkConfig::Memory(_) => Box::new(MemorySink::new()),
    };
    Ok(sink)
}
