use crate::config::RotatorConfig;

/// `load` has already validated; this only reports what was found
pub fn run(config: &RotatorConfig) {
    for secret in &config.secrets {
        let sinks: Vec<_> = secret.sinks.iter().map(|sink| sink.kind()).collect();
        println!(
            "{}: {} -> {}",
            secret.name,
            secret.source.kind(),
            sinks.join(", ")
        );
    }
    println!("config ok ({} secrets)", config.secrets.len());
}
