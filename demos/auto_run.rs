use postsim::{NetworkConfig, SimulationEngine, DEFAULT_MAX_TIME};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    // Usage: postsim_auto [steps] [seed] [--direct]
    let args: Vec<String> = std::env::args().skip(1).collect();
    let direct = args.iter().any(|a| a == "--direct");
    let mut positional = args.iter().filter(|a| !a.starts_with("--"));

    let mut config = NetworkConfig::default()
        .with_step_budget(50_000)
        .with_direct_placement(direct);
    if let Some(steps) = positional.next() {
        config = config.with_step_budget(steps.parse()?);
    }
    if let Some(seed) = positional.next() {
        config = config.with_seed(seed.parse()?);
    }

    println!("Configuration:");
    println!(
        "  buffer={} devices={} sources={}",
        config.buffer_capacity, config.device_count, config.source_count
    );
    println!(
        "  inter-arrival=U({}, {}) service=Exp({}) direct={} seed={}",
        config.interarrival.0,
        config.interarrival.1,
        config.service_rate,
        config.direct_placement,
        config.seed
    );
    println!("  step budget={} horizon={}", config.step_budget, DEFAULT_MAX_TIME);
    println!();

    let steps = config.step_budget;
    let mut engine = SimulationEngine::new(config)?;
    engine.bootstrap();
    let summary = engine.run_automatic(steps, DEFAULT_MAX_TIME)?;

    println!("{:<20} {:>12}", "parameter", "value");
    for (name, value) in summary.rows() {
        println!("{:<20} {:>12}", name, value);
    }
    Ok(())
}
