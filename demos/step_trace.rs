use postsim::core::buffer::SlotView;
use postsim::{NetworkConfig, SimulationEngine};

fn format_buffer(slots: &[SlotView]) -> String {
    slots
        .iter()
        .map(|s| match s.post {
            Some(post) => format!("[{}:{}@{:.3}]", s.index, post, s.enqueued_at),
            None => format!("[{}:-]", s.index),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .format_timestamp(None)
        .init();

    // Usage: postsim_trace [steps]
    let steps: u64 = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => NetworkConfig::default().step_budget,
    };

    let mut engine = SimulationEngine::new(NetworkConfig::default())?;
    engine.bootstrap();

    let mut cursor = 0;
    for _ in 0..steps {
        if !engine.step()? {
            println!("calendar empty, stopping");
            break;
        }

        for record in engine.log().since(cursor) {
            println!("{}", record);
        }
        cursor = engine.log().len();

        let devices: Vec<String> = engine.device_view().iter().map(|d| d.to_string()).collect();
        let last = engine
            .buffer_last_index()
            .map_or("-".to_string(), |i| i.to_string());
        println!("    buffer: {}", format_buffer(&engine.buffer_view()));
        println!(
            "    devices: {}  cursor={} last_index={}",
            devices.join(" "),
            engine.device_cursor(),
            last
        );
        println!("    stats: {}", engine.stats());
    }
    Ok(())
}
