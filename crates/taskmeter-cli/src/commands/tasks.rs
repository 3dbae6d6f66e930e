use taskmeter_core::format::format_clock;
use taskmeter_core::Config;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config.tasks)?);
        return Ok(());
    }

    let duration = format_clock(config.timer.initial_duration_secs);
    for task in &config.tasks {
        println!("{:>3}  {}  {}", task.id, duration, task.title);
        if !task.description.is_empty() {
            println!("          {}", task.description);
        }
    }
    Ok(())
}
