use power1440_core::{ClockReading, SystemClock};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let reading = ClockReading::from_source(&SystemClock);
    println!("{}", serde_json::to_string_pretty(&reading)?);
    Ok(())
}
