//! `lightnavi extract` — Show what the extractor reads from one utterance.

use lightnavi_agent::context::extract;

pub fn run(text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let fragment = extract(text);
    println!("{}", serde_json::to_string_pretty(&fragment)?);
    Ok(())
}
