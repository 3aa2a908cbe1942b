use std::error::Error;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use serde::Deserialize;
use tilestep_core::{Input, Level, LevelData, SimConfig};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Deserialize)]
struct Replay {
    #[serde(default)]
    config: SimConfig,
    level: LevelData,
    inputs: Vec<u8>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or("usage: cargo run -p tilestep_core --bin replay -- <replay.json>")?;
    let raw = fs::read_to_string(&path)?;
    let replay: Replay = serde_json::from_str(&raw)?;

    let mut level = Level::load(&replay.level, replay.config)?;

    let mut out = BufWriter::new(io::stdout().lock());
    writeln!(out, "frame,x,y,vx,vy,state,colliding")?;
    for (frame, bits) in replay.inputs.iter().enumerate() {
        level.tick(Input::from_bits_truncate(*bits));
        let v = level.view();
        writeln!(
            out,
            "{},{},{},{},{},{},{}",
            frame, v.x, v.y, v.vx, v.vy, v.state, v.colliding
        )?;
    }
    out.flush()?;
    Ok(())
}
