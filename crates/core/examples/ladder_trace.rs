//! Climbs down a two-cell ladder, steps off, and prints a JSON summary.

use tilestep_core::{terrain::raw, EntityData, Input, Level, LevelData, PlayerState, SimConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (n, s, l) = (raw::NOTHING, raw::STONE, raw::LADDER);
    #[rustfmt::skip]
    let grid = vec![
        n, n, n, n, n,
        n, n, n, n, n,
        s, s, l, s, s,
        n, n, l, n, n,
        s, s, s, s, s,
    ];
    let data = LevelData {
        cell_size: 16,
        width: 5,
        grid,
        entities: vec![EntityData { id: "Player".into(), x: 32, y: 16 }],
    };
    let mut level = Level::load(&data, SimConfig::default())?;

    let mut ticks = 0u32;
    let mut ladder_ticks = 0u32;
    let mut state = level.tick(Input::CLIMBED_DOWN);
    while state != PlayerState::Idle && ticks < 120 {
        ladder_ticks += (state == PlayerState::LadderClimbing) as u32;
        state = level.tick(Input::CLIMBED_DOWN);
        ticks += 1;
    }
    let state = level.tick(Input::WALKED_RIGHT);

    let summary = serde_json::json!({
        "ticks": ticks,
        "ladder_ticks": ladder_ticks,
        "state": state.to_string(),
        "view": level.view(),
    });
    println!("{summary}");
    Ok(())
}
