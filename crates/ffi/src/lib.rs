use tilestep_core::{Input, Level, LevelData, PlayerView, SimConfig};
use tracing::warn;

/// Writes the default configuration to `out`.
#[no_mangle]
pub extern "C" fn core_default_config(out: *mut SimConfig) {
    if out.is_null() {
        warn!("core_default_config: null out pointer");
        return;
    }
    unsafe { *out = SimConfig::default(); }
}

/// Loads a level from a row-major array of packed terrain codes.
///
/// Returns null if the level is rejected. A non-null result must be released
/// with [`core_level_free`].
#[no_mangle]
pub extern "C" fn core_level_new(
    config: *const SimConfig,
    codes: *const u32,
    len: usize,
    width: usize,
    cell_size: i32,
    start_x: i32,
    start_y: i32,
) -> *mut Level {
    if config.is_null() || (codes.is_null() && len != 0) {
        warn!("core_level_new: null pointer");
        return std::ptr::null_mut();
    }
    let cfg = unsafe { *config };
    let grid = if len == 0 {
        Vec::new()
    } else {
        unsafe { std::slice::from_raw_parts(codes, len) }.to_vec()
    };
    let data = LevelData {
        cell_size,
        width,
        grid,
        entities: vec![tilestep_core::EntityData { id: "Player".into(), x: start_x, y: start_y }],
    };

    match Level::load(&data, cfg) {
        Ok(level) => Box::into_raw(Box::new(level)),
        Err(err) => {
            warn!(%err, "core_level_new: level rejected");
            std::ptr::null_mut()
        }
    }
}

#[no_mangle]
pub extern "C" fn core_level_free(level: *mut Level) {
    if !level.is_null() {
        drop(unsafe { Box::from_raw(level) });
    }
}

/// One fixed tick. Unknown input bits are ignored. A null level yields a
/// zeroed view.
#[no_mangle]
pub extern "C" fn core_step(level: *mut Level, input_bits: u8) -> PlayerView {
    let Some(level) = (unsafe { level.as_mut() }) else {
        warn!("core_step: null level");
        return PlayerView::default();
    };
    level.tick(Input::from_bits_truncate(input_bits));
    level.view()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilestep_core::terrain::raw;
    use tilestep_core::PlayerState;

    #[test]
    fn null_level_steps_to_zeroed_view() {
        assert_eq!(core_step(std::ptr::null_mut(), 0xff), PlayerView::default());
        core_level_free(std::ptr::null_mut());
    }

    #[test]
    fn level_lifecycle() {
        let mut cfg = SimConfig { tick_rate: 0.0, ..SimConfig::default() };
        core_default_config(&mut cfg);
        assert_eq!(cfg, SimConfig::default());

        let codes = [raw::NOTHING, raw::NOTHING, raw::STONE, raw::STONE];
        let level = core_level_new(&cfg, codes.as_ptr(), codes.len(), 2, 16, 0, 0);
        assert!(!level.is_null());
        let view = core_step(level, 0);
        assert_eq!((view.x, view.y, view.state), (0, 0, PlayerState::Idle));
        core_level_free(level);

        let rejected = core_level_new(&cfg, codes.as_ptr(), codes.len(), 3, 16, 0, 0);
        assert!(rejected.is_null());
    }
}
