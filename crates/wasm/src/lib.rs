use wasm_bindgen::prelude::*;
use tilestep_core::{Input, Level, LevelData, SimConfig};

#[wasm_bindgen]
pub struct Core {
    config: SimConfig,
    data: LevelData,
    level: Level,
}

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
impl Core {
    /// Loads a level from its JSON description with the default config.
    #[wasm_bindgen(constructor)]
    pub fn new(level_json: &str) -> Result<Core, JsValue> {
        let data: LevelData = serde_json::from_str(level_json).map_err(js_err)?;
        let config = SimConfig::default();
        let level = Level::load(&data, config).map_err(js_err)?;
        Ok(Core { config, data, level })
    }

    /// Replaces the config and restarts the level. Missing fields keep
    /// their defaults.
    pub fn set_config_json(&mut self, json: &str) -> Result<(), JsValue> {
        let config: SimConfig = serde_json::from_str(json).map_err(js_err)?;
        self.level = Level::load(&self.data, config).map_err(js_err)?;
        self.config = config;
        Ok(())
    }

    /// Puts the player back at the start.
    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.level = Level::load(&self.data, self.config).map_err(js_err)?;
        Ok(())
    }

    /// Step one tick and return the player as a JS object.
    pub fn step(&mut self, input_bits: u8) -> Result<JsValue, JsValue> {
        let state = self.level.tick(Input::from_bits_truncate(input_bits));
        let v = self.level.view();

        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"x".into(), &JsValue::from_f64(v.x as f64))?;
        js_sys::Reflect::set(&obj, &"y".into(), &JsValue::from_f64(v.y as f64))?;
        js_sys::Reflect::set(&obj, &"vx".into(), &JsValue::from_f64(v.vx))?;
        js_sys::Reflect::set(&obj, &"vy".into(), &JsValue::from_f64(v.vy))?;
        js_sys::Reflect::set(&obj, &"state".into(), &JsValue::from_str(&state.to_string()))?;
        js_sys::Reflect::set(&obj, &"colliding".into(), &JsValue::from_f64(v.colliding as f64))?;

        Ok(JsValue::from(obj))
    }
}
