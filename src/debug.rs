use crate::controller::ControllerResult;
use crate::observer::Observation;
use crate::vehicle::PilotCommand;
#[cfg(feature = "debug")]
use serde_json::json;

#[cfg(feature = "debug")]
thread_local!(
    static DEBUG_FRAME: std::cell::RefCell<Vec<serde_json::Value>> = Default::default();
);

#[allow(unused)]
pub fn debug_observation(name: &str, observation: &Observation) {
    #[cfg(feature = "debug")]
    DEBUG_FRAME.with(|frame| {
        frame.borrow_mut().push(json!({
            "type": "observation",
            "name": name,
            "observation": observation,
        }))
    })
}

#[allow(unused)]
pub fn debug_command(name: &str, pcmd: &PilotCommand, result: ControllerResult) {
    #[cfg(feature = "debug")]
    DEBUG_FRAME.with(|frame| {
        frame.borrow_mut().push(json!({
            "type": "command",
            "name": name,
            "velocity": pcmd.velocity,
            "yaw_rate": pcmd.yaw_rate,
            "result": result,
        }))
    })
}

#[cfg(feature = "debug")]
pub fn take_debug_frame() -> serde_json::Value {
    json!(DEBUG_FRAME.with(|frame| frame.take()))
}
