//! Parameter document layout shared with the cloud agent.
//!
//! ```json
//! {"Light": {"Power": true}}
//! ```

use serde_json::{Value, json};

use smartlight_domain::error::DecodeError;
use smartlight_domain::light::LightState;

/// Name of the light device in the parameter document.
pub const DEVICE_NAME: &str = "Light";
/// Name of the power parameter.
pub const POWER_PARAM: &str = "Power";

/// Render `state` as a parameter document.
#[must_use]
pub fn to_params(state: &LightState) -> Value {
    json!({ DEVICE_NAME: { POWER_PARAM: state.power } })
}

/// Extract the requested power from a parameter document.
///
/// # Errors
///
/// Returns a [`DecodeError`] when the device or the parameter is missing,
/// or when the parameter is not a boolean.
pub fn power_from_params(params: &Value) -> Result<bool, DecodeError> {
    params
        .get(DEVICE_NAME)
        .ok_or(DecodeError::MissingField(DEVICE_NAME))?
        .get(POWER_PARAM)
        .ok_or(DecodeError::MissingField(POWER_PARAM))?
        .as_bool()
        .ok_or(DecodeError::InvalidParam {
            field: POWER_PARAM,
            expected: "boolean",
        })
}
