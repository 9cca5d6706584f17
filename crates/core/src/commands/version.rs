use crate::error::AppError;
use serde_json::{json, Value};

pub fn execute() -> Result<Value, AppError> {
    Ok(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "target": std::env::consts::ARCH,
        "os": std::env::consts::OS,
        "url_scheme": crate::descriptor::URL_SCHEME,
    }))
}
