use crate::{
    commands::helpers::{parse_descriptor, DescriptorSource},
    dispatcher::{DispatchOutcome, Dispatcher},
    error::AppError,
};
use serde_json::{json, Value};

pub struct LaunchArgs {
    pub source: DescriptorSource,
}

pub fn execute(args: LaunchArgs, dispatcher: &Dispatcher) -> Result<Value, AppError> {
    let descriptor = parse_descriptor(&args.source)?;
    match dispatcher.dispatch(&descriptor)? {
        DispatchOutcome::NoMatchingProfile { protocol } => Ok(json!({
            "launched": false,
            "reason": "no_matching_application",
            "protocol": protocol,
        })),
        DispatchOutcome::Launched(report) => {
            let mut data = serde_json::to_value(&report)?;
            data["launched"] = Value::Bool(true);
            if let Some(automation) = &report.automation {
                data["automation_completed"] = Value::Bool(automation.completed());
            }
            Ok(data)
        }
    }
}
