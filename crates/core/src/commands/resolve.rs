use crate::{
    commands::helpers::{parse_descriptor, DescriptorSource},
    dispatcher::Dispatcher,
    error::AppError,
};
use serde_json::{json, Value};

pub struct ResolveArgs {
    pub source: DescriptorSource,
}

/// Dry run of `launch`: selects the profile and compiles the invocation
/// without spawning. Artifacts the profile references are still written.
pub fn execute(args: ResolveArgs, dispatcher: &Dispatcher) -> Result<Value, AppError> {
    let descriptor = parse_descriptor(&args.source)?;
    match dispatcher.plan(&descriptor)? {
        Some(plan) => {
            let mut data = plan.to_json();
            data["matched"] = Value::Bool(true);
            Ok(data)
        }
        None => Ok(json!({
            "matched": false,
            "reason": "no_matching_application",
            "protocol": descriptor.protocol.as_str(),
        })),
    }
}
