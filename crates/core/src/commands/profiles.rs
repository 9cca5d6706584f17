use crate::{descriptor::Protocol, error::AppError, registry::AppRegistry};
use serde_json::{json, Value};

pub struct ProfilesArgs {
    pub protocol: Option<String>,
}

pub fn execute(args: ProfilesArgs, registry: &AppRegistry) -> Result<Value, AppError> {
    let filter = args.protocol.as_deref().map(Protocol::from);
    let profiles: Vec<Value> = registry
        .entries()
        .iter()
        .filter(|e| match &filter {
            Some(p) => e.category == p.category() && e.profile.supports(p),
            None => true,
        })
        .map(|e| {
            json!({
                "name": e.profile.name,
                "display_name": e.profile.display_name,
                "category": e.category,
                "protocols": e.profile.protocols,
                "path": e.profile.path,
                "bundled": e.profile.bundled,
                "automation": e.profile.needs_automation(),
            })
        })
        .collect();

    Ok(json!({ "count": profiles.len(), "profiles": profiles }))
}
