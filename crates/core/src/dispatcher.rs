use crate::{
    action::AutomationStep,
    adapter::PlatformAdapter,
    descriptor::ConnectionDescriptor,
    error::AppError,
    mapping::SubstitutionMapping,
    payload,
    registry::AppRegistry,
    sequencer::{SequenceReport, Sequencer, Timing},
    template::Invocation,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::info;

pub const RAW_COMMAND_PROFILE: &str = "command";

/// Process-wide state, built once at start and shared by reference.
pub struct LaunchContext {
    pub registry: AppRegistry,
    /// Per-user directory for generated artifacts.
    pub artifact_dir: PathBuf,
    /// Base for bundled application paths.
    pub install_dir: PathBuf,
    pub timing: Timing,
}

pub trait ProcessLauncher {
    /// Starts the process without waiting for it and returns its pid.
    fn spawn(&self, invocation: &Invocation) -> Result<u32, AppError>;
}

pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn spawn(&self, invocation: &Invocation) -> Result<u32, AppError> {
        let child = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.expose())))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| AppError::Spawn {
                program: invocation.program.display().to_string(),
                source,
            })?;
        Ok(child.id())
    }
}

/// Everything needed to start one client, before anything is spawned.
#[derive(Debug)]
pub struct LaunchPlan {
    pub profile: String,
    pub invocation: Invocation,
    pub mapping: SubstitutionMapping,
    pub steps: Vec<AutomationStep>,
}

impl LaunchPlan {
    pub fn to_json(&self) -> Value {
        json!({
            "profile": self.profile,
            "invocation": self.invocation.redacted(&self.mapping),
            "automation_steps": self.steps.len(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct LaunchReport {
    pub profile: String,
    pub program: String,
    pub pid: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automation: Option<SequenceReport>,
}

#[derive(Debug)]
pub enum DispatchOutcome {
    NoMatchingProfile { protocol: String },
    Launched(LaunchReport),
}

pub struct Dispatcher<'a> {
    ctx: &'a LaunchContext,
    adapter: &'a dyn PlatformAdapter,
    launcher: &'a dyn ProcessLauncher,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        ctx: &'a LaunchContext,
        adapter: &'a dyn PlatformAdapter,
        launcher: &'a dyn ProcessLauncher,
    ) -> Self {
        Self { ctx, adapter, launcher }
    }

    /// Selects a profile, builds payloads and compiles the invocation.
    /// `None` when no profile supports the protocol; nothing is written then.
    pub fn plan(&self, d: &ConnectionDescriptor) -> Result<Option<LaunchPlan>, AppError> {
        if let Some(command) = &d.raw_command {
            return raw_command_plan(d, command).map(Some);
        }

        let Some(profile) = self.ctx.registry.find(&d.protocol) else {
            info!(protocol = %d.protocol, "no application configured for protocol");
            return Ok(None);
        };

        let payload = payload::build(d, profile, &self.ctx.artifact_dir)?;
        let program = profile.executable(&self.ctx.install_dir);
        let mut invocation = Invocation::compile(program, &profile.arg_template, &payload.mapping);
        for (key, value) in payload.env {
            invocation = invocation.with_env(key, value);
        }

        Ok(Some(LaunchPlan {
            profile: profile.name.clone(),
            invocation,
            mapping: payload.mapping,
            steps: profile.automation_steps.clone(),
        }))
    }

    pub fn dispatch(&self, d: &ConnectionDescriptor) -> Result<DispatchOutcome, AppError> {
        let Some(plan) = self.plan(d)? else {
            return Ok(DispatchOutcome::NoMatchingProfile { protocol: d.protocol.to_string() });
        };

        let pid = self.launcher.spawn(&plan.invocation)?;
        info!(
            profile = %plan.profile,
            program = %plan.invocation.program.display(),
            pid,
            "launched client"
        );

        let automation = if plan.steps.is_empty() {
            None
        } else {
            let sequencer = Sequencer::new(self.adapter, &plan.mapping, &self.ctx.timing);
            Some(sequencer.run(&plan.steps))
        };

        Ok(DispatchOutcome::Launched(LaunchReport {
            profile: plan.profile,
            program: plan.invocation.program.display().to_string(),
            pid,
            automation,
        }))
    }
}

fn raw_command_plan(d: &ConnectionDescriptor, command: &str) -> Result<LaunchPlan, AppError> {
    let mut parts = command.split_whitespace().map(String::from);
    let program = parts
        .next()
        .ok_or_else(|| AppError::invalid_input("Empty command"))?;
    Ok(LaunchPlan {
        profile: RAW_COMMAND_PROFILE.into(),
        invocation: Invocation::new(program, parts.collect()),
        mapping: SubstitutionMapping::from_descriptor(d),
        steps: Vec::new(),
    })
}
