pub mod action;
pub mod adapter;
pub mod cipher;
pub mod commands;
pub mod config;
pub mod descriptor;
pub mod dispatcher;
pub mod error;
pub mod mapping;
pub mod payload;
pub mod registry;
pub mod retry;
pub mod sequencer;
pub mod template;

pub use action::{AutomationStep, KeyCombo, Modifier, StepAction};
pub use adapter::{BackendStatus, NoopAdapter, PlatformAdapter};
pub use descriptor::{AppCategory, ConnectionDescriptor, Protocol, Secret};
pub use dispatcher::{
    DispatchOutcome, Dispatcher, LaunchContext, LaunchPlan, LaunchReport, ProcessLauncher,
    SystemLauncher,
};
pub use error::{AdapterError, AppError, ErrorCode};
pub use mapping::SubstitutionMapping;
pub use registry::{AppProfile, AppRegistry, Platform};
pub use sequencer::{SequenceReport, Sequencer, Timing};
pub use template::Invocation;
