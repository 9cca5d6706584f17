pub mod adapter;
pub mod xdotool;

pub use adapter::LinuxAdapter;
