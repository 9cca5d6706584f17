pub mod adapter;
pub mod key_dispatch;
pub mod script;

pub use adapter::MacOSAdapter;
