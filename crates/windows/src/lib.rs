pub mod adapter;
pub mod sendkeys;

pub use adapter::WindowsAdapter;
