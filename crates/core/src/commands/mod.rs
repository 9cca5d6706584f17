pub mod helpers;
pub mod launch;
pub mod profiles;
pub mod resolve;
pub mod status;
pub mod version;
