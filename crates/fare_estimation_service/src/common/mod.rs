pub mod fare;
pub mod filter;
pub mod rate_policy;
pub mod scheduler;
pub mod types;
pub mod utils;
