pub mod liveness;
pub mod readiness;
pub mod watch;
