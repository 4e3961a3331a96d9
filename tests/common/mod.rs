#![allow(dead_code, unused_imports)]

pub use fleetrun_test_utils::builders;
pub use fleetrun_test_utils::{init_tracing, with_timeout};
