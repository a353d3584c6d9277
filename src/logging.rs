//! Log statements that vanish unless the `logging` feature is enabled.
#![allow(unused_macros)]

macro_rules! debug {
    ($($arg:tt)+) => (
        #[cfg(feature = "logging")]
        log::debug!(target: "hdrvec", $($arg)+);
    )
}

macro_rules! trace {
    ($($arg:tt)+) => (
        #[cfg(feature = "logging")]
        log::trace!(target: "hdrvec", $($arg)+);
    )
}
