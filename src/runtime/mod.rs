//! Application runtime: execution modes and server lifecycle

pub mod modes;
