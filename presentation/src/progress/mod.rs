//! Progress reporting for pipeline runs

pub mod reporter;
