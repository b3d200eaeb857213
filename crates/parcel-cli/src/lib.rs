//! Library side of the `parcel` binary: logging setup and the dedup job.

pub mod logging;
pub mod pipeline;
