// src/services/mod.rs

//! Application services: case discovery, job lifecycle, data transfer.

pub mod case;
pub mod job;
pub mod transfer;

pub use case::CaseService;
pub use job::JobService;
pub use transfer::TransferService;
