//! Background tasks.
//!
//! Each submodule provides a long-running async function intended to be
//! spawned via `tokio::spawn`. All tasks accept a [`CancellationToken`]
//! for shutdown.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub mod stream;
