//! 백그라운드 서비스 모듈.

pub mod poller;

pub use poller::{spawn_poller, CycleOutcome, SnapshotPoller};
