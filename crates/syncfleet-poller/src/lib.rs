#![deny(unsafe_code)]

pub mod event;
pub mod gpsd;
pub mod pb;
pub mod supervisor;
pub mod tsync;

pub use event::{
    PollReply, PollerEvent, PollerEventDetail, PollerKey, PollerKind, TpvFix, TsyncQuery,
};
pub use gpsd::{GpsdPoller, GpsdPollerConfig};
pub use supervisor::{PollerSupervisor, PollerTimings};
pub use tsync::{TsyncPoller, TsyncPollerConfig};
