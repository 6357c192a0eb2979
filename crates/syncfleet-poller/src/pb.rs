//! Checked-in protobuf stubs for the tsynctl control API.

#[allow(clippy::all)]
pub mod tsynctl {
    pub mod v1 {
        include!("generated/tsynctl.v1.rs");
    }
}
