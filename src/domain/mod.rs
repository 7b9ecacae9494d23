//! Domain layer: the pending-order data model, certificate minting, the
//! registry, and the ports external collaborators are reached through.

pub mod certificate;
pub mod order;
pub mod ports;
pub mod registry;
