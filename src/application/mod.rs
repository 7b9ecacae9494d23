//! Application layer: settlement orchestration, invoice creation, certificate
//! validation, and the operator views over the order log.

pub mod certificates;
pub mod invoice;
pub mod settlement;
pub mod views;
