pub mod ad;
pub mod cv;
pub mod payment;
