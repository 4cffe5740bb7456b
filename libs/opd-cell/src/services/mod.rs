pub mod opd;
pub mod prescription;

pub use opd::OpdService;
pub use prescription::PrescriptionService;
