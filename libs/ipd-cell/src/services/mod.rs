pub mod ipd;

pub use ipd::IpdService;
