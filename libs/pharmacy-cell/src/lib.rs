pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use router::{medicine_bill_routes, medicine_draft_routes, medicine_routes};
pub use services::medicines::{build_medicine_state, MedicineState};
