pub mod bills;
pub mod drafts;
pub mod medicines;

pub use bills::MedicineBillService;
pub use drafts::DraftBillService;
