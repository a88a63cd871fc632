//! Aggregated reports.

pub mod supplier_dashboard;
pub mod vendor_availability;

pub use self::{
    supplier_dashboard::SupplierDashboard,
    vendor_availability::VendorAvailability,
};
