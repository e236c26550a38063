//! Business logic services for StockMaster Pro

pub mod adjustment;
pub mod catalog;
pub mod dashboard;
pub mod delivery;
pub mod document;
pub mod product;
pub mod receipt;
pub mod stock;
pub mod transfer;
pub mod user;

pub use adjustment::AdjustmentService;
pub use catalog::CatalogService;
pub use dashboard::DashboardService;
pub use delivery::DeliveryService;
pub use product::ProductService;
pub use receipt::ReceiptService;
pub use stock::StockService;
pub use transfer::TransferService;
pub use user::UserService;
