//! Reference handler services.

mod audit;
mod notification;
mod orders;

pub use audit::AuditLogService;
pub use notification::NotificationService;
pub use orders::OrderManagementService;
