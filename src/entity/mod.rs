pub mod audit_logs;
pub mod customers;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod selections;

pub use audit_logs::Entity as AuditLogs;
pub use customers::Entity as Customers;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use selections::Selections;
