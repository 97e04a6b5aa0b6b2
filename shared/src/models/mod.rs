//! Domain models shared across the workspace

pub mod cash_session;
pub mod option_group;
pub mod order;
pub mod product;

pub use cash_session::{CashSession, SessionStatus};
pub use option_group::{OptionGroup, OptionItem, SelectionType};
pub use order::{Order, OrderStatus, OrderType, Payment, PaymentMethod, StatusChange};
pub use product::ProductSnapshot;
