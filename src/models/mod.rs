mod bank;
mod id;
mod investment;
pub mod numeric;

pub use bank::BankAccount;
pub use id::{IdError, InvestmentId};
pub use investment::{InvestmentPatch, InvestmentRecord, NewInvestment};
