pub mod ledger;
pub mod payers;
pub mod rating;
