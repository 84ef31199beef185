//! Income and expense transactions and the endpoints for managing them.

mod core;
mod create;
mod delete;
mod edit;
mod list;

pub use core::{
    Transaction, TransactionBuilder, TransactionFilter, TransactionUpdate, count_transactions,
    create_transaction, create_transaction_table, delete_transaction, get_transaction,
    get_transactions, map_transaction_row, update_transaction,
};
pub use create::create_transaction_endpoint;
pub use delete::delete_transaction_endpoint;
pub use edit::update_transaction_endpoint;
pub use list::get_transactions_endpoint;
