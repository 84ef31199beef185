//! Income and expense categories for transactions and budgets.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::create_category_endpoint;
pub use db::{
    count_category_references, create_category, create_category_table, delete_category,
    get_categories, get_category, update_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryFormData, CategoryKind, CategoryName};
pub use edit::update_category_endpoint;
pub use list::get_categories_endpoint;
