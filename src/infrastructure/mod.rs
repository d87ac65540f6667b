pub mod database;
pub mod repositories;
pub mod unit_of_work;
pub mod util;
