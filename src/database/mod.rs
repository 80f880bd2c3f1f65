pub mod db;

pub use db::{Scope, Store};
