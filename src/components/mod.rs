pub mod layout;
pub mod route_guard;
pub mod shared;
pub mod ui;
