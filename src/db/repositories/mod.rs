pub mod notes;
pub mod notifications;
pub mod shift_types;
pub mod shifts;
pub mod swap_requests;
pub mod teams;
pub mod users;
