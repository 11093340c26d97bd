// Sub-modules organized by aggregate
pub mod api;
pub mod note;
pub mod notification;
pub mod shift;
pub mod shift_type;
pub mod swap_request;
pub mod team;
pub mod user;

pub use api::*;
pub use note::*;
pub use notification::*;
pub use shift::*;
pub use shift_type::*;
pub use swap_request::*;
pub use team::*;
pub use user::*;
