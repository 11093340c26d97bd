pub mod authz;
pub mod bulk_shifts_service;
pub mod context;
pub mod notes_service;
pub mod notifications_service;
pub mod shift_time;
pub mod shift_types_service;
pub mod shifts_service;
pub mod swap_requests_service;
pub mod teams_service;
pub mod users_service;

pub use bulk_shifts_service::BulkShiftsService;
pub use notes_service::NotesService;
pub use notifications_service::{NotificationEmitter, NotificationsService};
pub use shift_types_service::ShiftTypesService;
pub use shifts_service::ShiftsService;
pub use swap_requests_service::SwapRequestsService;
pub use teams_service::TeamsService;
pub use users_service::UsersService;
