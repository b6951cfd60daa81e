pub mod notification;
pub mod role;
pub mod user;
pub mod vacation_request;
