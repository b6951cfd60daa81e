pub mod manager;
pub mod notification;
pub mod vacation_request;
