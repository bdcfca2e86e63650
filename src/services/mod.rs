//! Domain services. Routes translate HTTP into calls on these modules; each
//! owns its SQL and a typed error enum.

pub mod booking;
pub mod calendar;
pub mod chat;
pub mod gallery;
pub mod hotel;
pub mod ota;
pub mod paging;
pub mod profile;
pub mod reservation;
pub mod review;
pub mod room;
pub mod session;
pub mod stats;
pub mod upload;
pub mod validate;
