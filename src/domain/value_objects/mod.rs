pub mod bookings;
pub mod contact_messages;
pub mod enums;
pub mod query_params;
pub mod tour_packages;
pub mod validation;
