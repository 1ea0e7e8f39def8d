pub mod bookings;
pub mod contact_messages;
pub mod errors;
pub mod tour_packages;
