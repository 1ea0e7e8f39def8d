pub mod bookings;
pub mod contact_messages;
pub mod tour_packages;
