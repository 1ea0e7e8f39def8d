pub mod bookings;
pub mod contact;
pub mod tours;
