pub mod payment_methods;
pub mod sort_order;
