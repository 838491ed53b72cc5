pub mod message;
pub mod writer;

pub use message::build_order_message;
