pub mod coupon;
pub mod rank_list;

pub use coupon::CouponError;
pub use rank_list::RankLocks;
