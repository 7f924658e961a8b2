pub mod begin_draw;
pub mod claim_credit;
pub mod clear;
pub mod create_pool;
pub mod join;
pub mod views;

pub use begin_draw::*;
pub use claim_credit::*;
pub use clear::*;
pub use create_pool::*;
pub use join::*;
pub use views::*;
