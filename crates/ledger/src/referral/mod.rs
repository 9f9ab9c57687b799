pub mod model;

use lazy_static::lazy_static;
use rust_decimal::Decimal;

lazy_static! {
    /// 单次奖励增量，固定0.01，与推荐次数/等级无关
    pub static ref REWARD_INCREMENT: Decimal = Decimal::new(1, 2);
}
