pub mod buy_order;
pub mod constant;
pub mod favorite;
pub mod match_receipt;
pub mod sell_order;
pub mod token;

pub use buy_order::DexBuyOrderEntity;
pub use constant::ConstantEntity;
pub use favorite::FavoriteEntity;
pub use match_receipt::MatchReceiptEntity;
pub use sell_order::DexSellOrderEntity;
pub use token::TokenEntity;
