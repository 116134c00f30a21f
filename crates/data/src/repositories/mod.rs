mod exception_repo;
mod match_result_repo;
mod policy_event_repo;
mod trade_repo;

pub use exception_repo::ExceptionRepository;
pub use match_result_repo::MatchResultRepository;
pub use policy_event_repo::PolicyEventRepository;
pub use trade_repo::TradeRepository;
