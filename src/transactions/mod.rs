pub mod transactions_model;
pub mod transactions_repository;
pub mod transactions_service;
pub mod transactions_traits;

pub use transactions_model::{
    NewTransaction, Paged, TransactionRecord, TransactionStatus, TransactionType,
};
pub use transactions_repository::TransactionRepository;
pub use transactions_service::TransactionQueryService;
pub use transactions_traits::TransactionRepositoryTrait;
