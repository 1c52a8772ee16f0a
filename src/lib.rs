use sqlx::PgPool;

pub mod config;
pub mod domain {
    pub mod customer;
    pub mod pagination;
    pub mod payment;
    pub mod payment_status;
    pub mod ports;
    pub mod transaction;
}
pub mod error;
pub mod gateways;
pub mod http {
    pub mod handlers {
        pub mod customers;
        pub mod ops;
        pub mod payment_statuses;
        pub mod payments;
    }
}
pub mod repo {
    pub mod customers_repo;
    pub mod payment_statuses_repo;
    pub mod payments_repo;
    pub mod transactions_repo;
}
pub mod seeding;
pub mod service {
    pub mod customer_service;
    pub mod payment_service;
    pub mod payment_status_service;
}

#[derive(Clone)]
pub struct AppState {
    pub payment_service: service::payment_service::PaymentService,
    pub customer_service: service::customer_service::CustomerService,
    pub payment_status_service: service::payment_status_service::PaymentStatusService,
    pub pool: PgPool,
}
