use axum::routing::{get, post};
use axum::Router;
use payments_api::config::AppConfig;
use payments_api::domain::ports::{CustomerStore, PaymentStatusStore, PaymentStore, TransactionStore};
use payments_api::gateways::mock::MockGateway;
use payments_api::gateways::mpgs::MpgsGateway;
use payments_api::gateways::PaymentGateway;
use payments_api::repo::customers_repo::CustomersRepo;
use payments_api::repo::payment_statuses_repo::PaymentStatusesRepo;
use payments_api::repo::payments_repo::PaymentsRepo;
use payments_api::repo::transactions_repo::TransactionsRepo;
use payments_api::service::customer_service::CustomerService;
use payments_api::service::payment_service::PaymentService;
use payments_api::service::payment_status_service::PaymentStatusService;
use payments_api::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let customers: Arc<dyn CustomerStore> = Arc::new(CustomersRepo { pool: pool.clone() });
    let statuses: Arc<dyn PaymentStatusStore> = Arc::new(PaymentStatusesRepo { pool: pool.clone() });
    let payments: Arc<dyn PaymentStore> = Arc::new(PaymentsRepo { pool: pool.clone() });
    let transactions: Arc<dyn TransactionStore> = Arc::new(TransactionsRepo { pool: pool.clone() });

    let gateway: Arc<dyn PaymentGateway> = if cfg.gateway_adapter.to_uppercase() == "MPGS" {
        Arc::new(MpgsGateway {
            base_url: cfg.mpgs_base_url.clone(),
            merchant_id: cfg.mpgs_merchant_id.clone(),
            api_password: cfg.mpgs_api_password.clone(),
            timeout_ms: cfg.gateway_timeout_ms,
            client: reqwest::Client::new(),
        })
    } else {
        Arc::new(MockGateway {
            behavior: cfg.mock_gateway_behavior.clone(),
        })
    };

    let state = AppState {
        payment_service: PaymentService {
            payments: payments.clone(),
            transactions: transactions.clone(),
            customers: customers.clone(),
            statuses: statuses.clone(),
            gateway,
        },
        customer_service: CustomerService {
            customers: customers.clone(),
        },
        payment_status_service: PaymentStatusService {
            statuses: statuses.clone(),
        },
        pool: pool.clone(),
    };

    let app = Router::new()
        .route("/health", get(payments_api::http::handlers::ops::health))
        .route("/ops/readiness", get(payments_api::http::handlers::ops::readiness))
        .route("/ops/liveness", get(payments_api::http::handlers::ops::liveness))
        .route(
            "/customers",
            post(payments_api::http::handlers::customers::create_customer)
                .get(payments_api::http::handlers::customers::list_customers),
        )
        .route(
            "/customers/:customer_id",
            get(payments_api::http::handlers::customers::get_customer)
                .patch(payments_api::http::handlers::customers::update_customer)
                .delete(payments_api::http::handlers::customers::delete_customer),
        )
        .route(
            "/payment-statuses",
            post(payments_api::http::handlers::payment_statuses::create_payment_status)
                .get(payments_api::http::handlers::payment_statuses::list_payment_statuses),
        )
        .route(
            "/payment-statuses/:status_id",
            get(payments_api::http::handlers::payment_statuses::get_payment_status)
                .patch(payments_api::http::handlers::payment_statuses::update_payment_status)
                .delete(payments_api::http::handlers::payment_statuses::delete_payment_status),
        )
        .route(
            "/payments",
            post(payments_api::http::handlers::payments::create_payment)
                .get(payments_api::http::handlers::payments::list_payments),
        )
        .route(
            "/payments/:payment_id",
            get(payments_api::http::handlers::payments::get_payment)
                .delete(payments_api::http::handlers::payments::delete_payment),
        )
        .route(
            "/payments/:payment_id/process",
            post(payments_api::http::handlers::payments::process_payment),
        )
        .route(
            "/payments/:payment_id/refund",
            post(payments_api::http::handlers::payments::refund_payment),
        )
        .route(
            "/payments/:payment_id/transactions",
            get(payments_api::http::handlers::payments::list_payment_transactions),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
