//! FoodHub application composition root
//!
//! Composes all domain routers into a single application.

use std::sync::Arc;

use axum::{middleware, Router};
use foodhub_accounts::{AccountsRepositories, AccountsState, NewUser, UserRepository, UserRole};
use foodhub_auth::{resolve_locale, AuthBackend, AuthConfig};
use foodhub_catalog::{CatalogState, ProductRepository};
use foodhub_common::{Config, DbPool, LogFormat};
use foodhub_email::{EmailConfig, EmailService, EmailServiceFactory};
use foodhub_enterprises::{EnterprisesRepositories, EnterprisesState};
use foodhub_orders::{OrdersRepositories, OrdersState};
use foodhub_payments::{PaymentConfig, PaymentGateway, PaymentGatewayFactory};
use foodhub_settings::{SettingsRepositories, SettingsState, TermsOfServiceRepository};
use foodhub_vouchers::{VoucherRepository, VouchersState};
use tower_http::trace::TraceLayer;

/// Outbound services shared by the domains
#[derive(Clone)]
pub struct AppServices {
    pub gateway: Arc<dyn PaymentGateway>,
    pub email: Arc<dyn EmailService>,
}

impl AppServices {
    /// Build the payment gateway and email provider from environment variables
    pub async fn from_env() -> Result<Self, anyhow::Error> {
        let gateway = PaymentGatewayFactory::create(PaymentConfig::from_env()?)?;
        let email = EmailServiceFactory::create(EmailConfig::from_env()?).await?;

        Ok(Self { gateway, email })
    }
}

/// Create the main application router with all routes and middleware
pub fn create_app(config: &Config, pool: DbPool, services: AppServices) -> Router {
    let auth = AuthBackend::new(pool.clone(), AuthConfig::from_config(config));

    let accounts_state = AccountsState {
        repos: AccountsRepositories::new(pool.clone()),
        terms: TermsOfServiceRepository::new(pool.clone()),
        auth: auth.clone(),
        default_enterprise_limit: config.default_enterprise_limit,
    };

    let enterprises_state = EnterprisesState {
        repos: EnterprisesRepositories::new(pool.clone()),
        auth: auth.clone(),
    };

    let orders_state = OrdersState {
        repos: OrdersRepositories::new(pool.clone()),
        vouchers: VoucherRepository::new(pool.clone()),
        auth: auth.clone(),
        gateway: services.gateway,
        email: services.email,
        currency: config.currency.clone(),
    };

    let vouchers_state = VouchersState {
        vouchers: VoucherRepository::new(pool.clone()),
        auth: auth.clone(),
    };

    let settings_state = SettingsState {
        repos: SettingsRepositories::new(pool.clone()),
        auth: auth.clone(),
    };

    let catalog_state = CatalogState {
        products: ProductRepository::new(pool),
        auth: auth.clone(),
        currency: config.currency.clone(),
    };

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(foodhub_accounts::routes().with_state(accounts_state))
        .merge(foodhub_enterprises::routes().with_state(enterprises_state))
        .merge(foodhub_orders::routes().with_state(orders_state))
        .merge(foodhub_vouchers::routes().with_state(vouchers_state))
        .merge(foodhub_settings::routes().with_state(settings_state))
        .merge(foodhub_catalog::routes().with_state(catalog_state))
        .layer(middleware::from_fn_with_state(auth, resolve_locale))
        .layer(TraceLayer::new_for_http())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter.
pub fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.rust_log));

    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .pretty()
            .init(),
    }
}

/// Create the first administrator when `ADMIN_EMAIL` and `ADMIN_PASSWORD`
/// are set and no account uses that email yet.
pub async fn bootstrap_admin(pool: &DbPool, config: &Config) -> Result<(), anyhow::Error> {
    let (Ok(email), Ok(password)) = (
        std::env::var("ADMIN_EMAIL"),
        std::env::var("ADMIN_PASSWORD"),
    ) else {
        return Ok(());
    };

    let users = UserRepository::new(pool.clone());
    if users.find_by_email(&email).await?.is_some() {
        return Ok(());
    }

    let new_user = NewUser::new(
        &email,
        &password,
        UserRole::Admin,
        config.default_enterprise_limit,
    )?;
    let user = users.create(&new_user).await?;
    tracing::info!(user_id = %user.id, email = %user.email, "Administrator account created");
    Ok(())
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
