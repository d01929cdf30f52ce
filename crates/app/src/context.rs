//! App Context

use std::sync::Arc;

use crate::{
    api::{ApiClient, ApiError, OrdersApi, PaymentsApi},
    checkout::Checkout,
    config::ApiConfig,
    gateway::{NoGateway, PaymentGateway},
    session::Session,
};

/// Services shared by every command.
#[derive(Clone)]
pub struct AppContext {
    pub orders: Arc<dyn OrdersApi>,
    pub payments: Arc<dyn PaymentsApi>,
    pub gateway: Arc<dyn PaymentGateway>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build the context from API configuration.
    ///
    /// Without a hosted widget there is no way to collect online payments, so
    /// the gateway is [`NoGateway`].
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self::from_client(ApiClient::new(config)?))
    }

    /// Build the context for a signed-in session; its token replaces any
    /// configured one.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn for_session(config: &ApiConfig, session: &Session) -> Result<Self, ApiError> {
        Ok(Self::from_client(
            ApiClient::new(config)?.with_token(session.token()),
        ))
    }

    fn from_client(client: ApiClient) -> Self {
        let client = Arc::new(client);

        Self {
            orders: client.clone(),
            payments: client,
            gateway: Arc::new(NoGateway),
        }
    }

    /// A fresh checkout over these services.
    pub fn checkout(&self) -> Checkout {
        Checkout::new(
            Arc::clone(&self.orders),
            Arc::clone(&self.payments),
            Arc::clone(&self.gateway),
        )
    }
}
