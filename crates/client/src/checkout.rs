//! The cross-service order flow.
//!
//! Five independent HTTP calls, each depending only on what earlier steps
//! returned:
//!
//! 1. create the customer in the User Service
//! 2. create the product in the Product Service
//! 3. create the order in the Order Service
//! 4. fetch the order back and check it
//! 5. fetch the customer back
//!
//! Nothing is rolled back. A failed step reports how far the flow got and
//! leaves every record created before it in place.

use std::fmt;

use emporium_core::{CartId, OrderDate, OrderDto, ProductDto, UserDto};
use thiserror::Error;

use crate::EmporiumClient;
use crate::endpoints::Service;
use crate::error::ClientError;

/// One step of the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    CreateUser,
    CreateProduct,
    CreateOrder,
    VerifyOrder,
    VerifyUser,
}

impl CheckoutStep {
    /// The service the step talks to.
    #[must_use]
    pub const fn service(self) -> Service {
        match self {
            Self::CreateUser | Self::VerifyUser => Service::User,
            Self::CreateProduct => Service::Product,
            Self::CreateOrder | Self::VerifyOrder => Service::Order,
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CreateUser => "create user",
            Self::CreateProduct => "create product",
            Self::CreateOrder => "create order",
            Self::VerifyOrder => "verify order",
            Self::VerifyUser => "verify user",
        })
    }
}

/// What to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub customer: UserDto,
    pub product: ProductDto,
    pub order_desc: String,
    pub order_date: Option<OrderDate>,
    pub cart_id: Option<CartId>,
}

/// Records created so far, threaded through the steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutContext {
    pub user: Option<UserDto>,
    pub product: Option<ProductDto>,
    pub order: Option<OrderDto>,
}

impl CheckoutContext {
    /// One line per created record, for failure reports.
    #[must_use]
    pub fn created(&self) -> Vec<String> {
        let mut created = Vec::new();
        if let Some(id) = self.user.as_ref().and_then(|u| u.user_id) {
            created.push(format!("user {id}"));
        }
        if let Some(id) = self.product.as_ref().and_then(|p| p.product_id) {
            created.push(format!("product {id}"));
        }
        if let Some(id) = self.order.as_ref().and_then(|o| o.order_id) {
            created.push(format!("order {id}"));
        }
        created
    }
}

/// A completed flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub user: UserDto,
    pub product: ProductDto,
    pub order: OrderDto,
}

/// A step failed. Records in `context` were created and remain.
#[derive(Debug, Error)]
#[error("checkout failed at step '{step}': {source}")]
pub struct CheckoutError {
    pub step: CheckoutStep,
    pub context: CheckoutContext,
    #[source]
    pub source: ClientError,
}

impl CheckoutError {
    /// Whether the failing service was unreachable.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        self.source.is_unavailable()
    }
}

/// Runs the flow against a set of clients.
#[derive(Debug, Clone)]
pub struct CheckoutFlow {
    client: EmporiumClient,
}

impl CheckoutFlow {
    #[must_use]
    pub const fn new(client: EmporiumClient) -> Self {
        Self { client }
    }

    /// Run every step in order.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` naming the first failed step and what had been
    /// created before it.
    pub async fn run(&self, request: CheckoutRequest) -> Result<CheckoutReceipt, CheckoutError> {
        let mut context = CheckoutContext::default();

        match self.run_steps(&request, &mut context).await {
            Ok(receipt) => {
                tracing::info!(
                    user_id = ?receipt.user.user_id,
                    product_id = ?receipt.product.product_id,
                    order_id = ?receipt.order.order_id,
                    "Checkout complete"
                );
                Ok(receipt)
            }
            Err((step, source)) => {
                tracing::warn!(
                    step = %step,
                    error = %source,
                    created = ?context.created(),
                    "Checkout failed"
                );
                Err(CheckoutError {
                    step,
                    context,
                    source,
                })
            }
        }
    }

    async fn run_steps(
        &self,
        request: &CheckoutRequest,
        context: &mut CheckoutContext,
    ) -> Result<CheckoutReceipt, (CheckoutStep, ClientError)> {
        let users = self.client.users();
        let products = self.client.products();
        let orders = self.client.orders();

        let step = CheckoutStep::CreateUser;
        let user = users.create(&request.customer).await.map_err(|e| (step, e))?;
        let user_id = user.user_id.ok_or_else(|| (step, missing_id(step)))?;
        context.user = Some(user.clone());
        tracing::debug!(%user_id, "Step 1: user created");

        let step = CheckoutStep::CreateProduct;
        let product = products.create(&request.product).await.map_err(|e| (step, e))?;
        let product_id = product.product_id.ok_or_else(|| (step, missing_id(step)))?;
        context.product = Some(product.clone());
        tracing::debug!(%product_id, "Step 2: product created");

        let step = CheckoutStep::CreateOrder;
        let mut draft = OrderDto::new(&request.order_desc);
        draft.order_date = request.order_date;
        if let Some(cart_id) = request.cart_id {
            draft = draft.with_cart(cart_id);
        }
        let order = orders.create(&draft).await.map_err(|e| (step, e))?;
        let order_id = order.order_id.ok_or_else(|| (step, missing_id(step)))?;
        context.order = Some(order);
        tracing::debug!(%order_id, "Step 3: order created");

        let step = CheckoutStep::VerifyOrder;
        let order = orders.get(order_id).await.map_err(|e| (step, e))?;
        if order.order_id != Some(order_id)
            || order.order_desc.as_deref() != Some(request.order_desc.as_str())
        {
            return Err((
                step,
                ClientError::UnexpectedResponse {
                    service: step.service().name(),
                    detail: format!("order {order_id} does not match what was created"),
                },
            ));
        }

        let step = CheckoutStep::VerifyUser;
        let user = users.get(user_id).await.map_err(|e| (step, e))?;
        if user.user_id != Some(user_id) {
            return Err((
                step,
                ClientError::UnexpectedResponse {
                    service: step.service().name(),
                    detail: format!("user {user_id} came back with a different id"),
                },
            ));
        }

        Ok(CheckoutReceipt {
            user,
            product,
            order,
        })
    }
}

fn missing_id(step: CheckoutStep) -> ClientError {
    ClientError::UnexpectedResponse {
        service: step.service().name(),
        detail: "created record has no id".to_string(),
    }
}
