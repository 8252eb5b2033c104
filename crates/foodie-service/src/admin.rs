//! Administrative operations: payment method management and the
//! dashboard.

use foodie_core::access::{Action, Global, Visibility, authorize};
use foodie_core::error::{FoodieError, FoodieResult};
use foodie_core::models::order::Order;
use foodie_core::models::payment_method::{
    CreatePaymentMethod, PaymentMethod, UpdatePaymentMethod,
};
use foodie_core::models::user::Identity;
use foodie_core::repository::{
    OrderRepository, Pagination, PaymentMethodRepository, RestaurantRepository, UserRepository,
};
use tracing::info;
use uuid::Uuid;

const RECENT_ORDERS: u64 = 10;

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub total_users: u64,
    pub total_restaurants: u64,
    pub total_orders: u64,
    pub placed_orders: u64,
    /// Sum of PLACED order totals.
    pub revenue_cents: i64,
    /// Newest first.
    pub recent_orders: Vec<Order>,
}

pub struct AdminService<U, R, O, P>
where
    U: UserRepository,
    R: RestaurantRepository,
    O: OrderRepository,
    P: PaymentMethodRepository,
{
    users: U,
    restaurants: R,
    orders: O,
    payment_methods: P,
}

fn require(identity: &Identity, action: Action) -> FoodieResult<()> {
    authorize(identity, action, &Global).into_result(action)
}

fn validated_name(name: &str) -> FoodieResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(FoodieError::Validation {
            message: "payment method name must not be empty".into(),
        });
    }
    Ok(trimmed.to_string())
}

impl<U, R, O, P> AdminService<U, R, O, P>
where
    U: UserRepository,
    R: RestaurantRepository,
    O: OrderRepository,
    P: PaymentMethodRepository,
{
    pub fn new(users: U, restaurants: R, orders: O, payment_methods: P) -> Self {
        Self {
            users,
            restaurants,
            orders,
            payment_methods,
        }
    }

    /// Every payment method, active or not, sorted by name.
    pub async fn list_payment_methods(
        &self,
        identity: &Identity,
    ) -> FoodieResult<Vec<PaymentMethod>> {
        require(identity, Action::UpdatePayment)?;
        self.payment_methods.list(false).await
    }

    pub async fn create_payment_method(
        &self,
        identity: &Identity,
        input: CreatePaymentMethod,
    ) -> FoodieResult<PaymentMethod> {
        require(identity, Action::UpdatePayment)?;
        let method = self
            .payment_methods
            .create(CreatePaymentMethod {
                name: validated_name(&input.name)?,
                description: input.description.trim().to_string(),
                active: input.active,
            })
            .await?;

        info!(
            payment_method_id = %method.id,
            name = %method.name,
            admin_id = %identity.id,
            "Payment method created"
        );
        Ok(method)
    }

    pub async fn update_payment_method(
        &self,
        identity: &Identity,
        id: Uuid,
        input: UpdatePaymentMethod,
    ) -> FoodieResult<PaymentMethod> {
        require(identity, Action::UpdatePayment)?;
        let name = input.name.as_deref().map(validated_name).transpose()?;
        let method = self
            .payment_methods
            .update(id, UpdatePaymentMethod {
                name,
                description: input.description.map(|d| d.trim().to_string()),
                active: input.active,
            })
            .await?;

        info!(
            payment_method_id = %method.id,
            admin_id = %identity.id,
            "Payment method updated"
        );
        Ok(method)
    }

    /// Flip a method between active and inactive.
    pub async fn toggle_payment_method(
        &self,
        identity: &Identity,
        id: Uuid,
    ) -> FoodieResult<PaymentMethod> {
        require(identity, Action::UpdatePayment)?;
        let current = self.payment_methods.get_by_id(id).await?;
        let method = self
            .payment_methods
            .update(id, UpdatePaymentMethod {
                active: Some(!current.active),
                ..Default::default()
            })
            .await?;

        info!(
            payment_method_id = %method.id,
            active = method.active,
            admin_id = %identity.id,
            "Payment method toggled"
        );
        Ok(method)
    }

    pub async fn dashboard(&self, identity: &Identity) -> FoodieResult<Dashboard> {
        require(identity, Action::ViewDashboard)?;

        let total_users = self.users.count().await?;
        let total_restaurants = self.restaurants.count().await?;
        let stats = self.orders.stats().await?;
        let recent = self
            .orders
            .list(
                Visibility::for_identity(identity),
                Pagination {
                    offset: 0,
                    limit: RECENT_ORDERS,
                },
            )
            .await?;

        Ok(Dashboard {
            total_users,
            total_restaurants,
            total_orders: stats.total_orders,
            placed_orders: stats.placed_orders,
            revenue_cents: stats.revenue_cents,
            recent_orders: recent.items,
        })
    }
}
