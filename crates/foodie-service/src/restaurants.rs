//! Restaurant browsing.

use foodie_core::access::{Action, Global, Visibility, authorize};
use foodie_core::error::FoodieResult;
use foodie_core::models::menu_item::MenuItem;
use foodie_core::models::restaurant::{Restaurant, RestaurantSummary};
use foodie_core::models::user::Identity;
use foodie_core::repository::{MenuItemRepository, RestaurantRepository};
use uuid::Uuid;

/// A restaurant together with its menu, sorted by name.
#[derive(Debug, Clone)]
pub struct RestaurantMenu {
    pub restaurant: Restaurant,
    pub menu: Vec<MenuItem>,
}

pub struct RestaurantService<R: RestaurantRepository, M: MenuItemRepository> {
    restaurants: R,
    menu_items: M,
}

impl<R: RestaurantRepository, M: MenuItemRepository> RestaurantService<R, M> {
    pub fn new(restaurants: R, menu_items: M) -> Self {
        Self {
            restaurants,
            menu_items,
        }
    }

    /// Restaurants the identity may see. Admins get every country,
    /// ordered by country then name; everyone else gets their own
    /// country ordered by name.
    pub async fn list(&self, identity: &Identity) -> FoodieResult<Vec<RestaurantSummary>> {
        authorize(identity, Action::View, &Global).into_result(Action::View)?;
        self.restaurants
            .list(Visibility::for_identity(identity))
            .await
    }

    pub async fn view(
        &self,
        identity: &Identity,
        restaurant_id: Uuid,
    ) -> FoodieResult<RestaurantMenu> {
        let restaurant = self.restaurants.get_by_id(restaurant_id).await?;
        authorize(identity, Action::View, &restaurant).into_result(Action::View)?;

        let menu = self.menu_items.list_by_restaurant(restaurant.id).await?;
        Ok(RestaurantMenu { restaurant, menu })
    }
}
