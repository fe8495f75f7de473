use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::models::{
    AddToCartRequest, CartItem, CredentialsRequest, Product, RepositoryError, ServiceResult,
    ShopResponse, User, ADDED_TO_CART_MESSAGE, CART_CLEARED_MESSAGE, LOGIN_FAILED_MESSAGE,
    LOGIN_OK_MESSAGE, REGISTERED_MESSAGE, USER_EXISTS_MESSAGE,
};
use crate::repositories::{CartRepository, ProductRepository, UserRepository};
use crate::services::CredentialPolicy;

/// Service for the shop demo: users, catalogue and the global cart
pub struct ShopService {
    user_repository: Arc<dyn UserRepository>,
    cart_repository: Arc<dyn CartRepository>,
    product_repository: Arc<dyn ProductRepository>,
    credentials: Arc<dyn CredentialPolicy>,
}

impl ShopService {
    /// Create a new ShopService
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        cart_repository: Arc<dyn CartRepository>,
        product_repository: Arc<dyn ProductRepository>,
        credentials: Arc<dyn CredentialPolicy>,
    ) -> Self {
        Self {
            user_repository,
            cart_repository,
            product_repository,
            credentials,
        }
    }

    /// Register a user unless the username is taken
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: CredentialsRequest) -> ServiceResult<ShopResponse> {
        if self
            .user_repository
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            info!("Username already registered");
            return Ok(ShopResponse::failed(USER_EXISTS_MESSAGE));
        }

        let user = User {
            password: self.credentials.seal(&request.password),
            username: request.username,
        };

        match self.user_repository.insert(user).await {
            Ok(_) => {
                info!("User registered");
                Ok(ShopResponse::succeeded(REGISTERED_MESSAGE))
            }
            // Lost a race with a concurrent registration of the same name
            Err(RepositoryError::ConstraintViolation { message }) => {
                warn!(%message, "Registration conflict");
                Ok(ShopResponse::failed(USER_EXISTS_MESSAGE))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Check a username/password pair
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: CredentialsRequest) -> ServiceResult<ShopResponse> {
        let matched = self
            .user_repository
            .find_by_username(&request.username)
            .await?
            .map(|user| self.credentials.verify(&user.password, &request.password))
            .unwrap_or(false);

        if matched {
            info!("Login succeeded");
            Ok(ShopResponse::succeeded(LOGIN_OK_MESSAGE))
        } else {
            info!("Login rejected");
            Ok(ShopResponse::failed(LOGIN_FAILED_MESSAGE))
        }
    }

    /// The fixed catalogue
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.product_repository.find_all().await?)
    }

    /// Append an arbitrary name/price pair to the cart
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn add_to_cart(&self, request: AddToCartRequest) -> ServiceResult<ShopResponse> {
        self.cart_repository.append(CartItem::from(request)).await?;
        info!("Item added to cart");
        Ok(ShopResponse::succeeded(ADDED_TO_CART_MESSAGE))
    }

    /// Current cart contents
    #[instrument(skip(self))]
    pub async fn list_cart(&self) -> ServiceResult<Vec<CartItem>> {
        Ok(self.cart_repository.find_all().await?)
    }

    /// Empty the cart
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> ServiceResult<ShopResponse> {
        self.cart_repository.clear().await?;
        Ok(ShopResponse::succeeded(CART_CLEARED_MESSAGE))
    }
}
