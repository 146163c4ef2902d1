use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{AddToCartRequest, CartItemDto, CartList},
        orders::{OrderList, OrderWithItems},
        payments::{
            CreateOrderRequest, CreateOrderResponse, VerifyPaymentRequest, VerifyPaymentResponse,
        },
        products::ProductList,
        workshops::{RegistrationResponse, WorkshopList},
    },
    models::{CartItem, Order, OrderItem, Product, User, Workshop, WorkshopRegistration},
    response::{ApiResponse, Meta},
    routes::{auth, cart, health, orders, params, payments, products, workshops},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        products::list_products,
        products::get_product,
        cart::cart_list,
        cart::upsert_cart_item,
        cart::remove_from_cart,
        orders::list_orders,
        orders::get_order,
        payments::create_order,
        payments::verify_payment,
        workshops::list_workshops,
        workshops::register_for_workshop,
        workshops::my_workshops
    ),
    components(
        schemas(
            User,
            Product,
            CartItem,
            Order,
            OrderItem,
            Workshop,
            WorkshopRegistration,
            AddToCartRequest,
            CartItemDto,
            CartList,
            ProductList,
            OrderList,
            OrderWithItems,
            WorkshopList,
            RegistrationResponse,
            CreateOrderRequest,
            CreateOrderResponse,
            VerifyPaymentRequest,
            VerifyPaymentResponse,
            params::Pagination,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CartList>,
            ApiResponse<OrderList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<WorkshopList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order history endpoints"),
        (name = "Payments", description = "Gateway checkout endpoints"),
        (name = "Workshops", description = "Workshop endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
