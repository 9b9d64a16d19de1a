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
        auth::{
            CreateUserRequest, LoginRequest, LoginResponse, LogoutRequest, RefreshTokenRequest,
            RefreshTokenResponse,
        },
        menu_items::{
            CategoryStats, CreateMenuItemRequest, MenuItemList, MenuStats, MenuSummary,
            UpdateMenuItemRequest,
        },
        orders::{AddItemsRequest, NewOrderItem, OrderList, OrderWithItems},
        restaurant::UpdateRestaurantRequest,
        roles::{
            CreatePermissionRequest, CreateRoleRequest, PermissionList, RoleList,
            UpdatePermissionRequest, UpdateRoleRequest,
        },
        tables::{
            CheckInRequest, CheckoutRequest, CreateTableRequest, FloorStats, ReserveRequest,
            SectionStats, TableList, TableStats, TableStatsSummary, TableWithOrder,
            UpdateTableRequest,
        },
        users::{ChangePasswordRequest, UpdateUserRequest, UserList},
    },
    models::{
        ActiveSession, MenuItem, Order, OrderItem, Permission, Restaurant, Role, Table, User,
    },
    response::{ApiResponse, ListMeta},
    routes::{auth, health, menu_items, orders, params, permissions, restaurant, roles, tables, users},
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
        auth::refresh_token,
        auth::logout,
        auth::create_user,
        auth::me,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        users::change_password,
        roles::list_roles,
        roles::get_role,
        roles::create_role,
        roles::update_role,
        roles::delete_role,
        permissions::list_permissions,
        permissions::get_permission,
        permissions::create_permission,
        permissions::update_permission,
        permissions::delete_permission,
        menu_items::list_menu_items,
        menu_items::menu_stats,
        menu_items::get_menu_item,
        menu_items::create_menu_item,
        menu_items::update_menu_item,
        menu_items::delete_menu_item,
        tables::list_tables,
        tables::table_stats,
        tables::get_table,
        tables::create_table,
        tables::update_table,
        tables::delete_table,
        tables::check_in,
        tables::reserve_table,
        tables::checkout_table,
        tables::clean_table,
        orders::list_orders,
        orders::get_order,
        orders::add_items,
        restaurant::get_restaurant,
        restaurant::update_restaurant,
    ),
    components(
        schemas(
            User,
            Role,
            Permission,
            MenuItem,
            Restaurant,
            Table,
            ActiveSession,
            Order,
            OrderItem,
            LoginRequest,
            LoginResponse,
            RefreshTokenRequest,
            RefreshTokenResponse,
            LogoutRequest,
            CreateUserRequest,
            UpdateUserRequest,
            ChangePasswordRequest,
            UserList,
            CreateRoleRequest,
            UpdateRoleRequest,
            RoleList,
            CreatePermissionRequest,
            UpdatePermissionRequest,
            PermissionList,
            CreateMenuItemRequest,
            UpdateMenuItemRequest,
            MenuItemList,
            CategoryStats,
            MenuSummary,
            MenuStats,
            CreateTableRequest,
            UpdateTableRequest,
            CheckInRequest,
            ReserveRequest,
            CheckoutRequest,
            TableWithOrder,
            TableList,
            TableStatsSummary,
            FloorStats,
            SectionStats,
            TableStats,
            AddItemsRequest,
            NewOrderItem,
            OrderList,
            OrderWithItems,
            UpdateRestaurantRequest,
            params::Pagination,
            health::HealthData,
            ListMeta,
            ApiResponse<Table>,
            ApiResponse<TableList>,
            ApiResponse<TableWithOrder>,
            ApiResponse<OrderList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<User>,
            ApiResponse<Role>,
            ApiResponse<Permission>,
            ApiResponse<MenuItem>,
            ApiResponse<Restaurant>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Users", description = "User management endpoints"),
        (name = "Roles", description = "Role management endpoints"),
        (name = "Permissions", description = "Permission management endpoints"),
        (name = "MenuItems", description = "Menu item endpoints"),
        (name = "Tables", description = "Table management and lifecycle endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Restaurant", description = "Restaurant info endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
