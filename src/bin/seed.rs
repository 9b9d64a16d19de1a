use std::collections::HashMap;

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum_restaurant_api::{
    config::AppConfig,
    db::create_pool,
    services::restaurant_service,
};
use sqlx::PgPool;
use uuid::Uuid;

/// (resource, action, description) catalogue, mirroring the production grants.
const PERMISSIONS: &[(&str, &str, &str)] = &[
    ("users", "create", "Create new users"),
    ("users", "read", "View user details"),
    ("users", "update", "Update user information"),
    ("users", "delete", "Delete users"),
    ("users", "list", "List all users"),
    ("roles", "create", "Create new roles"),
    ("roles", "read", "View role details"),
    ("roles", "update", "Update roles"),
    ("roles", "delete", "Delete roles"),
    ("roles", "list", "List all roles"),
    ("permissions", "create", "Create permissions"),
    ("permissions", "read", "View permissions"),
    ("permissions", "update", "Update permissions"),
    ("permissions", "delete", "Delete permissions"),
    ("permissions", "list", "List all permissions"),
    ("restaurant", "read", "View restaurant information"),
    ("restaurant", "update", "Update restaurant information"),
    ("profile", "read", "View own profile"),
    ("profile", "update", "Update own profile"),
    ("menu-items", "create", "Create menu items"),
    ("menu-items", "read", "View menu items"),
    ("menu-items", "update", "Update menu items"),
    ("menu-items", "delete", "Delete menu items"),
    ("menu-items", "list", "List all menu items"),
    ("tables", "create", "Create new tables"),
    ("tables", "read", "View table details"),
    ("tables", "update", "Update table configuration"),
    ("tables", "delete", "Delete tables"),
    ("tables", "list", "List all tables"),
    ("tables", "check-in", "Check-in table"),
    ("tables", "reserve", "Reserve table"),
    ("tables", "checkout", "Checkout table"),
    ("tables", "clean", "Clean table"),
    ("orders", "list", "List all orders"),
    ("orders", "read", "View order details"),
    ("orders", "update", "Add items to orders"),
];

const TABLE_TRANSITIONS: [&str; 6] = ["read", "list", "check-in", "reserve", "checkout", "clean"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let permission_ids = seed_permissions(&pool).await?;
    let admin_role_id = seed_roles(&pool, &permission_ids).await?;
    let admin_id = ensure_user(
        &pool,
        "System Admin",
        "admin@example.com",
        "Admin@123",
        admin_role_id,
    )
    .await?;
    restaurant_service::ensure_default(&pool).await?;
    seed_tables(&pool).await?;
    seed_menu_items(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}");
    println!("   Email: admin@example.com");
    println!("   Password: Admin@123  (change this in production)");
    Ok(())
}

async fn seed_permissions(pool: &PgPool) -> anyhow::Result<HashMap<(String, String), Uuid>> {
    let mut ids = HashMap::new();
    for (resource, action, description) in PERMISSIONS {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO permissions (id, resource, action, description)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (resource, action) DO UPDATE SET description = EXCLUDED.description
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(resource)
        .bind(action)
        .bind(description)
        .fetch_one(pool)
        .await?;
        ids.insert((resource.to_string(), action.to_string()), id);
    }
    println!("Seeded {} permissions", ids.len());
    Ok(ids)
}

async fn seed_roles(
    pool: &PgPool,
    permissions: &HashMap<(String, String), Uuid>,
) -> anyhow::Result<Uuid> {
    let select = |predicate: &dyn Fn(&str, &str) -> bool| -> Vec<Uuid> {
        permissions
            .iter()
            .filter(|((resource, action), _)| predicate(resource, action))
            .map(|(_, id)| *id)
            .collect()
    };

    let all: Vec<Uuid> = permissions.values().copied().collect();

    let user_grants = select(&|resource, action| {
        resource == "profile" || (resource == "restaurant" && action == "read")
    });

    let operations_grants = select(&|resource, action| {
        resource == "profile"
            || (resource == "restaurant" && action == "read")
            || (resource == "tables" && TABLE_TRANSITIONS.contains(&action))
            || resource == "orders"
    });

    let manager_grants = select(&|resource, action| {
        resource == "profile"
            || (resource == "restaurant" && action == "read")
            || resource == "menu-items"
            || resource == "tables"
            || resource == "orders"
    });

    let admin_id = ensure_role(pool, "admin", "Administrator with full access", &all).await?;
    ensure_role(pool, "user", "Regular user with limited access", &user_grants).await?;
    ensure_role(
        pool,
        "operations",
        "Operations staff with table management access",
        &operations_grants,
    )
    .await?;
    ensure_role(
        pool,
        "manager",
        "Manager with menu and table management access",
        &manager_grants,
    )
    .await?;
    ensure_role(
        pool,
        "accountant",
        "Accountant with user-level access",
        &user_grants,
    )
    .await?;

    println!("Seeded roles: admin, user, operations, manager, accountant");
    Ok(admin_id)
}

async fn ensure_role(
    pool: &PgPool,
    name: &str,
    description: &str,
    permission_ids: &[Uuid],
) -> anyhow::Result<Uuid> {
    let (role_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO roles (id, name, description)
        VALUES ($1, $2, $3)
        ON CONFLICT (name) DO UPDATE SET description = EXCLUDED.description
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await?;

    for permission_id in permission_ids {
        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(role_id)
        .bind(permission_id)
        .execute(pool)
        .await?;
    }

    Ok(role_id)
}

async fn ensure_user(
    pool: &PgPool,
    name: &str,
    email: &str,
    password: &str,
    role_id: Uuid,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, name, email, password_hash, role_id, shift, work_status)
        VALUES ($1, $2, $3, $4, $5, 'Administrative', 'active')
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role_id)
    .fetch_optional(pool)
    .await?;

    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email}");
    Ok(user_id)
}

async fn seed_tables(pool: &PgPool) -> anyhow::Result<()> {
    let tables = vec![
        ("01", 4, "Floor 1", "Main"),
        ("02", 2, "Floor 1", "Main"),
        ("03", 6, "Floor 1", "Main"),
        ("04", 4, "Floor 1", "Main"),
        ("05", 8, "Floor 1", "Outdoor"),
        ("06", 4, "Floor 1", "Outdoor"),
        ("07", 6, "Floor 2", "VIP"),
        ("08", 10, "Floor 2", "VIP"),
        ("09", 4, "Floor 2", "Main"),
        ("10", 2, "Floor 2", "Main"),
    ];

    for (number, capacity, floor, section) in tables {
        sqlx::query(
            r#"
            INSERT INTO tables (id, number, capacity, floor, section)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (number) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(number)
        .bind(capacity)
        .bind(floor)
        .bind(section)
        .execute(pool)
        .await?;
    }

    println!("Seeded tables");
    Ok(())
}

async fn seed_menu_items(pool: &PgPool) -> anyhow::Result<()> {
    let items: Vec<(&str, &str, i64, &str, &str, bool, bool)> = vec![
        (
            "Grilled Beef Steak",
            "main",
            185_000,
            "/images/grilled-beef-steak.jpg",
            "Char-grilled beef with pepper sauce",
            true,
            false,
        ),
        (
            "Spicy Chicken Wings",
            "appetizer",
            75_000,
            "/images/spicy-chicken-wings.jpg",
            "Crispy wings tossed in house chili glaze",
            true,
            true,
        ),
        (
            "Garden Salad",
            "appetizer",
            55_000,
            "/images/garden-salad.jpg",
            "Seasonal greens with citrus dressing",
            false,
            false,
        ),
        (
            "Chef's Tasting Platter",
            "special",
            320_000,
            "/images/chefs-tasting-platter.jpg",
            "Rotating selection of the kitchen's best",
            true,
            false,
        ),
        (
            "Fresh Lime Soda",
            "drink",
            35_000,
            "/images/fresh-lime-soda.jpg",
            "Sparkling lime with a touch of mint",
            false,
            false,
        ),
        (
            "Iced Coffee",
            "drink",
            40_000,
            "/images/iced-coffee.jpg",
            "Slow-drip robusta over ice",
            true,
            false,
        ),
        (
            "Coconut Panna Cotta",
            "dessert",
            60_000,
            "/images/coconut-panna-cotta.jpg",
            "Silky coconut cream with passion fruit",
            false,
            false,
        ),
    ];

    for (name, category, price, image, description, popular, spicy) in items {
        sqlx::query(
            r#"
            INSERT INTO menu_items (id, name, category, price, image, description, popular, spicy)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8
            WHERE NOT EXISTS (SELECT 1 FROM menu_items WHERE name = $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(category)
        .bind(price)
        .bind(image)
        .bind(description)
        .bind(popular)
        .bind(spicy)
        .execute(pool)
        .await?;
    }

    println!("Seeded menu items");
    Ok(())
}
