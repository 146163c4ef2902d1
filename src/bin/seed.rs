use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use artisan_crafts_api::{config::AppConfig, db::create_pool};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin123", "admin").await?;
    let user_id = ensure_user(&pool, "user@example.com", "user123", "user").await?;
    seed_products(&pool).await?;
    seed_workshops(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO users (id, email, password_hash, role) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;
    if count.0 > 0 {
        return Ok(());
    }

    // The storefront catalog: (name, description, price in cents, stock).
    let products: [(&str, &str, i64, i32); 9] = [
        (
            "Watercolor Greeting Cards",
            "Hand-painted cards perfect for any occasion",
            1299,
            40,
        ),
        (
            "Lavender Soy Candles",
            "Hand-poured candles with natural essential oils",
            1899,
            25,
        ),
        (
            "Clay Pottery Bowl",
            "Handcrafted ceramic bowl with unique glaze",
            3499,
            12,
        ),
        (
            "Handmade Silver Necklace",
            "Elegant sterling silver pendant with gemstone",
            4599,
            8,
        ),
        (
            "Embroidered Wall Art",
            "Colorful floral design on natural linen",
            2899,
            15,
        ),
        (
            "Paper Flower Bouquet",
            "Everlasting paper flowers in vibrant colors",
            2299,
            20,
        ),
        (
            "Ceramic Mug Set",
            "Set of 4 hand-thrown mugs with unique patterns",
            3899,
            10,
        ),
        (
            "Beaded Bracelet",
            "Handwoven bracelet with natural stones",
            1699,
            30,
        ),
        (
            "Cross-Stitch Kit",
            "Complete kit with pattern, thread, and fabric",
            2499,
            18,
        ),
    ];

    for (name, description, price_cents, stock) in products {
        sqlx::query(
            "INSERT INTO products (id, name, description, price, stock) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .bind(Decimal::new(price_cents, 2))
        .bind(stock)
        .execute(pool)
        .await?;
    }

    Ok(())
}

async fn seed_workshops(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM workshops")
        .fetch_one(pool)
        .await?;
    if count.0 > 0 {
        return Ok(());
    }

    let workshops = [
        (
            "Paper Quilling Basics",
            "Roll, shape, and glue paper strips into decorative art",
            NaiveDate::from_ymd_opt(2026, 9, 12),
            "10:00 AM - 1:00 PM",
            "Meera Joshi",
            "Beginner",
        ),
        (
            "Weekend Watercolor",
            "Loose florals and landscapes, all materials included",
            NaiveDate::from_ymd_opt(2026, 9, 19),
            "2:00 PM - 5:00 PM",
            "Anita Rao",
            "All levels",
        ),
        (
            "Wheel-Thrown Pottery",
            "An introduction to centering and throwing on the wheel",
            NaiveDate::from_ymd_opt(2026, 9, 26),
            "11:00 AM - 3:00 PM",
            "Kiran Patel",
            "Intermediate",
        ),
    ];

    for (title, description, date, time, instructor, level) in workshops {
        let date = date.ok_or_else(|| anyhow::anyhow!("invalid workshop date"))?;
        sqlx::query(
            r#"
            INSERT INTO workshops (id, title, description, workshop_date, workshop_time, instructor, level)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(description)
        .bind(date)
        .bind(time)
        .bind(instructor)
        .bind(level)
        .execute(pool)
        .await?;
    }

    Ok(())
}
