use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::restaurant::UpdateRestaurantRequest,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Restaurant,
    response::ApiResponse,
};

/// Insert the singleton restaurant row if it does not exist yet. Called once
/// at startup and from the seeder; the read path never creates.
pub async fn ensure_default(pool: &DbPool) -> AppResult<Restaurant> {
    let existing: Option<Restaurant> =
        sqlx::query_as("SELECT * FROM restaurant ORDER BY created_at LIMIT 1")
            .fetch_optional(pool)
            .await?;
    if let Some(restaurant) = existing {
        return Ok(restaurant);
    }

    let restaurant = sqlx::query_as(
        r#"
        INSERT INTO restaurant (id, name, phone, email, address, open_time, close_time, description)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind("My Restaurant")
    .bind("0000000000")
    .bind("restaurant@example.com")
    .bind("123 Main Street")
    .bind("08:00")
    .bind("22:00")
    .bind("Restaurant description")
    .fetch_one(pool)
    .await?;

    tracing::info!("created default restaurant record");
    Ok(restaurant)
}

pub async fn get_restaurant(pool: &DbPool) -> AppResult<ApiResponse<Restaurant>> {
    let restaurant: Option<Restaurant> =
        sqlx::query_as("SELECT * FROM restaurant ORDER BY created_at LIMIT 1")
            .fetch_optional(pool)
            .await?;
    let restaurant = restaurant.ok_or_else(|| AppError::NotFound("Restaurant not found".into()))?;

    Ok(ApiResponse::data(restaurant))
}

pub async fn update_restaurant(
    pool: &DbPool,
    actor: &AuthUser,
    payload: UpdateRestaurantRequest,
) -> AppResult<ApiResponse<Restaurant>> {
    let existing: Option<Restaurant> =
        sqlx::query_as("SELECT * FROM restaurant ORDER BY created_at LIMIT 1")
            .fetch_optional(pool)
            .await?;
    let existing = existing.ok_or_else(|| AppError::NotFound("Restaurant not found".into()))?;

    if let Some(phone) = &payload.phone
        && !is_valid_phone(phone)
    {
        return Err(AppError::validation("Please provide a valid phone number"));
    }
    if let Some(email) = &payload.email
        && !email.contains('@')
    {
        return Err(AppError::validation("Please provide a valid email"));
    }
    for time in [&payload.open_time, &payload.close_time].into_iter().flatten() {
        if !is_valid_time(time) {
            return Err(AppError::validation(
                "Please provide time in format HH:MM (e.g., 08:00)",
            ));
        }
    }

    let restaurant = sqlx::query_as(
        r#"
        UPDATE restaurant
        SET name = COALESCE($2, name),
            phone = COALESCE($3, phone),
            email = COALESCE($4, email),
            address = COALESCE($5, address),
            open_time = COALESCE($6, open_time),
            close_time = COALESCE($7, close_time),
            description = COALESCE($8, description),
            logo = COALESCE($9, logo),
            is_active = COALESCE($10, is_active),
            updated_by = $11,
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(existing.id)
    .bind(payload.name)
    .bind(payload.phone)
    .bind(payload.email.map(|e| e.to_lowercase()))
    .bind(payload.address)
    .bind(payload.open_time)
    .bind(payload.close_time)
    .bind(payload.description)
    .bind(payload.logo)
    .bind(payload.is_active)
    .bind(actor.user_id)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success(
        "Restaurant updated successfully",
        restaurant,
    ))
}

fn is_valid_phone(phone: &str) -> bool {
    let digits: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    (10..=11).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

fn is_valid_time(time: &str) -> bool {
    let Some((hours, minutes)) = time.split_once(':') else {
        return false;
    };
    if minutes.len() != 2 || hours.is_empty() || hours.len() > 2 {
        return false;
    }
    let (Ok(h), Ok(m)) = (hours.parse::<u8>(), minutes.parse::<u8>()) else {
        return false;
    };
    h < 24 && m < 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_format_accepts_hh_mm() {
        assert!(is_valid_time("08:00"));
        assert!(is_valid_time("8:00"));
        assert!(is_valid_time("23:59"));
        assert!(!is_valid_time("24:00"));
        assert!(!is_valid_time("12:60"));
        assert!(!is_valid_time("noon"));
        assert!(!is_valid_time("12:5"));
    }

    #[test]
    fn phone_must_be_ten_or_eleven_digits() {
        assert!(is_valid_phone("0123456789"));
        assert!(is_valid_phone("01234 567 890"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("abcdefghij"));
    }
}
