/// Authentication utilities
///
/// # Modules
///
/// - [`jwt`]: Session token creation and validation
/// - [`middleware`]: Turns request headers into an `AuthContext`
///
/// # Example
///
/// ```
/// use budgetal_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(Uuid::new_v4());
/// let token = create_token(&claims, "secret-key")?;
/// let validated = validate_token(&token, "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
