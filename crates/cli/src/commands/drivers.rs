//! Driver provisioning.

use hrom_web::db::DriverRepository;
use hrom_web::forms::DriverForm;

use super::{CommandError, connect};

/// Register an active driver.
pub async fn create_driver(
    name: &str,
    phone: &str,
    vehicle: Option<&str>,
) -> Result<i32, CommandError> {
    let new_driver = DriverForm {
        name: name.to_owned(),
        phone: phone.to_owned(),
        vehicle_info: vehicle.unwrap_or_default().to_owned(),
    }
    .validate()
    .map_err(|errors| CommandError::InvalidInput(errors.to_string()))?;

    let pool = connect().await?;
    let driver = DriverRepository::new(&pool).create(&new_driver).await?;

    tracing::info!(
        "Driver created successfully! ID: {}, Name: {}",
        driver.id,
        driver.name
    );
    Ok(driver.id.as_i32())
}
