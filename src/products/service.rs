use crate::error::ApiError;

pub const NAME_MIN: usize = 3;
pub const NAME_MAX: usize = 30;
pub const DESCRIPTION_MIN: usize = 4;
pub const DESCRIPTION_MAX: usize = 500;

/// Human-readable identifier derived from the product name: lowercased,
/// with alphanumeric runs joined by hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_separator = true;
        }
    }
    slug
}

/// Validation stage shared by create and update: ranges come from the
/// product schema.
pub fn validate_fields(
    name: &str,
    quantity: i32,
    price_per_unit: f64,
    description: &str,
) -> Result<(), ApiError> {
    let name_len = name.chars().count();
    if name_len < NAME_MIN || name_len > NAME_MAX {
        return Err(ApiError::Validation(format!(
            "Product name must be between {} and {} characters",
            NAME_MIN, NAME_MAX
        )));
    }

    if quantity < 0 {
        return Err(ApiError::Validation("Quantity can not be negative".into()));
    }

    if !price_per_unit.is_finite() || price_per_unit < 0.0 {
        return Err(ApiError::Validation("Price can not be negative".into()));
    }

    let description_len = description.chars().count();
    if description_len < DESCRIPTION_MIN || description_len > DESCRIPTION_MAX {
        return Err(ApiError::Validation(format!(
            "Description must be between {} and {} characters",
            DESCRIPTION_MIN, DESCRIPTION_MAX
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_joins_with_hyphens() {
        assert_eq!(slugify("Wireless Mouse"), "wireless-mouse");
        assert_eq!(slugify("USB-C  Cable (2m)"), "usb-c-cable-2m");
        assert_eq!(slugify("  Plain  "), "plain");
    }

    #[test]
    fn slugify_drops_leading_and_trailing_separators() {
        assert_eq!(slugify("!!Sale!!"), "sale");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn validate_accepts_in_range_fields() {
        assert!(validate_fields("Mouse", 3, 19.99, "A decent mouse").is_ok());
        assert!(validate_fields("Pen", 0, 0.0, "Inky").is_ok());
    }

    #[test]
    fn validate_rejects_each_out_of_range_field() {
        assert!(validate_fields("ab", 1, 1.0, "valid description").is_err());
        assert!(validate_fields(&"x".repeat(31), 1, 1.0, "valid description").is_err());
        assert!(validate_fields("Mouse", -1, 1.0, "valid description").is_err());
        assert!(validate_fields("Mouse", 1, -0.01, "valid description").is_err());
        assert!(validate_fields("Mouse", 1, f64::NAN, "valid description").is_err());
        assert!(validate_fields("Mouse", 1, 1.0, "abc").is_err());
        assert!(validate_fields("Mouse", 1, 1.0, &"d".repeat(501)).is_err());
    }
}
