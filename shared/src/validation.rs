//! Validation utilities for the Plant Health Scanner Platform

// ============================================================================
// Analysis Validations
// ============================================================================

/// Validate that a reported coverage percentage is in [0, 100]
pub fn validate_percentage(value: f64) -> Result<(), &'static str> {
    if !(0.0..=100.0).contains(&value) {
        return Err("Percentage must be between 0 and 100");
    }
    Ok(())
}

/// Validate that a health score is in [0, 100]
pub fn validate_health_score(score: i32) -> Result<(), &'static str> {
    if !(0..=100).contains(&score) {
        return Err("Health score must be between 0 and 100");
    }
    Ok(())
}

/// Validate that a selector confidence is in [0, 1]
pub fn validate_confidence(confidence: f32) -> Result<(), &'static str> {
    if !(0.0..=1.0).contains(&confidence) {
        return Err("Confidence must be between 0 and 1");
    }
    Ok(())
}

/// Validate frame dimensions before analysis
pub fn validate_frame_dimensions(width: u32, height: u32) -> Result<(), &'static str> {
    if width == 0 || height == 0 {
        return Err("Frame dimensions must be non-zero");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate Thai phone number format
/// Accepts: 0812345678, 081-234-5678, +66812345678
pub fn validate_thai_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    // Thai mobile: 10 digits starting with 0
    if digits.len() == 10 && digits.starts_with('0') {
        return Ok(());
    }
    // Without the leading zero
    if digits.len() == 9 && !digits.starts_with('0') {
        return Ok(());
    }
    // With the 66 country code
    if digits.len() == 11 && digits.starts_with("66") {
        return Ok(());
    }

    Err("Invalid Thai phone number format")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_percentage() {
        assert!(validate_percentage(0.0).is_ok());
        assert!(validate_percentage(100.0).is_ok());
        assert!(validate_percentage(42.5).is_ok());
        assert!(validate_percentage(-0.1).is_err());
        assert!(validate_percentage(100.1).is_err());
    }

    #[test]
    fn test_validate_health_score() {
        assert!(validate_health_score(0).is_ok());
        assert!(validate_health_score(100).is_ok());
        assert!(validate_health_score(-1).is_err());
        assert!(validate_health_score(101).is_err());
    }

    #[test]
    fn test_validate_confidence() {
        assert!(validate_confidence(0.0).is_ok());
        assert!(validate_confidence(0.95).is_ok());
        assert!(validate_confidence(1.01).is_err());
    }

    #[test]
    fn test_validate_frame_dimensions() {
        assert!(validate_frame_dimensions(800, 600).is_ok());
        assert!(validate_frame_dimensions(0, 600).is_err());
        assert!(validate_frame_dimensions(800, 0).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("farmer@example.com").is_ok());
        assert!(validate_email("invalid").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_validate_thai_phone() {
        assert!(validate_thai_phone("0812345678").is_ok());
        assert!(validate_thai_phone("081-234-5678").is_ok());
        assert!(validate_thai_phone("+66812345678").is_ok());
        assert!(validate_thai_phone("12345").is_err());
    }
}
