//! Account row/payload models. Auth is a thin adapter (spec.md §1), kept
//! close to the teacher's original shape minus the itinerary-era
//! `budget_preference`/`risk_preference` fields.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Account {
    pub id: i32,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupPayload {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl SignupPayload {
    /// Cheap format check; no external regex crate needed for one pattern.
    pub fn validate_email(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else { return false };
        !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
    }

    /// Validate password strength
    /// - Minimum 8 characters
    /// - Maximum 128 characters
    /// - At least one uppercase letter
    /// - At least one lowercase letter
    /// - At least one number
    /// - Only ASCII characters allowed
    pub fn validate_password(password: &str) -> Result<(), String> {
        if password.len() < 8 {
            return Err("Password must be at least 8 characters long".to_string());
        }
        if password.len() > 128 {
            return Err("Password must be 128 characters or less".to_string());
        }
        if !password.is_ascii() {
            return Err("Password must contain only ASCII characters".to_string());
        }
        if !password.chars().any(|c| c.is_uppercase()) {
            return Err("Password must contain at least one uppercase letter".to_string());
        }
        if !password.chars().any(|c| c.is_lowercase()) {
            return Err("Password must contain at least one lowercase letter".to_string());
        }
        if !password.chars().any(|c| c.is_numeric()) {
            return Err("Password must contain at least one number".to_string());
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        let email_trimmed = self.email.trim();
        if email_trimmed.is_empty() {
            return Err("Email is required".to_string());
        }
        if !Self::validate_email(email_trimmed) {
            return Err("Invalid email format".to_string());
        }

        let first_name_trimmed = self.first_name.trim();
        if first_name_trimmed.is_empty() {
            return Err("First name is required".to_string());
        }
        if first_name_trimmed.len() > 50 {
            return Err("First name must be 50 characters or less".to_string());
        }

        let last_name_trimmed = self.last_name.trim();
        if last_name_trimmed.is_empty() {
            return Err("Last name is required".to_string());
        }
        if last_name_trimmed.len() > 50 {
            return Err("Last name must be 50 characters or less".to_string());
        }

        Self::validate_password(&self.password)?;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub id: i32,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignupResponse {
    pub id: i32,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub id: i32,
}
