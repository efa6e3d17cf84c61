//! # Input Validation
//!
//! Pre-flight validators for every form the client submits:
//!
//! - Email and password (login, registration)
//! - Username (registration)
//! - Class name (class creation and settings)
//! - File uploads (size and MIME type)
//! - YouTube video links
//!
//! All validators are pure and return a [`Validation`]. A failed validation
//! never reaches the network.
//!
//! ## Usage
//!
//! ```rust
//! use studhelper_validation::validate_password;
//!
//! let result = validate_password("hunter2");
//! assert!(!result.is_valid());
//! assert_eq!(result.errors().len(), 2);
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

/// Loose email shape: something, an `@`, something, a dot, something.
pub static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

/// Letters, digits, hyphens and underscores.
pub static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("Invalid regex"));

/// `youtube.com/watch?v=<id>` or `youtu.be/<id>` with an 11-character video ID.
pub static YOUTUBE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://)?(www\.)?(youtube\.com/watch\?v=|youtu\.be/)([a-zA-Z0-9_-]{11})$")
        .expect("Invalid regex")
});

/// Maximum accepted upload size (10 MiB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Accepted upload MIME types with their display family.
pub const ACCEPTED_MIME_TYPES: &[(&str, &str)] = &[
    ("application/pdf", "PDF"),
    ("application/msword", "Word"),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "Word",
    ),
    ("application/vnd.ms-powerpoint", "PowerPoint"),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "PowerPoint",
    ),
    ("text/plain", "Text"),
];

/// Accepted upload file extensions.
pub const ACCEPTED_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx", ".ppt", ".pptx", ".txt"];

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 20;
pub const MIN_CLASS_NAME_LENGTH: usize = 3;
pub const MAX_CLASS_NAME_LENGTH: usize = 100;

/// Outcome of a validator.
///
/// Single-rule validators carry at most one error; the password validator
/// accumulates one error per failed rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    errors: Vec<String>,
}

impl Validation {
    /// A passing validation.
    #[must_use]
    pub fn valid() -> Self {
        Self::default()
    }

    /// A failing validation with a single message.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
        }
    }

    /// Whether all rules passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The first error, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }

    /// All errors in rule order.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Converts into a `Result`, joining messages with `; `.
    pub fn into_result(self) -> Result<(), String> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self.errors.join("; "))
        }
    }
}

/// Validate an email address.
pub fn validate_email(email: &str) -> Validation {
    if EMAIL_REGEX.is_match(email) {
        Validation::valid()
    } else {
        Validation::invalid("Please enter a valid email address")
    }
}

/// Validate a password, reporting every rule it breaks.
pub fn validate_password(password: &str) -> Validation {
    let mut errors = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push("Password must be at least 8 characters long".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one number".to_string());
    }

    Validation { errors }
}

/// Validate a username.
pub fn validate_username(username: &str) -> Validation {
    let len = username.chars().count();

    if len < MIN_USERNAME_LENGTH {
        return Validation::invalid("Username must be at least 3 characters long");
    }
    if len > MAX_USERNAME_LENGTH {
        return Validation::invalid("Username must be less than 20 characters long");
    }
    if !USERNAME_REGEX.is_match(username) {
        return Validation::invalid(
            "Username can only contain letters, numbers, hyphens, and underscores",
        );
    }

    Validation::valid()
}

/// Validate a class name.
pub fn validate_class_name(name: &str) -> Validation {
    if name.trim().is_empty() {
        return Validation::invalid("Class name is required");
    }

    let len = name.chars().count();
    if len < MIN_CLASS_NAME_LENGTH {
        return Validation::invalid("Class name must be at least 3 characters long");
    }
    if len > MAX_CLASS_NAME_LENGTH {
        return Validation::invalid("Class name must be less than 100 characters long");
    }

    Validation::valid()
}

/// Validate an upload by size and declared MIME type.
///
/// Size is checked first, so an oversized file of an unsupported type
/// reports the size error.
pub fn validate_file_upload(size: u64, mime_type: &str) -> Validation {
    if size > MAX_FILE_SIZE {
        return Validation::invalid("File size must be less than 10MB");
    }
    if !is_accepted_mime_type(mime_type) {
        return Validation::invalid(
            "File type not supported. Please upload PDF, Word, PowerPoint, or text files.",
        );
    }

    Validation::valid()
}

/// Validate a YouTube video URL.
pub fn validate_youtube_url(url: &str) -> Validation {
    if YOUTUBE_REGEX.is_match(url) {
        Validation::valid()
    } else {
        Validation::invalid("Please enter a valid YouTube URL")
    }
}

/// Returns true if the MIME type is in the accepted upload set.
#[must_use]
pub fn is_accepted_mime_type(mime_type: &str) -> bool {
    ACCEPTED_MIME_TYPES.iter().any(|(m, _)| *m == mime_type)
}

/// Display family (`PDF`, `Word`, ...) of an accepted MIME type.
#[must_use]
pub fn mime_family(mime_type: &str) -> Option<&'static str> {
    ACCEPTED_MIME_TYPES
        .iter()
        .find(|(m, _)| *m == mime_type)
        .map(|(_, family)| *family)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ada@example.com").is_valid());
        assert!(validate_email("a.b+c@uni.edu.au").is_valid());

        assert!(!validate_email("").is_valid());
        assert!(!validate_email("ada@example").is_valid());
        assert!(!validate_email("ada example@x.com").is_valid());
        assert!(!validate_email("@example.com").is_valid());
    }

    #[test]
    fn test_validate_password_rules() {
        assert!(validate_password("Passw0rdOk").is_valid());

        let result = validate_password("password");
        assert_eq!(
            result.errors(),
            &[
                "Password must contain at least one uppercase letter".to_string(),
                "Password must contain at least one number".to_string(),
            ]
        );

        let result = validate_password("");
        assert_eq!(result.errors().len(), 4);
        assert_eq!(
            result.error(),
            Some("Password must be at least 8 characters long")
        );
    }

    #[test]
    fn test_validate_username_boundaries() {
        assert!(validate_username("abc").is_valid());
        assert!(validate_username(&"a".repeat(20)).is_valid());
        assert!(validate_username("snake_case-name").is_valid());

        assert_eq!(
            validate_username("ab").error(),
            Some("Username must be at least 3 characters long")
        );
        assert_eq!(
            validate_username(&"a".repeat(21)).error(),
            Some("Username must be less than 20 characters long")
        );
        assert!(!validate_username("has space").is_valid());
        assert!(!validate_username("dot.name").is_valid());
    }

    #[test]
    fn test_validate_class_name() {
        assert_eq!(validate_class_name("   ").error(), Some("Class name is required"));
        assert!(!validate_class_name("AB").is_valid());
        assert!(validate_class_name("Bio").is_valid());
        assert!(validate_class_name(&"x".repeat(100)).is_valid());
        assert!(!validate_class_name(&"x".repeat(101)).is_valid());
    }

    #[test]
    fn test_validate_file_upload() {
        assert!(validate_file_upload(1024, "application/pdf").is_valid());
        assert!(validate_file_upload(MAX_FILE_SIZE, "text/plain").is_valid());

        assert_eq!(
            validate_file_upload(MAX_FILE_SIZE + 1, "application/pdf").error(),
            Some("File size must be less than 10MB")
        );
        assert_eq!(
            validate_file_upload(10, "image/png").error(),
            Some("File type not supported. Please upload PDF, Word, PowerPoint, or text files.")
        );
        // size wins over type
        assert_eq!(
            validate_file_upload(MAX_FILE_SIZE + 1, "image/png").error(),
            Some("File size must be less than 10MB")
        );
    }

    #[test]
    fn test_validate_youtube_url() {
        assert!(validate_youtube_url("https://youtu.be/dQw4w9WgXcQ").is_valid());
        assert!(validate_youtube_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ").is_valid());
        assert!(validate_youtube_url("youtube.com/watch?v=dQw4w9WgXcQ").is_valid());

        assert!(!validate_youtube_url("https://youtu.be/short").is_valid());
        assert!(!validate_youtube_url("https://vimeo.com/dQw4w9WgXcQ").is_valid());
        assert!(!validate_youtube_url("https://youtu.be/dQw4w9WgXcQ&t=1").is_valid());
    }

    #[test]
    fn test_mime_family() {
        assert_eq!(mime_family("application/msword"), Some("Word"));
        assert_eq!(mime_family("image/png"), None);
    }

    #[test]
    fn test_into_result_joins_messages() {
        assert!(validate_email("a@b.co").into_result().is_ok());
        let err = validate_password("abcdefgh").into_result().unwrap_err();
        assert!(err.contains("uppercase"));
        assert!(err.contains("; "));
    }
}
