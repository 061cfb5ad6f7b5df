//! Phone number input for OTP login
//!
//! Numbers are Tajik mobile numbers: country code `992` followed by nine
//! digits, displayed as `+992 XX XXX-XX-XX`.

/// Country code prepended to locally typed numbers
pub const COUNTRY_CODE: &str = "992";

/// Digits in a complete number, country code included
pub const PHONE_DIGITS: usize = 12;

/// Digits in an OTP code
pub const OTP_DIGITS: usize = 4;

pub fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format up to 12 digits as `+992 XX XXX-XX-XX`; extra digits are dropped
pub fn format_phone(digits: &str) -> String {
    let digits: Vec<char> = digits.chars().take(PHONE_DIGITS).collect();
    if digits.is_empty() {
        return String::new();
    }

    let slice = |from: usize, to: usize| -> String {
        digits[from.min(digits.len())..to.min(digits.len())]
            .iter()
            .collect()
    };

    let mut formatted = format!("+{COUNTRY_CODE}");
    let groups = [(3, 5, ' '), (5, 8, ' '), (8, 10, '-'), (10, 12, '-')];
    for (from, to, sep) in groups {
        if digits.len() <= from {
            break;
        }
        formatted.push(sep);
        formatted.push_str(&slice(from, to));
    }
    formatted
}

/// Phone field state: keeps the formatted value as the diner types
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhoneInput {
    formatted: String,
}

impl PhoneInput {
    /// Apply raw input. Returns `false` (and keeps the previous value) when
    /// the input carries more than 12 digits.
    pub fn update(&mut self, raw: &str) -> bool {
        let digits = digits_only(raw);
        if digits.len() > PHONE_DIGITS {
            return false;
        }
        if digits.is_empty() {
            self.formatted.clear();
            return true;
        }

        let full = if digits.starts_with(COUNTRY_CODE) {
            digits
        } else {
            format!("{COUNTRY_CODE}{digits}")
        };
        self.formatted = format_phone(&full);
        true
    }

    /// Display form
    pub fn as_str(&self) -> &str {
        &self.formatted
    }

    pub fn digits(&self) -> String {
        digits_only(&self.formatted)
    }

    pub fn is_complete(&self) -> bool {
        self.digits().len() == PHONE_DIGITS
    }

    /// Form sent to the backend: `+992935551234`
    pub fn e164(&self) -> String {
        format!("+{}", self.digits())
    }
}

/// OTP field state: digits only, at most four
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpInput {
    code: String,
}

impl OtpInput {
    pub fn update(&mut self, raw: &str) {
        self.code = digits_only(raw).chars().take(OTP_DIGITS).collect();
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }

    pub fn is_complete(&self) -> bool {
        self.code.len() == OTP_DIGITS
    }

    pub fn clear(&mut self) {
        self.code.clear();
    }
}
