//! Fake data generation from tag strings
//!
//! A tag is free text containing placeholders such as `{email}`, `{firstname}`
//! or `{number:1,100}`. Every placeholder naming a known function is replaced
//! with a generated value; text outside braces is kept as-is, and placeholders
//! naming unknown functions are echoed back unchanged.
//!
//! Function names ignore case and underscores, so `{first_name}`, `{FirstName}`
//! and `{firstname}` are the same function. Arguments follow the name after a
//! colon and are separated by commas (`{number:1,100}`) or colons
//! (`{number:1:100}`).

use chrono::{Duration as ChronoDuration, Utc};
use fake::faker::address::en::*;
use fake::faker::company::en::*;
use fake::faker::internet::en::*;
use fake::faker::lorem::en::*;
use fake::faker::name::en::*;
use fake::faker::phone_number::en::*;
use fake::Fake;
use once_cell::sync::Lazy;
use rand::Rng;
use regex::{Captures, Regex};
use thiserror::Error;
use uuid::Uuid;

/// Upper bound for word, sentence, paragraph and password lengths
pub const MAX_COUNT: usize = 1000;

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)(?::([^}]*))?\}").expect("tag pattern is valid")
});

/// Error raised by a fake data generator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FakeError {
    #[error("invalid arguments for '{function}': {message}")]
    InvalidArguments { function: String, message: String },
}

/// Source of synthetic values for the fake data stage
pub trait FakeGenerator {
    /// Expand every placeholder in `tag`
    fn generate(&self, tag: &str) -> Result<String, FakeError>;
}

/// Generator backed by the `fake` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct Faker;

impl FakeGenerator for Faker {
    fn generate(&self, tag: &str) -> Result<String, FakeError> {
        let mut failure = None;

        let expanded = TAG_RE.replace_all(tag, |caps: &Captures| {
            let whole = caps[0].to_string();
            if failure.is_some() {
                return whole;
            }
            match generate_value(&caps[1], caps.get(2).map(|m| m.as_str())) {
                Ok(Some(value)) => value,
                Ok(None) => whole,
                Err(e) => {
                    failure = Some(e);
                    whole
                }
            }
        });

        match failure {
            Some(e) => Err(e),
            None => Ok(expanded.into_owned()),
        }
    }
}

/// Generate a single value; `Ok(None)` means the function is unknown
fn generate_value(name: &str, args: Option<&str>) -> Result<Option<String>, FakeError> {
    let function = normalize(name);
    let args = Args::new(name, args);

    let value: String = match function.as_str() {
        // Person
        "name" => Name().fake(),
        "firstname" => FirstName().fake(),
        "lastname" => LastName().fake(),
        "title" | "nameprefix" => Title().fake(),
        "suffix" | "namesuffix" => Suffix().fake(),

        // Internet
        "email" => FreeEmail().fake(),
        "safeemail" => SafeEmail().fake(),
        "username" => Username().fake(),
        "password" => {
            let (min, max) = args.usize_range(8, 20)?;
            Password(min..max + 1).fake()
        }
        "domain" | "domainname" => {
            let word: String = Word().fake();
            let suffix: String = DomainSuffix().fake();
            format!("{}.{}", word.to_lowercase(), suffix)
        }
        "url" => {
            let word: String = Word().fake();
            let suffix: String = DomainSuffix().fake();
            format!("https://www.{}.{}", word.to_lowercase(), suffix)
        }
        "ipv4" | "ipv4address" => IPv4().fake(),
        "ipv6" | "ipv6address" => IPv6().fake(),
        "macaddress" => MACAddress().fake(),
        "useragent" => UserAgent().fake(),

        // Phone
        "phone" | "phonenumber" => PhoneNumber().fake(),
        "cellnumber" => CellNumber().fake(),

        // Address
        "city" => CityName().fake(),
        "street" | "streetname" => StreetName().fake(),
        "streetaddress" => {
            let street: String = StreetName().fake();
            let number: u32 = (1..9999u32).fake();
            format!("{} {}", number, street)
        }
        "zip" | "zipcode" => ZipCode().fake(),
        "state" => StateName().fake(),
        "stateabbr" => StateAbbr().fake(),
        "country" => CountryName().fake(),
        "countrycode" | "countryabr" => CountryCode().fake(),
        "latitude" => {
            let lat: f64 = Latitude().fake();
            lat.to_string()
        }
        "longitude" => {
            let lon: f64 = Longitude().fake();
            lon.to_string()
        }

        // Company
        "company" | "companyname" => CompanyName().fake(),
        "industry" => Industry().fake(),
        "profession" | "jobtitle" => Profession().fake(),
        "buzzword" => Buzzword().fake(),

        // Lorem
        "word" => Word().fake(),
        "words" => {
            let count = args.usize_or(0, 3)?;
            let words: Vec<String> = Words(count..count + 1).fake();
            words.join(" ")
        }
        "sentence" => {
            let count = args.usize_or(0, 8)?;
            Sentence(count..count + 1).fake()
        }
        "paragraph" => {
            let count = args.usize_or(0, 3)?;
            Paragraph(count..count + 1).fake()
        }

        // Identifiers
        "uuid" | "uuid4" => Uuid::new_v4().to_string(),
        "uuid7" => Uuid::now_v7().to_string(),

        // Primitives
        "bool" | "boolean" => rand::rng().random_bool(0.5).to_string(),
        "number" | "int" => {
            let (min, max) = args.i64_range(0, i32::MAX as i64)?;
            rand::rng().random_range(min..=max).to_string()
        }
        "float" => {
            let (min, max) = args.f64_range(0.0, 1.0)?;
            format!("{:.6}", rand::rng().random_range(min..=max))
        }
        "digit" => rand::rng().random_range(0..10).to_string(),
        "letter" => {
            let offset: u8 = rand::rng().random_range(0..26);
            char::from(b'a' + offset).to_string()
        }
        "numerify" => replace_pattern(&args.required(0)?, '#', || {
            char::from(b'0' + rand::rng().random_range(0..10u8))
        }),
        "lexify" => replace_pattern(&args.required(0)?, '?', || {
            char::from(b'a' + rand::rng().random_range(0..26u8))
        }),

        // Time
        "date" => random_past().format("%Y-%m-%d").to_string(),
        "time" => random_past().format("%H:%M:%S").to_string(),
        "datetime" => random_past().to_rfc3339(),
        "timestamp" => Utc::now().timestamp().to_string(),

        _ => return Ok(None),
    };

    Ok(Some(value))
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn replace_pattern(pattern: &str, marker: char, mut produce: impl FnMut() -> char) -> String {
    pattern
        .chars()
        .map(|c| if c == marker { produce() } else { c })
        .collect()
}

fn random_past() -> chrono::DateTime<Utc> {
    let days_back = rand::rng().random_range(0..3650);
    let seconds = rand::rng().random_range(0..86_400);
    Utc::now() - ChronoDuration::days(days_back) - ChronoDuration::seconds(seconds)
}

/// Parsed placeholder arguments
struct Args<'a> {
    function: &'a str,
    values: Vec<&'a str>,
}

impl<'a> Args<'a> {
    fn new(function: &'a str, raw: Option<&'a str>) -> Self {
        let values = raw
            .map(|r| r.split([',', ':']).map(str::trim).collect())
            .unwrap_or_default();
        Self { function, values }
    }

    fn invalid(&self, message: impl Into<String>) -> FakeError {
        FakeError::InvalidArguments {
            function: self.function.to_string(),
            message: message.into(),
        }
    }

    fn required(&self, index: usize) -> Result<String, FakeError> {
        self.values
            .get(index)
            .map(|v| v.to_string())
            .ok_or_else(|| self.invalid(format!("missing argument {}", index + 1)))
    }

    fn parse<T: std::str::FromStr>(&self, raw: &str) -> Result<T, FakeError> {
        raw.parse()
            .map_err(|_| self.invalid(format!("'{}' is not a valid number", raw)))
    }

    fn usize_or(&self, index: usize, default: usize) -> Result<usize, FakeError> {
        let count = match self.values.get(index) {
            Some(raw) => self.parse(raw)?,
            None => default,
        };
        self.bounded(count)
    }

    fn bounded(&self, count: usize) -> Result<usize, FakeError> {
        if count > MAX_COUNT {
            return Err(self.invalid(format!("{} exceeds the maximum of {}", count, MAX_COUNT)));
        }
        Ok(count)
    }

    fn range<T>(&self, default_min: T, default_max: T) -> Result<(T, T), FakeError>
    where
        T: std::str::FromStr + PartialOrd + std::fmt::Display + Copy,
    {
        let (min, max) = match self.values.as_slice() {
            [] => (default_min, default_max),
            [max] => (default_min, self.parse(max)?),
            [min, max] => (self.parse(min)?, self.parse(max)?),
            _ => return Err(self.invalid("expected at most two arguments")),
        };
        if min > max {
            return Err(self.invalid(format!("min {} is greater than max {}", min, max)));
        }
        Ok((min, max))
    }

    fn i64_range(&self, default_min: i64, default_max: i64) -> Result<(i64, i64), FakeError> {
        self.range(default_min, default_max)
    }

    fn f64_range(&self, default_min: f64, default_max: f64) -> Result<(f64, f64), FakeError> {
        let (min, max) = self.range(default_min, default_max)?;
        // NaN never compares greater, so `range` lets it through
        if !min.is_finite() || !max.is_finite() || !(max - min).is_finite() {
            return Err(self.invalid("bounds must be finite numbers"));
        }
        Ok((min, max))
    }

    fn usize_range(
        &self,
        default_min: usize,
        default_max: usize,
    ) -> Result<(usize, usize), FakeError> {
        let (min, max) = self.range(default_min, default_max)?;
        Ok((min, self.bounded(max)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_generation() {
        let email = Faker.generate("{email}").unwrap();
        assert!(email.contains('@'));
        assert!(!email.contains('{'));
    }

    #[test]
    fn test_name_aliases() {
        for tag in ["{firstname}", "{first_name}", "{FirstName}"] {
            let value = Faker.generate(tag).unwrap();
            assert!(!value.is_empty());
            assert!(!value.contains('{'), "{} was not expanded", tag);
        }
    }

    #[test]
    fn test_surrounding_text_is_kept() {
        let value = Faker.generate("user-{uuid}@example.com").unwrap();
        assert!(value.starts_with("user-"));
        assert!(value.ends_with("@example.com"));
        assert_eq!(value.len(), "user-@example.com".len() + 36);
    }

    #[test]
    fn test_unknown_tag_is_echoed() {
        assert_eq!(Faker.generate("{not_a_generator}").unwrap(), "{not_a_generator}");
        assert_eq!(Faker.generate("plain text").unwrap(), "plain text");
    }

    #[test]
    fn test_number_range() {
        for _ in 0..100 {
            let n: i64 = Faker.generate("{number:5,10}").unwrap().parse().unwrap();
            assert!((5..=10).contains(&n));
        }
        let n: i64 = Faker.generate("{number:1:3}").unwrap().parse().unwrap();
        assert!((1..=3).contains(&n));
    }

    #[test]
    fn test_invalid_arguments_fail() {
        let err = Faker.generate("{number:ten,1}").unwrap_err();
        assert!(matches!(err, FakeError::InvalidArguments { .. }));

        let err = Faker.generate("{number:10,1}").unwrap_err();
        assert!(err.to_string().contains("greater than"));
    }

    #[test]
    fn test_numerify_and_lexify() {
        let value = Faker.generate("{numerify:ID-####}").unwrap();
        assert_eq!(value.len(), 7);
        assert!(value[3..].chars().all(|c| c.is_ascii_digit()));

        let value = Faker.generate("{lexify:??}").unwrap();
        assert!(value.chars().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_non_finite_float_bounds_fail() {
        for tag in ["{float:0,inf}", "{float:NaN}", "{float:-1e308,1e308}"] {
            let err = Faker.generate(tag).unwrap_err();
            assert!(err.to_string().contains("finite"), "{}: {}", tag, err);
        }
        let value: f64 = Faker.generate("{float:1.5,2.5}").unwrap().parse().unwrap();
        assert!((1.5..=2.5).contains(&value));
    }

    #[test]
    fn test_oversized_counts_fail() {
        for tag in [
            "{words:18446744073709551615}",
            "{sentence:5000}",
            "{paragraph:1001}",
            "{password:8,18446744073709551615}",
        ] {
            let err = Faker.generate(tag).unwrap_err();
            assert!(matches!(err, FakeError::InvalidArguments { .. }), "{}", tag);
            assert!(err.to_string().contains("maximum"), "{}: {}", tag, err);
        }
        let password = Faker.generate("{password:4,6}").unwrap();
        assert!((4..=6).contains(&password.chars().count()));
    }

    #[test]
    fn test_words_count() {
        let value = Faker.generate("{words:4}").unwrap();
        assert_eq!(value.split_whitespace().count(), 4);
    }
}
