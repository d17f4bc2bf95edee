//! Converters for numbers, booleans, strings, paths, URIs, UUIDs, hosts and
//! regular expressions.

use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use regex::Regex;
use url::{Host, Url};
use uuid::Uuid;

use super::ValueConverter;
use crate::error::ConversionError;

const INTEGER_SYNTAX: &str = "-?(0 | [1-9][0-9]*)";
const FLOAT_SYNTAX: &str = "<floating-point value>";

/// `true` or `false`, exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanConverter;

impl ValueConverter for BooleanConverter {
    type Value = bool;

    fn parse(&self, text: &str) -> Result<bool, ConversionError> {
        match text {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(ConversionError::Boolean(other.to_string())),
        }
    }

    fn print(&self, value: &bool) -> String {
        value.to_string()
    }

    fn example(&self) -> bool {
        true
    }

    fn syntax(&self) -> String {
        "true | false".to_string()
    }
}

macro_rules! from_str_converter {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $syntax:expr, $example:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl ValueConverter for $name {
            type Value = $ty;

            fn parse(&self, text: &str) -> Result<$ty, ConversionError> {
                Ok(text.parse::<$ty>()?)
            }

            fn print(&self, value: &$ty) -> String {
                value.to_string()
            }

            fn example(&self) -> $ty {
                $example
            }

            fn syntax(&self) -> String {
                $syntax.to_string()
            }
        }
    };
}

from_str_converter!(
    /// 32-bit signed integers.
    I32Converter, i32, INTEGER_SYNTAX, 23
);
from_str_converter!(
    /// 64-bit signed integers.
    I64Converter, i64, INTEGER_SYNTAX, 23
);
from_str_converter!(
    /// 32-bit floats.
    F32Converter, f32, FLOAT_SYNTAX, 23.0
);
from_str_converter!(
    /// 64-bit floats.
    F64Converter, f64, FLOAT_SYNTAX, 23.0
);
from_str_converter!(
    /// Arbitrary-precision integers.
    BigIntegerConverter, BigInt, INTEGER_SYNTAX, BigInt::from(10)
);

/// Arbitrary-precision decimals.
#[derive(Debug, Clone, Copy, Default)]
pub struct BigDecimalConverter;

impl ValueConverter for BigDecimalConverter {
    type Value = BigDecimal;

    fn parse(&self, text: &str) -> Result<BigDecimal, ConversionError> {
        Ok(BigDecimal::from_str(text)?)
    }

    fn print(&self, value: &BigDecimal) -> String {
        value.to_string()
    }

    fn example(&self) -> BigDecimal {
        BigDecimal::new(BigInt::from(314_159), 5)
    }

    fn syntax(&self) -> String {
        "<decimal value, optionally with exponent>".to_string()
    }
}

/// Any string, unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringConverter;

impl ValueConverter for StringConverter {
    type Value = String;

    fn parse(&self, text: &str) -> Result<String, ConversionError> {
        Ok(text.to_string())
    }

    fn print(&self, value: &String) -> String {
        value.clone()
    }

    fn example(&self) -> String {
        "string".to_string()
    }

    fn syntax(&self) -> String {
        "<any sequence of characters>".to_string()
    }
}

/// Filesystem paths. No existence check is made.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathConverter;

impl ValueConverter for PathConverter {
    type Value = PathBuf;

    fn parse(&self, text: &str) -> Result<PathBuf, ConversionError> {
        Ok(PathBuf::from(text))
    }

    fn print(&self, value: &PathBuf) -> String {
        value.to_string_lossy().into_owned()
    }

    fn example(&self) -> PathBuf {
        PathBuf::from("/etc/passwd")
    }

    fn syntax(&self) -> String {
        "<platform-specific path syntax>".to_string()
    }
}

/// Absolute URIs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UriConverter;

impl ValueConverter for UriConverter {
    type Value = Url;

    fn parse(&self, text: &str) -> Result<Url, ConversionError> {
        Ok(Url::parse(text)?)
    }

    fn print(&self, value: &Url) -> String {
        value.as_str().to_string()
    }

    fn example(&self) -> Url {
        Url::parse("https://www.example.com/").expect("literal URI parses")
    }

    fn syntax(&self) -> String {
        "<URI> (RFC 3986)".to_string()
    }
}

/// UUIDs in hyphenated hexadecimal form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidConverter;

impl ValueConverter for UuidConverter {
    type Value = Uuid;

    fn parse(&self, text: &str) -> Result<Uuid, ConversionError> {
        Ok(Uuid::parse_str(text)?)
    }

    fn print(&self, value: &Uuid) -> String {
        value.hyphenated().to_string()
    }

    fn example(&self) -> Uuid {
        Uuid::from_u128(0xf545455c_058e_4af2_96fc_9e5986b6cc99)
    }

    fn syntax(&self) -> String {
        "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}".to_string()
    }
}

/// Hostnames and IP addresses. IPv6 addresses may be bracketed.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostConverter;

impl ValueConverter for HostConverter {
    type Value = Host<String>;

    fn parse(&self, text: &str) -> Result<Host<String>, ConversionError> {
        if let Ok(address) = text.parse::<IpAddr>() {
            return Ok(match address {
                IpAddr::V4(v4) => Host::Ipv4(v4),
                IpAddr::V6(v6) => Host::Ipv6(v6),
            });
        }
        Ok(Host::parse(text)?)
    }

    fn print(&self, value: &Host<String>) -> String {
        value.to_string()
    }

    fn example(&self) -> Host<String> {
        Host::Ipv4(std::net::Ipv4Addr::LOCALHOST)
    }

    fn syntax(&self) -> String {
        "Hostname, IPv4 or IPv6 address (RFC 2732)".to_string()
    }
}

/// Regular expressions. Not part of the core directory; register it with
/// [`ConverterDirectory::with`](crate::ConverterDirectory::with).
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexConverter;

impl ValueConverter for RegexConverter {
    type Value = Regex;

    fn parse(&self, text: &str) -> Result<Regex, ConversionError> {
        Ok(Regex::new(text)?)
    }

    fn print(&self, value: &Regex) -> String {
        value.as_str().to_string()
    }

    fn example(&self) -> Regex {
        Regex::new("[a-z]+").expect("literal pattern compiles")
    }

    fn syntax(&self) -> String {
        "<regular expression>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<C: ValueConverter>(converter: &C, text: &str) -> String
    where
        C::Value: PartialEq,
    {
        let value = converter.parse(text).unwrap();
        let printed = converter.print(&value);
        assert_eq!(converter.parse(&printed).unwrap(), value);
        printed
    }

    #[test]
    fn test_boolean_accepts_only_exact_literals() {
        let c = BooleanConverter;
        assert!(c.parse("true").unwrap());
        assert!(!c.parse("false").unwrap());
        for bad in ["TRUE", "True", "yes", "1", "", " true"] {
            assert!(c.parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_integers() {
        assert_eq!(I32Converter.parse("-5").unwrap(), -5);
        assert!(I32Converter.parse("x").is_err());
        assert!(I32Converter.parse("4294967296").is_err());
        assert_eq!(I64Converter.parse("4294967296").unwrap(), 4_294_967_296);
        assert_eq!(roundtrip(&BigIntegerConverter, "123456789012345678901234567890"), "123456789012345678901234567890");
    }

    #[test]
    fn test_floats() {
        assert_eq!(F64Converter.parse("23.5").unwrap(), 23.5);
        assert_eq!(roundtrip(&F32Converter, "0.1"), "0.1");
        assert!(F64Converter.parse("abc").is_err());
    }

    #[test]
    fn test_big_decimal_roundtrip() {
        roundtrip(&BigDecimalConverter, "3.14159");
        roundtrip(&BigDecimalConverter, "-0.000001");
        assert!(BigDecimalConverter.parse("1.2.3").is_err());
    }

    #[test]
    fn test_uri() {
        let url = UriConverter.parse("https://www.example.com/x?y=z").unwrap();
        assert_eq!(UriConverter.print(&url), "https://www.example.com/x?y=z");
        roundtrip(&UriConverter, "urn:x");
        assert!(UriConverter.parse("not a uri").is_err());
    }

    #[test]
    fn test_uuid() {
        let printed = roundtrip(&UuidConverter, "F545455C-058E-4AF2-96FC-9E5986B6CC99");
        assert_eq!(printed, "f545455c-058e-4af2-96fc-9e5986b6cc99");
        assert!(UuidConverter.parse("f545455c").is_err());
    }

    #[test]
    fn test_host_variants() {
        assert_eq!(roundtrip(&HostConverter, "127.0.0.1"), "127.0.0.1");
        assert_eq!(roundtrip(&HostConverter, "::1"), "[::1]");
        assert_eq!(roundtrip(&HostConverter, "[::1]"), "[::1]");
        assert_eq!(roundtrip(&HostConverter, "example.com"), "example.com");
        assert!(HostConverter.parse("exa mple.com").is_err());
    }

    #[test]
    fn test_path_and_string_are_identity() {
        assert_eq!(roundtrip(&PathConverter, "/etc/passwd"), "/etc/passwd");
        assert_eq!(roundtrip(&StringConverter, "any text at all"), "any text at all");
    }

    #[test]
    fn test_regex() {
        let re = RegexConverter.parse("^a+$").unwrap();
        assert!(re.is_match("aaa"));
        assert_eq!(RegexConverter.print(&re), "^a+$");
        assert!(RegexConverter.parse("(").is_err());
    }

    #[test]
    fn test_literal_examples_are_valid() {
        assert_eq!(UriConverter.example().as_str(), "https://www.example.com/");
        let re = RegexConverter.example();
        assert_eq!(RegexConverter.print(&RegexConverter.parse(&RegexConverter.print(&re)).unwrap()), "[a-z]+");
    }

    #[test]
    fn test_examples_roundtrip() {
        fn check<C: ValueConverter>(c: C)
        where
            C::Value: PartialEq,
        {
            let example = c.example();
            assert_eq!(c.parse(&c.print(&example)).unwrap(), example);
            assert!(!c.syntax().is_empty());
        }
        check(BooleanConverter);
        check(I32Converter);
        check(I64Converter);
        check(F32Converter);
        check(F64Converter);
        check(BigIntegerConverter);
        check(BigDecimalConverter);
        check(StringConverter);
        check(PathConverter);
        check(UriConverter);
        check(UuidConverter);
        check(HostConverter);
    }
}
