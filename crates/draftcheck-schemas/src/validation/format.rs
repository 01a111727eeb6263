//! Checks behind the `format` keyword
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

use chrono::{FixedOffset, NaiveDate, NaiveTime};
use regex::{Captures, Regex};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::OnceLock;
use url::Host;

static DATE_REGEX: OnceLock<Regex> = OnceLock::new();
static TIME_REGEX: OnceLock<Regex> = OnceLock::new();
static DATE_TIME_REGEX: OnceLock<Regex> = OnceLock::new();
static EMAIL_LOCAL_REGEX: OnceLock<Regex> = OnceLock::new();
static IDN_EMAIL_LOCAL_REGEX: OnceLock<Regex> = OnceLock::new();
static HOST_LABEL_REGEX: OnceLock<Regex> = OnceLock::new();
static URI_SCHEME_REGEX: OnceLock<Regex> = OnceLock::new();
static URI_CHARS_REGEX: OnceLock<Regex> = OnceLock::new();
static IRI_CHARS_REGEX: OnceLock<Regex> = OnceLock::new();
static URI_TEMPLATE_REGEX: OnceLock<Regex> = OnceLock::new();
static JSON_POINTER_REGEX: OnceLock<Regex> = OnceLock::new();
static RELATIVE_JSON_POINTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("built-in format pattern must compile"))
}

const TIME_PATTERN: &str =
    r"^(\d{2}):(\d{2}):(\d{2})(?:\.\d+)?(?:[Zz]|([+-])(\d{2}):(\d{2}))$";
const DATE_TIME_PATTERN: &str = r"^(\d{4})-(\d{2})-(\d{2})[Tt ](\d{2}):(\d{2}):(\d{2})(?:\.\d+)?(?:[Zz]|([+-])(\d{2}):(\d{2}))$";

/// Formats with a built-in check; any other name is an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    DateTime,
    Time,
    Date,
    Email,
    IdnEmail,
    Hostname,
    IdnHostname,
    Ipv4,
    Ipv6,
    Uri,
    UriReference,
    Iri,
    IriReference,
    UriTemplate,
    JsonPointer,
    RelativeJsonPointer,
    Regex,
}

impl StringFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        let format = match name {
            "date-time" => Self::DateTime,
            "time" => Self::Time,
            "date" => Self::Date,
            "email" => Self::Email,
            "idn-email" => Self::IdnEmail,
            "hostname" => Self::Hostname,
            "idn-hostname" => Self::IdnHostname,
            "ipv4" => Self::Ipv4,
            "ipv6" => Self::Ipv6,
            "uri" => Self::Uri,
            "uri-reference" => Self::UriReference,
            "iri" => Self::Iri,
            "iri-reference" => Self::IriReference,
            "uri-template" => Self::UriTemplate,
            "json-pointer" => Self::JsonPointer,
            "relative-json-pointer" => Self::RelativeJsonPointer,
            "regex" => Self::Regex,
            _ => return None,
        };
        Some(format)
    }

    /// Character budget for the offending value in mismatch messages
    pub fn preview_len(&self) -> usize {
        match self {
            Self::DateTime | Self::Time => 32,
            Self::Date => 10,
            Self::Ipv4 => 20,
            Self::Ipv6 => 45,
            _ => 64,
        }
    }

    pub fn is_valid(&self, text: &str) -> bool {
        match self {
            Self::DateTime => is_date_time(text),
            Self::Time => is_time(text),
            Self::Date => is_date(text),
            Self::Email => is_email(text, false),
            Self::IdnEmail => is_email(text, true),
            Self::Hostname => is_ascii_hostname(text),
            Self::IdnHostname => is_idn_hostname(text),
            Self::Ipv4 => text.parse::<Ipv4Addr>().is_ok(),
            Self::Ipv6 => text.parse::<Ipv6Addr>().is_ok(),
            Self::Uri => is_uri(text, false, true),
            Self::UriReference => is_uri(text, false, false),
            Self::Iri => is_uri(text, true, true),
            Self::IriReference => is_uri(text, true, false),
            Self::UriTemplate => regex(
                &URI_TEMPLATE_REGEX,
                r#"^(?:[^\s{}"<>\\^`|]|\{[+#./;?&=,!@|]?[A-Za-z0-9_](?:\.?(?:[A-Za-z0-9_]|%[0-9A-Fa-f]{2}))*(?:\*|:[1-9][0-9]{0,3})?(?:,[A-Za-z0-9_](?:\.?(?:[A-Za-z0-9_]|%[0-9A-Fa-f]{2}))*(?:\*|:[1-9][0-9]{0,3})?)*\})*$"#,
            )
            .is_match(text),
            Self::JsonPointer => {
                regex(&JSON_POINTER_REGEX, r"^(?:/(?:[^~/]|~[01])*)*$").is_match(text)
            }
            Self::RelativeJsonPointer => regex(
                &RELATIVE_JSON_POINTER_REGEX,
                r"^(?:0|[1-9][0-9]*)(?:#|(?:/(?:[^~/]|~[01])*)*)$",
            )
            .is_match(text),
            // only emptiness is checked; compiling is left to `pattern`
            Self::Regex => !text.is_empty(),
        }
    }
}

fn is_date(text: &str) -> bool {
    regex(&DATE_REGEX, r"^(\d{4})-(\d{2})-(\d{2})$")
        .captures(text)
        .is_some_and(|caps| valid_date(&caps, 1))
}

fn is_time(text: &str) -> bool {
    regex(&TIME_REGEX, TIME_PATTERN)
        .captures(text)
        .is_some_and(|caps| valid_time(&caps, 1))
}

fn is_date_time(text: &str) -> bool {
    regex(&DATE_TIME_REGEX, DATE_TIME_PATTERN)
        .captures(text)
        .is_some_and(|caps| valid_date(&caps, 1) && valid_time(&caps, 4))
}

fn number(caps: &Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index).and_then(|m| m.as_str().parse().ok())
}

/// Calendar check of year, month and day captured from `first` onwards
fn valid_date(caps: &Captures<'_>, first: usize) -> bool {
    match (number(caps, first), number(caps, first + 1), number(caps, first + 2)) {
        (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y as i32, m, d).is_some(),
        _ => false,
    }
}

/// Clock and offset check of a time captured from `first` onwards
fn valid_time(caps: &Captures<'_>, first: usize) -> bool {
    let (Some(hour), Some(minute), Some(second)) =
        (number(caps, first), number(caps, first + 1), number(caps, first + 2))
    else {
        return false;
    };
    // a leap second is written as :60
    if second > 60 || NaiveTime::from_hms_opt(hour, minute, second.min(59)).is_none() {
        return false;
    }

    match caps.get(first + 3) {
        None => true,
        Some(sign) => match (number(caps, first + 4), number(caps, first + 5)) {
            (Some(oh), Some(om)) if oh <= 23 && om <= 59 => {
                let seconds = (oh * 3600 + om * 60) as i32;
                let seconds = if sign.as_str() == "-" { -seconds } else { seconds };
                FixedOffset::east_opt(seconds).is_some()
            }
            _ => false,
        },
    }
}

fn is_ascii_hostname(text: &str) -> bool {
    if text.is_empty() || text.len() > 253 {
        return false;
    }
    let label = regex(
        &HOST_LABEL_REGEX,
        r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$",
    );
    text.split('.').all(|part| label.is_match(part))
}

fn is_idn_hostname(text: &str) -> bool {
    match Host::parse(text) {
        Ok(Host::Domain(ascii)) => is_ascii_hostname(&ascii),
        _ => false,
    }
}

fn is_email(text: &str, international: bool) -> bool {
    let Some((local, domain)) = text.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > 64 {
        return false;
    }
    if international {
        regex(
            &IDN_EMAIL_LOCAL_REGEX,
            r"^[^\s@.\x00-\x1f()<>\[\]:;,\\\x22]+(?:\.[^\s@.\x00-\x1f()<>\[\]:;,\\\x22]+)*$",
        )
        .is_match(local)
            && is_idn_hostname(domain)
    } else {
        regex(
            &EMAIL_LOCAL_REGEX,
            r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*$",
        )
        .is_match(local)
            && is_ascii_hostname(domain)
    }
}

/// Structural and character-class check for URIs and IRIs
fn is_uri(text: &str, international: bool, absolute: bool) -> bool {
    let chars = if international {
        regex(
            &IRI_CHARS_REGEX,
            r"^(?:[\p{L}\p{N}\p{M}\-._~:/?#\[\]@!$&'()*+,;=]|%[0-9A-Fa-f]{2})*$",
        )
    } else {
        regex(
            &URI_CHARS_REGEX,
            r"^(?:[A-Za-z0-9\-._~:/?#\[\]@!$&'()*+,;=]|%[0-9A-Fa-f]{2})*$",
        )
    };
    if !chars.is_match(text) {
        return false;
    }
    !absolute || regex(&URI_SCHEME_REGEX, r"^[A-Za-z][A-Za-z0-9+.\-]*:").is_match(text)
}
