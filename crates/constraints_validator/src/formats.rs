//! Named string formats consulted by the `format` rule.
//!
//! The built-in catalogue covers character classes, numbers, colors,
//! identifiers (UUID, ISBN, Ethereum and Bitcoin addresses), encodings, network
//! addresses and web formats. None of them perform I/O.

use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::{Arc, LazyLock};
use validator::{ValidateEmail, ValidateUrl};

/// A format check.
pub type FormatFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Immutable-after-build lookup table of named formats.
///
/// # Example
///
/// ```rust
/// use constraints_validator::FormatRegistry;
///
/// let formats = FormatRegistry::new().with("even_len", |s: &str| s.len() % 2 == 0);
/// assert_eq!(formats.check("uuid4", "9b2c1f0e-8d4a-4c3b-9e2f-1a2b3c4d5e6f"), Some(true));
/// assert_eq!(formats.check("even_len", "abc"), Some(false));
/// assert_eq!(formats.check("nope", "abc"), None);
/// ```
#[derive(Clone)]
pub struct FormatRegistry {
    formats: HashMap<String, FormatFn>,
}

impl FormatRegistry {
    /// Creates a registry holding the built-in catalogue.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (name, check) in BUILTIN {
            registry.register(*name, *check);
        }
        registry
    }

    /// Creates a registry without any format.
    pub fn empty() -> Self {
        Self {
            formats: HashMap::new(),
        }
    }

    /// Registers a format, replacing any format of the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, check: F) -> &mut Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.formats.insert(name.into(), Arc::new(check));
        self
    }

    /// Builder-style variant of [`FormatRegistry::register`].
    pub fn with<F>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.register(name, check);
        self
    }

    /// Looks a format up by name.
    pub fn get(&self, name: &str) -> Option<&FormatFn> {
        self.formats.get(name)
    }

    /// Returns true if a format of that name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// Runs a format; `None` when the name is unknown.
    pub fn check(&self, name: &str, value: &str) -> Option<bool> {
        self.get(name).map(|check| check(value))
    }

    /// Format names in alphabetical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.formats.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.names())
            .finish()
    }
}

static BUILTIN: &[(&str, fn(&str) -> bool)] = &[
    ("alpha", |s| ALPHA.is_match(s)),
    ("alphanum", |s| ALPHANUM.is_match(s)),
    ("alphaunicode", |s| ALPHA_UNICODE.is_match(s)),
    ("alphanumunicode", |s| ALPHANUM_UNICODE.is_match(s)),
    ("numeric", |s| NUMERIC.is_match(s)),
    ("number", |s| NUMBER.is_match(s)),
    ("hexadecimal", |s| HEXADECIMAL.is_match(s)),
    ("hexcolor", |s| HEX_COLOR.is_match(s)),
    ("rgb", |s| RGB.is_match(s)),
    ("rgba", |s| RGBA.is_match(s)),
    ("hsl", |s| HSL.is_match(s)),
    ("hsla", |s| HSLA.is_match(s)),
    ("email", is_email),
    ("url", is_url),
    ("uri", is_uri),
    ("urn_rfc2141", |s| URN.is_match(s)),
    ("base64", |s| BASE64.is_match(s)),
    ("base64url", |s| BASE64_URL.is_match(s)),
    ("isbn", |s| is_isbn10(s) || is_isbn13(s)),
    ("isbn10", is_isbn10),
    ("isbn13", is_isbn13),
    ("eth_addr", |s| ETH_ADDRESS.is_match(s)),
    ("btc_addr", is_btc_address),
    ("btc_addr_bech32", is_btc_bech32_address),
    ("uuid", |s| UUID.is_match(s)),
    ("uuid3", |s| UUID3.is_match(s)),
    ("uuid4", |s| UUID4.is_match(s)),
    ("uuid5", |s| UUID5.is_match(s)),
    ("uuid_rfc4122", |s| UUID_RFC4122.is_match(s)),
    ("uuid3_rfc4122", |s| UUID3_RFC4122.is_match(s)),
    ("uuid4_rfc4122", |s| UUID4_RFC4122.is_match(s)),
    ("uuid5_rfc4122", |s| UUID5_RFC4122.is_match(s)),
    ("ascii", |s| s.is_ascii()),
    ("printascii", |s| s.bytes().all(|b| (0x20..=0x7e).contains(&b))),
    ("multibyte", |s| !s.is_ascii()),
    ("datauri", is_data_uri),
    ("latitude", |s| LATITUDE.is_match(s)),
    ("longitude", |s| LONGITUDE.is_match(s)),
    ("ssn", |s| s.len() == 11 && SSN.is_match(s)),
    ("ipv4", |s| s.parse::<Ipv4Addr>().is_ok()),
    ("ipv6", is_ipv6),
    ("ip", |s| s.parse::<IpAddr>().is_ok()),
    ("cidrv4", |s| matches!(parse_cidr(s), Some(IpAddr::V4(_)))),
    ("cidrv6", |s| matches!(parse_cidr(s), Some(IpAddr::V6(_)))),
    ("cidr", |s| parse_cidr(s).is_some()),
    ("mac", |s| MAC.is_match(s)),
    ("hostname", |s| HOSTNAME_RFC952.is_match(s)),
    ("hostname_rfc1123", |s| HOSTNAME_RFC1123.is_match(s)),
    ("fqdn", is_fqdn),
    ("html", |s| HTML.is_match(s)),
    ("html_encoded", |s| HTML_ENCODED.is_match(s)),
    ("url_encoded", |s| URL_ENCODED.is_match(s)),
];

macro_rules! regex {
    ($($name:ident = $pattern:expr;)*) => {
        $(
            static $name: LazyLock<Regex> =
                LazyLock::new(|| Regex::new(&$pattern).expect("valid format regex"));
        )*
    };
}

const OCTET: &str = r"(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)";
const PERCENT: &str = r"(?:100|[1-9]?\d)%";
const HUE: &str = r"(?:360|3[0-5]\d|[12]\d\d|[1-9]?\d)";
const OPACITY: &str = r"(?:0|1|0?\.\d+|1\.0+)";
const HEX: &str = "[0-9a-f]";
const HEX_ANY_CASE: &str = "[0-9a-fA-F]";

regex! {
    ALPHA = r"^[a-zA-Z]+$";
    ALPHANUM = r"^[a-zA-Z0-9]+$";
    ALPHA_UNICODE = r"^\p{L}+$";
    ALPHANUM_UNICODE = r"^[\p{L}\p{N}]+$";
    NUMERIC = r"^[-+]?[0-9]+(?:\.[0-9]+)?$";
    NUMBER = r"^[0-9]+$";
    HEXADECIMAL = r"^(?:0[xX])?[0-9a-fA-F]+$";
    HEX_COLOR = r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$";
    RGB = format!(
        r"^rgb\(\s*(?:{o}\s*,\s*{o}\s*,\s*{o}|{p}\s*,\s*{p}\s*,\s*{p})\s*\)$",
        o = OCTET,
        p = PERCENT
    );
    RGBA = format!(
        r"^rgba\(\s*(?:{o}\s*,\s*{o}\s*,\s*{o}|{p}\s*,\s*{p}\s*,\s*{p})\s*,\s*{a}\s*\)$",
        o = OCTET,
        p = PERCENT,
        a = OPACITY
    );
    HSL = format!(r"^hsl\(\s*{h}\s*,\s*{p}\s*,\s*{p}\s*\)$", h = HUE, p = PERCENT);
    HSLA = format!(
        r"^hsla\(\s*{h}\s*,\s*{p}\s*,\s*{p}\s*,\s*{a}\s*\)$",
        h = HUE,
        p = PERCENT,
        a = OPACITY
    );
    URN = r"^(?i:urn):[a-zA-Z0-9][a-zA-Z0-9-]{0,31}:(?:[a-zA-Z0-9()+,\-.:=@;$_!*']|%[0-9a-fA-F]{2})+$";
    BASE64 = r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=|[A-Za-z0-9+/]{4})$";
    BASE64_URL = r"^(?:[A-Za-z0-9_-]{4})*(?:[A-Za-z0-9_-]{2}==|[A-Za-z0-9_-]{3}=|[A-Za-z0-9_-]{4})$";
    ISBN10 = r"^(?:[0-9]{9}X|[0-9]{10})$";
    ISBN13 = r"^97[89][0-9]{10}$";
    ETH_ADDRESS = r"^0x[0-9a-fA-F]{40}$";
    BTC_ADDRESS = r"^[13][a-km-zA-HJ-NP-Z1-9]{25,34}$";
    BTC_BECH32_LOWER = r"^bc1[02-9ac-hj-np-z]{7,76}$";
    BTC_BECH32_UPPER = r"^BC1[02-9AC-HJ-NP-Z]{7,76}$";
    UUID = format!("^{h}{{8}}-{h}{{4}}-{h}{{4}}-{h}{{4}}-{h}{{12}}$", h = HEX);
    UUID3 = format!("^{h}{{8}}-{h}{{4}}-3{h}{{3}}-{h}{{4}}-{h}{{12}}$", h = HEX);
    UUID4 = format!("^{h}{{8}}-{h}{{4}}-4{h}{{3}}-[89ab]{h}{{3}}-{h}{{12}}$", h = HEX);
    UUID5 = format!("^{h}{{8}}-{h}{{4}}-5{h}{{3}}-[89ab]{h}{{3}}-{h}{{12}}$", h = HEX);
    UUID_RFC4122 = format!("^{h}{{8}}-{h}{{4}}-{h}{{4}}-{h}{{4}}-{h}{{12}}$", h = HEX_ANY_CASE);
    UUID3_RFC4122 = format!("^{h}{{8}}-{h}{{4}}-3{h}{{3}}-{h}{{4}}-{h}{{12}}$", h = HEX_ANY_CASE);
    UUID4_RFC4122 = format!(
        "^{h}{{8}}-{h}{{4}}-4{h}{{3}}-[89abAB]{h}{{3}}-{h}{{12}}$",
        h = HEX_ANY_CASE
    );
    UUID5_RFC4122 = format!(
        "^{h}{{8}}-{h}{{4}}-5{h}{{3}}-[89abAB]{h}{{3}}-{h}{{12}}$",
        h = HEX_ANY_CASE
    );
    DATA_URI_HEADER = r"^data:(?:[\w.+-]+/[\w.+-]+)?(?:;[\w.+-]+=[\w.+-]+)*;base64$";
    LATITUDE = r"^[-+]?(?:[1-8]?\d(?:\.\d+)?|90(?:\.0+)?)$";
    LONGITUDE = r"^[-+]?(?:180(?:\.0+)?|(?:1[0-7]\d|[1-9]?\d)(?:\.\d+)?)$";
    SSN = r"^[0-9]{3}[ -]?(?:0[1-9]|[1-9][0-9])[ -]?(?:[1-9][0-9]{3}|[0-9][1-9][0-9]{2}|[0-9]{2}[1-9][0-9]|[0-9]{3}[1-9])$";
    MAC = format!(
        r"^(?:{h}{{2}}(?::{h}{{2}}){{5}}|{h}{{2}}(?:-{h}{{2}}){{5}}|{h}{{2}}(?::{h}{{2}}){{7}}|{h}{{2}}(?:-{h}{{2}}){{7}}|{h}{{4}}(?:\.{h}{{4}}){{2,3}})$",
        h = HEX_ANY_CASE
    );
    HOSTNAME_RFC952 = r"^[a-zA-Z](?:[a-zA-Z0-9\-]+\.?)*[a-zA-Z0-9]$";
    HOSTNAME_RFC1123 = r"^[a-zA-Z0-9][a-zA-Z0-9_-]{0,62}(?:\.[a-zA-Z0-9_][a-zA-Z0-9_-]{0,62})*$";
    HTML = r"<[/]?[a-zA-Z]+.*?>";
    HTML_ENCODED = r"&#[x]?[0-9a-fA-F]{2}|&gt|&lt|&quot|&amp";
    URL_ENCODED = r"^(?:[^%]|%[0-9A-Fa-f]{2})*$";
}

fn is_email(value: &str) -> bool {
    value.to_string().validate_email()
}

fn strip_fragment(value: &str) -> &str {
    value.split_once('#').map_or(value, |(head, _)| head)
}

fn is_url(value: &str) -> bool {
    let value = strip_fragment(value);
    !value.is_empty() && value.to_string().validate_url()
}

fn is_uri(value: &str) -> bool {
    let value = strip_fragment(value);
    value.starts_with('/') || is_url(value)
}

fn is_isbn10(value: &str) -> bool {
    let digits: String = value.chars().filter(|c| *c != '-' && *c != ' ').collect();
    if !ISBN10.is_match(&digits) {
        return false;
    }

    let checksum: u32 = digits
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let digit = if b == b'X' { 10 } else { u32::from(b - b'0') };
            (i as u32 + 1) * digit
        })
        .sum();

    checksum % 11 == 0
}

fn is_isbn13(value: &str) -> bool {
    let digits: String = value.chars().filter(|c| *c != '-' && *c != ' ').collect();
    if !ISBN13.is_match(&digits) {
        return false;
    }

    let checksum: u32 = digits
        .bytes()
        .enumerate()
        .map(|(i, b)| u32::from(b - b'0') * if i % 2 == 0 { 1 } else { 3 })
        .sum();

    checksum % 10 == 0
}

const BASE58_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const BECH32_GENERATOR: [u32; 5] = [0x3b6a_57b2, 0x2650_8e6d, 0x1ea1_19fa, 0x3d42_33dd, 0x2a14_62b3];

/// Base58Check P2PKH/P2SH address: 21 payload bytes and a 4-byte double
/// SHA-256 checksum.
fn is_btc_address(value: &str) -> bool {
    if !BTC_ADDRESS.is_match(value) {
        return false;
    }

    let mut decoded = [0u8; 25];
    for byte in value.bytes() {
        let Some(mut carry) = BASE58_ALPHABET.iter().position(|&b| b == byte) else {
            return false;
        };
        for slot in decoded.iter_mut().rev() {
            carry += 58 * usize::from(*slot);
            *slot = (carry % 256) as u8;
            carry /= 256;
        }
    }

    let checksum = Sha256::digest(Sha256::digest(&decoded[..21]));
    checksum[..4] == decoded[21..]
}

/// Segwit address on the `bc` network, checked with the bech32 polymod.
fn is_btc_bech32_address(value: &str) -> bool {
    if !BTC_BECH32_LOWER.is_match(value) && !BTC_BECH32_UPPER.is_match(value) {
        return false;
    }
    if matches!(value.len() % 8, 0 | 3 | 5) {
        return false;
    }

    let address = value.to_ascii_lowercase();
    let data: Option<Vec<u32>> = address[3..]
        .chars()
        .map(|c| BECH32_CHARSET.find(c).map(|i| i as u32))
        .collect();
    let Some(data) = data else {
        return false;
    };

    let version = data[0];
    if version > 16 {
        return false;
    }
    if version == 0 && address.len() != 42 && address.len() != 62 {
        return false;
    }

    // "bc" expanded: high bits, separator, low bits.
    let mut checksum: u32 = 1;
    for v in [3, 3, 0, 2, 3].into_iter().chain(data.iter().copied()) {
        let top = checksum >> 25;
        checksum = ((checksum & 0x1ff_ffff) << 5) ^ v;
        for (i, generator) in BECH32_GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                checksum ^= generator;
            }
        }
    }
    if checksum != 1 {
        return false;
    }

    // Witness program: 5-bit groups between the version and the checksum.
    let program_len = data.len().saturating_sub(7) * 5 / 8;
    (2..=40).contains(&program_len)
}

fn is_data_uri(value: &str) -> bool {
    match value.split_once(',') {
        Some((header, data)) => DATA_URI_HEADER.is_match(header) && BASE64.is_match(data),
        None => false,
    }
}

fn is_ipv6(value: &str) -> bool {
    value
        .parse::<Ipv6Addr>()
        .is_ok_and(|ip| ip.to_ipv4_mapped().is_none())
}

fn parse_cidr(value: &str) -> Option<IpAddr> {
    let (ip, prefix) = value.split_once('/')?;
    let ip: IpAddr = ip.parse().ok()?;
    let prefix: u8 = prefix.parse().ok()?;
    let max = if ip.is_ipv4() { 32 } else { 128 };
    (prefix <= max).then_some(ip)
}

fn is_fqdn(value: &str) -> bool {
    let value = value.strip_suffix('.').unwrap_or(value);
    value.contains('.') && HOSTNAME_RFC952.is_match(value)
}
