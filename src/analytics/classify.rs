//! Best-effort user-agent classification.
//!
//! The audience counters only need coarse family buckets, so this is plain
//! substring matching over the raw user-agent string. Anything unrecognized
//! lands in the `Unknown` buckets; classification never fails.

/// Coarse classification of a user-agent string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentClass {
    pub browser: &'static str,
    pub os: &'static str,
    pub device: &'static str,
}

pub const DEVICE_MOBILE: &str = "Mobile";
pub const DEVICE_DESKTOP: &str = "Desktop";
const UNKNOWN: &str = "Unknown";

fn browser_family(ua: &str) -> &'static str {
    // Token order matters: Chromium-family browsers all carry "Chrome", and
    // everything WebKit carries "Safari".
    if ua.contains("Edg/") || ua.contains("Edge/") {
        "Edge"
    } else if ua.contains("OPR/") || ua.contains("Opera") {
        "Opera"
    } else if ua.contains("SamsungBrowser") {
        "Samsung Internet"
    } else if ua.contains("Firefox/") || ua.contains("FxiOS") {
        "Firefox"
    } else if ua.contains("CriOS") || ua.contains("Chrome/") {
        "Chrome"
    } else if ua.contains("Safari/") {
        "Safari"
    } else if ua.contains("MSIE") || ua.contains("Trident/") {
        "IE"
    } else {
        UNKNOWN
    }
}

fn os_family(ua: &str) -> &'static str {
    if ua.contains("Windows") {
        "Windows"
    } else if ua.contains("Android") {
        "Android"
    } else if ua.contains("iPhone") || ua.contains("iPad") || ua.contains("iPod") {
        "iOS"
    } else if ua.contains("Mac OS X") || ua.contains("Macintosh") {
        "Mac OS X"
    } else if ua.contains("CrOS") {
        "Chrome OS"
    } else if ua.contains("Linux") {
        "Linux"
    } else {
        UNKNOWN
    }
}

fn is_mobile(ua: &str) -> bool {
    // Tablets count as mobile, same as the site's players report them.
    ua.contains("Mobile")
        || ua.contains("Android")
        || ua.contains("iPhone")
        || ua.contains("iPad")
        || ua.contains("iPod")
}

pub fn classify_user_agent(ua: &str) -> AgentClass {
    AgentClass {
        browser: browser_family(ua),
        os: os_family(ua),
        device: if is_mobile(ua) {
            DEVICE_MOBILE
        } else {
            DEVICE_DESKTOP
        },
    }
}
