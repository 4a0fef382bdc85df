//! Coarse client classification from the `User-Agent` header.
//!
//! Plain substring checks evaluated in a fixed order, first match wins.
//! The order is load-bearing: Chrome's token also contains "Safari", and
//! Edge's token also contains "Chrome".

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Windows,
    MacOS,
    Linux,
    Android,
    #[serde(rename = "iOS")]
    Ios,
    Unknown,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Browser {
    Chrome,
    Safari,
    Firefox,
    Edge,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientFingerprint {
    pub device_type: DeviceType,
    pub os: Os,
    pub browser: Browser,
}

fn has_any(user_agent: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| user_agent.contains(needle))
}

pub fn device_type(user_agent: &str) -> DeviceType {
    let tablet = has_any(user_agent, &["iPad", "Tablet"]);
    let mobile = has_any(user_agent, &["Mobile", "Android", "iPhone", "iPad"]);

    if tablet {
        DeviceType::Tablet
    } else if mobile {
        DeviceType::Mobile
    } else {
        DeviceType::Desktop
    }
}

pub fn os(user_agent: &str) -> Os {
    if user_agent.contains("Windows") {
        Os::Windows
    } else if user_agent.contains("Mac") {
        Os::MacOS
    } else if user_agent.contains("Linux") {
        Os::Linux
    } else if user_agent.contains("Android") {
        Os::Android
    } else if has_any(user_agent, &["iPhone", "iPad"]) {
        Os::Ios
    } else {
        Os::Unknown
    }
}

pub fn browser(user_agent: &str) -> Browser {
    let chrome = user_agent.contains("Chrome");
    let edge = user_agent.contains("Edg");

    if chrome && !edge {
        Browser::Chrome
    } else if user_agent.contains("Safari") && !chrome {
        Browser::Safari
    } else if user_agent.contains("Firefox") {
        Browser::Firefox
    } else if edge {
        Browser::Edge
    } else {
        Browser::Unknown
    }
}

impl ClientFingerprint {
    pub fn from_user_agent(user_agent: &str) -> Self {
        Self {
            device_type: device_type(user_agent),
            os: os(user_agent),
            browser: browser(user_agent),
        }
    }
}
