use serde::{Deserialize, Serialize};

use super::Payload;
use super::uri::encode_uri_component;

fn present(value: &str) -> bool {
    !value.trim().is_empty()
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct UrlData {
    pub url: String,
}

impl Payload for UrlData {
    fn encode(&self) -> String {
        self.url.trim().to_string()
    }

    fn is_ready(&self) -> bool {
        present(&self.url)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct TextData {
    pub text: String,
}

impl Payload for TextData {
    fn encode(&self) -> String {
        self.text.trim().to_string()
    }

    fn is_ready(&self) -> bool {
        present(&self.text)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WifiEncryption {
    #[default]
    #[serde(rename = "WPA")]
    Wpa,
    #[serde(rename = "WEP")]
    Wep,
    #[serde(rename = "nopass")]
    NoPass,
}

impl WifiEncryption {
    pub fn as_str(&self) -> &'static str {
        match self {
            WifiEncryption::Wpa => "WPA",
            WifiEncryption::Wep => "WEP",
            WifiEncryption::NoPass => "nopass",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct WifiData {
    pub ssid: String,
    pub password: String,
    pub encryption: WifiEncryption,
    pub hidden: bool,
}

impl Payload for WifiData {
    fn encode(&self) -> String {
        format!(
            "WIFI:T:{};S:{};P:{};H:{};;",
            self.encryption.as_str(),
            self.ssid,
            self.password,
            self.hidden
        )
    }

    fn is_ready(&self) -> bool {
        present(&self.ssid)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct VCardData {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub company: String,
    pub title: String,
    pub website: String,
    pub address: String,
}

impl Payload for VCardData {
    fn encode(&self) -> String {
        [
            "BEGIN:VCARD".to_string(),
            "VERSION:3.0".to_string(),
            format!("N:{};{}", self.last_name, self.first_name),
            format!("FN:{} {}", self.first_name, self.last_name),
            format!("TEL:{}", self.phone),
            format!("EMAIL:{}", self.email),
            format!("ORG:{}", self.company),
            format!("TITLE:{}", self.title),
            format!("URL:{}", self.website),
            format!("ADR:{}", self.address),
            "END:VCARD".to_string(),
        ]
        .join("\n")
    }

    fn is_ready(&self) -> bool {
        present(&self.first_name) || present(&self.last_name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct EmailData {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Payload for EmailData {
    fn encode(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.to,
            encode_uri_component(&self.subject),
            encode_uri_component(&self.body)
        )
    }

    fn is_ready(&self) -> bool {
        present(&self.to)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct WhatsAppData {
    pub phone: String,
    pub message: String,
}

impl Payload for WhatsAppData {
    fn encode(&self) -> String {
        let digits: String = self.phone.chars().filter(char::is_ascii_digit).collect();
        if self.message.is_empty() {
            format!("https://wa.me/{digits}")
        } else {
            format!(
                "https://wa.me/{digits}?text={}",
                encode_uri_component(&self.message)
            )
        }
    }

    fn is_ready(&self) -> bool {
        present(&self.phone)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SmsData {
    pub phone: String,
    pub message: String,
}

impl Payload for SmsData {
    fn encode(&self) -> String {
        if self.message.is_empty() {
            format!("sms:{}", self.phone)
        } else {
            format!(
                "sms:{}?body={}",
                self.phone,
                encode_uri_component(&self.message)
            )
        }
    }

    fn is_ready(&self) -> bool {
        present(&self.phone)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PdfData {
    pub url: String,
    /// Display name only, never encoded.
    pub name: String,
}

impl Payload for PdfData {
    fn encode(&self) -> String {
        self.url.trim().to_string()
    }

    fn is_ready(&self) -> bool {
        present(&self.url)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    #[default]
    Instagram,
    Facebook,
    Twitter,
    Linkedin,
    Tiktok,
    Youtube,
}

impl SocialPlatform {
    /// Profile URL prefix; the handle is appended as-is.
    pub fn profile_prefix(&self) -> &'static str {
        match self {
            SocialPlatform::Instagram => "https://instagram.com/",
            SocialPlatform::Facebook => "https://facebook.com/",
            SocialPlatform::Twitter => "https://twitter.com/",
            SocialPlatform::Linkedin => "https://linkedin.com/in/",
            SocialPlatform::Tiktok => "https://tiktok.com/@",
            SocialPlatform::Youtube => "https://youtube.com/@",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SocialData {
    pub platform: SocialPlatform,
    pub username: String,
}

impl SocialData {
    pub fn handle(&self) -> &str {
        let username = self.username.trim();
        username.strip_prefix('@').unwrap_or(username)
    }
}

impl Payload for SocialData {
    fn encode(&self) -> String {
        format!("{}{}", self.platform.profile_prefix(), self.handle())
    }

    fn is_ready(&self) -> bool {
        present(&self.username)
    }
}
